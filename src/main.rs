//! dupsweep - find byte-identical files.
//!
//! Entry point for the dupsweep CLI application.

use clap::{CommandFactory, Parser};
use dupsweep::{
    cli::Cli,
    error::{format_error, ExitCode},
    logging::init_logging,
};

fn main() {
    // Bare invocation prints help instead of scanning nothing.
    if std::env::args_os().len() == 1 {
        let _ = Cli::command().print_help();
        std::process::exit(0);
    }

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match dupsweep::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("{}", format_error(&err, exit_code));
            std::process::exit(exit_code.as_i32());
        }
    }
}
