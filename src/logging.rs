//! Console logging.
//!
//! Everything the user sees on the terminal goes through the `log` facade
//! with an `env_logger` backend on stderr. The run log file is separate
//! (see [`crate::output`]).
//!
//! Info records are the tool's normal output (`Processing folder: ...`,
//! `Found identical files: a and b`) and are printed bare. Warnings and
//! errors carry a level tag. At `-v` and above every record is tagged and,
//! in debug builds, timestamped with its module path.
//!
//! The level comes from `RUST_LOG` if set, else from `-q` (errors only) or
//! `-v`/`-vv` (debug/trace), else info.
//!
//! ```rust,no_run
//! use dupsweep::logging::init_logging;
//!
//! init_logging(0, false);
//! log::info!("Processing folder: /tmp");
//! ```

use env_logger::Builder;
use log::{Level, LevelFilter};
use std::env;
use std::io::Write;

/// Initialize console logging from the CLI verbosity flags.
///
/// Calling it a second time is harmless; the first logger stays active.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    } else {
        builder.filter_level(level_for(verbose, quiet));
    }

    builder.format(move |buf, record| {
        let level = record.level();
        if !tagged(level, verbose) {
            return writeln!(buf, "{}", record.args());
        }

        let style = buf.default_level_style(level);
        if cfg!(debug_assertions) && verbose >= 1 {
            let timestamp = buf.timestamp_millis();
            return writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                timestamp,
                level,
                record.module_path().unwrap_or("dupsweep"),
                record.args()
            );
        }
        writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
    });

    if builder.try_init().is_ok() {
        log::debug!("Console logging at level {}", log::max_level());
    }
}

/// Map `-v` count and `-q` to a level filter. `-q` wins.
fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Whether a record at `level` gets a level tag.
fn tagged(level: Level, verbose: u8) -> bool {
    verbose >= 1 || level <= Level::Warn
}
