//! dupsweep - find byte-identical files.
//!
//! Files given on the command line, and the files directly inside given
//! folders, are fingerprinted with SHA-256. Files sharing a fingerprint are
//! written to a run log, and on confirmation every copy except the first
//! one found is removed.
//!
//! A run moves through `Collecting → Hashing → Reporting →
//! [Awaiting confirmation → Deleting] → Done`.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use crate::actions::{confirm, delete_duplicates, DeleteConfig};
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use crate::error::ExitCode;
use crate::output::RunLog;
use crate::progress::{Progress, ProgressCallback};
use crate::scanner::{Collector, CollectorConfig};

/// Run one duplicate scan as described by `cli`.
///
/// # Errors
///
/// Returns an error for fatal conditions: bad configuration, an output file
/// that can't be written, a file that can't be hashed or deleted under the
/// abort policy.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.merge_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let shutdown_flag = signal::install_handler()?.flag();

    let mut run_log = RunLog::create(&config.output)?;

    // Collecting
    let collector_config = CollectorConfig::with_types(config.types.clone())
        .with_follow_symlinks(config.follow_symlinks);
    let outcome = Collector::new(collector_config)
        .with_shutdown_flag(shutdown_flag.clone())
        .collect(&cli.all_paths(), &mut run_log)
        .context("failed to write output file")?;

    if outcome.interrupted {
        run_log.finish()?;
        return Ok(ExitCode::Interrupted);
    }
    if outcome.is_empty() {
        log::info!("No files to process.");
        run_log.finish()?;
        return Ok(ExitCode::NothingToProcess);
    }

    let hide_progress = cli.quiet || cli.no_progress || !std::io::stderr().is_terminal();
    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(hide_progress));

    // Hashing
    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_io_threads(config.io_threads)
            .with_hash_errors(config.hash_errors)
            .with_shutdown_flag(shutdown_flag.clone())
            .with_progress_callback(Arc::clone(&progress)),
    );
    let (groups, summary) = match finder.find_duplicates(&outcome.candidates) {
        Ok(result) => result,
        Err(FinderError::Interrupted) => {
            run_log.finish()?;
            return Ok(ExitCode::Interrupted);
        }
        Err(e) => return Err(e).context("hashing stopped"),
    };

    // Reporting
    run_log
        .duplicate_groups(groups.duplicates())
        .context("failed to write output file")?;
    run_log.finish()?;

    if !summary.skipped.is_empty() {
        log::warn!("{} file(s) could not be read and were skipped", summary.skipped.len());
    }
    if !summary.has_duplicates() || !cli.delete {
        return Ok(ExitCode::Success);
    }

    // Awaiting confirmation
    let confirmed = cli.yes || {
        let _guard = signal::PromptGuard::new();
        confirm(
            std::io::stdin().lock(),
            std::io::stderr(),
            &format!("Delete {} duplicate file(s)?", summary.duplicate_files),
        )
        .context("failed to read confirmation")?
    };
    if !confirmed {
        log::info!("Nothing deleted.");
        return Ok(ExitCode::Success);
    }

    // Deleting
    let duplicate_groups = groups.into_duplicates();
    let delete_config = DeleteConfig::default()
        .with_mode(config.delete_mode)
        .with_on_error(config.delete_errors)
        .with_shutdown_flag(shutdown_flag)
        .with_progress_callback(progress);
    let mut deleted = delete_duplicates(&duplicate_groups, &delete_config);

    log::info!("Deleted {} files.", deleted.deleted_count());
    run_log.deleted(deleted.deleted_count())?;
    run_log.finish()?;

    if deleted.interrupted {
        return Ok(ExitCode::Interrupted);
    }
    if deleted.aborted {
        let err = deleted
            .failures
            .pop()
            .map_or_else(|| anyhow!("deletion aborted"), anyhow::Error::new);
        return Err(err.context("deletion stopped"));
    }
    if !deleted.all_succeeded() {
        log::warn!("{}", deleted.summary());
        for failure in &deleted.failures {
            log::warn!("  {}", failure);
        }
    }

    Ok(ExitCode::Success)
}
