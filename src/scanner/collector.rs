//! Candidate collection from file and directory arguments.
//!
//! # Overview
//!
//! The [`Collector`] turns the user's input paths into an ordered,
//! duplicate-free list of [`Candidate`]s:
//!
//! - a regular file is taken as-is (subject to the suffix filter)
//! - a directory contributes its immediate regular files, in the
//!   filesystem's natural listing order; subdirectories are not descended
//! - anything else is reported as a non-fatal [`ScanError::InvalidPath`]
//!
//! Candidate order is the order in which paths were first seen. The
//! duplicate engine relies on that order to pick survivors.
//!
//! Uniqueness is physical, not lexical: a file reached through a symlink,
//! a `..` detour or a second hardlink is the same candidate as the first
//! path that reached it (see [`FileId`]). Symlinked entries of a listed
//! folder are skipped unless [`CollectorConfig::follow_symlinks`] is set.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{Candidate, CollectorConfig, FileId, IdentityTracker, ScanError};
use crate::output::RunLog;

/// Result of a collection pass.
#[derive(Debug, Default)]
pub struct CollectOutcome {
    /// Candidates in first-seen order, one per physical file
    pub candidates: Vec<Candidate>,
    /// Non-fatal errors, in the order they were encountered
    pub errors: Vec<ScanError>,
    /// Directories that were expanded
    pub folders: Vec<PathBuf>,
    /// Whether collection stopped early because shutdown was requested
    pub interrupted: bool,
}

impl CollectOutcome {
    /// Check if no candidates were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Expands input paths into hashing candidates.
#[derive(Debug)]
pub struct Collector {
    config: CollectorConfig,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Collector {
    /// Create a collector with the given filter configuration.
    #[must_use]
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Collect candidates from `inputs`.
    ///
    /// Each expanded directory is recorded in `run_log` before its entries
    /// are listed. Invalid inputs and unreadable entries end up in
    /// [`CollectOutcome::errors`] and never abort collection.
    ///
    /// # Errors
    ///
    /// Only a failure to write to `run_log` is returned as an error.
    pub fn collect<W: Write>(
        &self,
        inputs: &[PathBuf],
        run_log: &mut RunLog<W>,
    ) -> io::Result<CollectOutcome> {
        let mut outcome = CollectOutcome::default();
        let mut files = IdentityTracker::new();
        let mut folders = IdentityTracker::new();

        for input in inputs {
            if self.is_shutdown_requested() {
                outcome.interrupted = true;
                break;
            }

            let meta = match fs::metadata(input) {
                Ok(meta) if meta.is_file() || meta.is_dir() => meta,
                _ => {
                    let err = ScanError::InvalidPath(input.clone());
                    log::error!("Error: {}", err);
                    outcome.errors.push(err);
                    continue;
                }
            };
            let abs = absolute(input);
            let id = match FileId::from_metadata(input, &meta) {
                Ok(id) => id,
                Err(e) => {
                    record_error(&mut outcome, abs, e);
                    continue;
                }
            };

            if meta.is_file() {
                if self.config.accepts(&abs) {
                    push_unique(&mut outcome.candidates, &mut files, id, abs);
                } else {
                    log::trace!("Filtered out: {}", abs.display());
                }
            } else if folders.first_sighting(id) {
                log::info!("Processing folder: {}", abs.display());
                run_log.folder(&abs)?;
                self.expand_dir(&abs, &mut outcome, &mut files);
                outcome.folders.push(abs);
            } else {
                log::debug!("Skipping repeated folder: {}", abs.display());
            }
        }

        log::debug!(
            "Collected {} candidate(s) with {} error(s)",
            outcome.candidates.len(),
            outcome.errors.len()
        );
        Ok(outcome)
    }

    /// List the immediate entries of `dir` and keep the regular files.
    fn expand_dir(&self, dir: &Path, outcome: &mut CollectOutcome, files: &mut IdentityTracker) {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks);

        for entry in walker {
            if self.is_shutdown_requested() {
                outcome.interrupted = true;
                return;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                    match err.into_io_error() {
                        // Dangling symlink: not a regular file, nothing to report.
                        Some(io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                            log::debug!("Skipping dangling entry: {}", path.display());
                        }
                        Some(io_err) => record_error(outcome, path, io_err),
                        None => {
                            log::warn!("Skipping {} (filesystem loop)", path.display());
                        }
                    }
                    continue;
                }
            };

            if entry.path_is_symlink() && !self.config.follow_symlinks {
                log::trace!("Not following symlink: {}", entry.path().display());
                continue;
            }
            if !entry.file_type().is_file() {
                log::trace!("Not descending into: {}", entry.path().display());
                continue;
            }

            let path = entry.into_path();
            if !self.config.accepts(&path) {
                log::trace!("Filtered out: {}", path.display());
                continue;
            }
            match FileId::of(&path) {
                Ok(id) => push_unique(&mut outcome.candidates, files, id, path),
                Err(e) => record_error(outcome, path, e),
            }
        }
    }
}

/// Resolve `path` against the current directory without touching symlinks.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn push_unique(
    candidates: &mut Vec<Candidate>,
    files: &mut IdentityTracker,
    id: FileId,
    path: PathBuf,
) {
    if files.first_sighting(id) {
        candidates.push(Candidate::new(path));
    } else {
        log::debug!("Skipping another path to a collected file: {}", path.display());
    }
}

fn record_error(outcome: &mut CollectOutcome, path: PathBuf, err: io::Error) {
    if err.kind() == io::ErrorKind::PermissionDenied {
        log::warn!("Permission denied: {}", path.display());
        outcome.errors.push(ScanError::PermissionDenied(path));
    } else {
        log::warn!("Cannot read {}: {}", path.display(), err);
        outcome.errors.push(ScanError::Io { path, source: err });
    }
}
