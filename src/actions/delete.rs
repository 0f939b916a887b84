//! Duplicate removal.
//!
//! # Overview
//!
//! This module removes every deletion candidate of every duplicate group:
//! - Permanent deletion (default)
//! - Move to system trash (recoverable)
//! - Abort-on-first-failure or continue-and-aggregate error policies
//!
//! # Safety
//!
//! The survivor (member 0) of a group is never touched, groups with a single
//! member are never visited, and a group is only processed while its
//! survivor is still present on disk. A member that resolves to the same
//! physical file as its survivor is left alone.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::delete::{delete_duplicates, DeleteConfig};
//! use dupsweep::duplicates::DuplicateFinder;
//! use dupsweep::scanner::Candidate;
//! use std::path::PathBuf;
//!
//! let candidates = vec![
//!     Candidate::new(PathBuf::from("/data/x.bin")),
//!     Candidate::new(PathBuf::from("/data/y.bin")),
//! ];
//! let (groups, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates(&candidates)
//!     .unwrap();
//!
//! let groups = groups.into_duplicates();
//! let summary = delete_duplicates(&groups, &DeleteConfig::default());
//! println!("{}", summary.summary());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::{DuplicateGroup, ErrorPolicy};
use crate::scanner::FileId;
use crate::progress::ProgressCallback;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The survivor of a group is gone, so its copies must stay.
    #[error("survivor missing, keeping its copies: {0}")]
    SurvivorMissing(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("permanent delete failed for {path}: {source}")]
    PermanentDeleteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::SurvivorMissing(p)
            | Self::TrashFailed { path: p, .. }
            | Self::PermanentDeleteFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_metadata(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// How files are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Remove the file from storage.
    #[default]
    Permanent,
    /// Move the file to the system trash.
    Trash,
}

/// Result of a successful deletion operation.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
    /// Whether deletion was permanent (true) or to trash (false).
    pub permanent: bool,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, permanent: bool) -> Self {
        Self {
            path,
            size,
            permanent,
        }
    }
}

/// Outcome of a deletion pass.
#[derive(Debug, Default)]
pub struct DeleteSummary {
    /// Successfully deleted files, in deletion order.
    pub deleted: Vec<DeleteResult>,
    /// Failed deletions, in the order they happened.
    pub failures: Vec<DeleteError>,
    /// Members left in place because they are another path to the survivor.
    pub kept: Vec<PathBuf>,
    /// Total bytes freed.
    pub bytes_freed: u64,
    /// Whether the pass stopped at a failure under [`ErrorPolicy::Abort`].
    pub aborted: bool,
    /// Whether the pass stopped because shutdown was requested.
    pub interrupted: bool,
}

impl DeleteSummary {
    /// Number of files actually removed.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// The failure that stopped the pass, if any.
    #[must_use]
    pub fn abort_error(&self) -> Option<&DeleteError> {
        if self.aborted {
            self.failures.last()
        } else {
            None
        }
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {} bytes",
                self.deleted_count(),
                self.bytes_freed
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {} bytes",
                self.deleted_count(),
                self.failure_count(),
                self.bytes_freed
            )
        }
    }
}

/// Configuration for deletion operations.
#[derive(Clone, Default)]
pub struct DeleteConfig {
    /// Permanent removal or system trash.
    pub mode: DeleteMode,
    /// Stop at the first failure, or keep going and collect failures.
    pub on_error: ErrorPolicy,
    /// Optional shutdown flag checked between files.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for DeleteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeleteConfig")
            .field("mode", &self.mode)
            .field("on_error", &self.on_error)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl DeleteConfig {
    /// Set the deletion mode.
    #[must_use]
    pub fn with_mode(mut self, mode: DeleteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_on_error(mut self, policy: ErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn message(&self, level: log::Level, message: &str) {
        match self.progress_callback {
            Some(ref cb) => cb.on_message(level, message),
            None => log::log!(level, "{}", message),
        }
    }
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata can't be read
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = fs::metadata(path)
        .map_err(|e| DeleteError::from_metadata(path, e))?
        .len();

    trash::delete(path).map_err(|e| DeleteError::TrashFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::debug!("Moved to trash: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, false))
}

/// Permanently delete a single file.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata can't be read
/// - `PermanentDeleteFailed` if the removal fails
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = fs::metadata(path)
        .map_err(|e| DeleteError::from_metadata(path, e))?
        .len();

    fs::remove_file(path).map_err(|source| DeleteError::PermanentDeleteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Removed: {}", path.display());

    Ok(DeleteResult::new(path.to_path_buf(), size, true))
}

/// Check that a group can lose its deletion candidates.
///
/// The survivor must still be a regular file on disk.
///
/// Returns the survivor's physical identity.
///
/// # Errors
///
/// Returns `SurvivorMissing` if the survivor is gone or no longer a file.
pub fn validate_survivor(group: &DuplicateGroup) -> Result<FileId, DeleteError> {
    let survivor = &group.survivor().path;
    match fs::metadata(survivor) {
        Ok(meta) if meta.is_file() => FileId::from_metadata(survivor, &meta)
            .map_err(|_| DeleteError::SurvivorMissing(survivor.clone())),
        _ => Err(DeleteError::SurvivorMissing(survivor.clone())),
    }
}

/// Delete every deletion candidate of every duplicate group.
///
/// Groups are processed in order; within a group, members are removed in
/// processing order starting at index 1. Singleton groups are skipped.
///
/// Under [`ErrorPolicy::Abort`] the first failure stops the pass and is the
/// last entry of [`DeleteSummary::failures`]; files already removed stay
/// removed. Under [`ErrorPolicy::Skip`] every failure is recorded and the
/// pass continues (a missing survivor skips the rest of its group).
#[must_use]
pub fn delete_duplicates(groups: &[DuplicateGroup], config: &DeleteConfig) -> DeleteSummary {
    let mut summary = DeleteSummary::default();
    let total: usize = groups.iter().map(DuplicateGroup::duplicate_count).sum();
    let mut processed = 0;

    if let Some(ref cb) = config.progress_callback {
        cb.on_phase_start("deleting", total);
    }

    'groups: for group in groups.iter().filter(|g| g.is_duplicate()) {
        let survivor_id = match validate_survivor(group) {
            Ok(id) => id,
            Err(e) => {
                config.message(log::Level::Error, &e.to_string());
                summary.failures.push(e);
                if config.on_error == ErrorPolicy::Abort {
                    summary.aborted = true;
                    break;
                }
                processed += group.duplicate_count();
                continue;
            }
        };

        for candidate in group.deletion_candidates() {
            if config.is_shutdown_requested() {
                summary.interrupted = true;
                break 'groups;
            }

            processed += 1;
            if let Some(ref cb) = config.progress_callback {
                cb.on_progress(processed, &candidate.path.to_string_lossy());
            }

            if FileId::of(&candidate.path).is_ok_and(|id| id == survivor_id) {
                config.message(
                    log::Level::Warn,
                    &format!(
                        "Keeping {}: same file as {}",
                        candidate.path.display(),
                        group.survivor().path.display()
                    ),
                );
                summary.kept.push(candidate.path.clone());
                continue;
            }

            let result = match config.mode {
                DeleteMode::Permanent => permanent_delete(&candidate.path),
                DeleteMode::Trash => delete_to_trash(&candidate.path),
            };

            match result {
                Ok(deleted) => {
                    let verb = if deleted.permanent { "Deleted" } else { "Moved to trash" };
                    config.message(
                        log::Level::Info,
                        &format!("{}: {}", verb, deleted.path.display()),
                    );
                    summary.bytes_freed += deleted.size;
                    summary.deleted.push(deleted);
                }
                Err(e) => {
                    config.message(
                        log::Level::Error,
                        &format!("Failed to delete {}: {}", candidate.path.display(), e),
                    );
                    summary.failures.push(e);
                    if config.on_error == ErrorPolicy::Abort {
                        summary.aborted = true;
                        break 'groups;
                    }
                }
            }
        }
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_phase_end("deleting");
    }

    log::debug!("{}", summary.summary());
    summary
}
