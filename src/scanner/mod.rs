//! Scanner module for candidate collection and file hashing.
//!
//! This module provides functionality for:
//! - Collecting candidate files from file and directory arguments
//! - Suffix filtering of candidate names
//! - Streaming SHA-256 content fingerprints
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`collector`]: Input path expansion and candidate deduplication
//! - [`hasher`]: SHA-256 file hashing (streaming)
//! - [`identity`]: Physical file identity, so one file is never two candidates
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::output::RunLog;
//! use dupsweep::scanner::{Collector, CollectorConfig};
//! use std::path::PathBuf;
//!
//! let config = CollectorConfig::with_types(vec![".txt".to_string()]);
//! let mut log = RunLog::sink();
//!
//! let outcome = Collector::new(config)
//!     .collect(&[PathBuf::from(".")], &mut log)
//!     .unwrap();
//! for candidate in &outcome.candidates {
//!     println!("{}", candidate.path.display());
//! }
//! for error in &outcome.errors {
//!     eprintln!("Warning: {}", error);
//! }
//! ```

pub mod collector;
pub mod hasher;
pub mod identity;

use std::path::{Path, PathBuf};

// Re-export main types
pub use collector::{CollectOutcome, Collector};
pub use hasher::{hash_to_hex, Hash, Hasher, CHUNK_SIZE};
pub use identity::{FileId, IdentityTracker};

/// A file selected for hashing.
///
/// Candidates are created by the [`Collector`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Final path component, used in console messages
    pub name: String,
}

impl Candidate {
    /// Create a new candidate, deriving its basename from the path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }
}

/// Configuration for candidate collection.
#[derive(Debug, Clone, Default)]
pub struct CollectorConfig {
    /// Filename suffixes to accept. Empty means every regular file is accepted.
    ///
    /// Matching is a case-sensitive raw string suffix test, so `.tx` also
    /// accepts `archive.ctx`.
    pub types: Vec<String>,
    /// Take symlinked entries of listed folders. Off by default; explicit
    /// file and folder arguments are always followed.
    pub follow_symlinks: bool,
}

impl CollectorConfig {
    /// Create a configuration that only accepts the given suffixes.
    #[must_use]
    pub fn with_types(types: Vec<String>) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }

    /// Set whether symlinks inside listed folders are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Check whether a path passes the suffix filter.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        if self.types.is_empty() {
            return true;
        }
        let path_str = path.to_string_lossy();
        self.types.iter().any(|t| path_str.ends_with(t.as_str()))
    }
}

/// Non-fatal errors that can occur while collecting candidates.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The input path is neither a regular file nor a directory.
    #[error("\"{0}\" is not a valid file or directory.")]
    InvalidPath(PathBuf),

    /// Permission was denied when listing a directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while accessing a path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::InvalidPath(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Hashing stopped because shutdown was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Io { path: p, .. }
            | Self::Interrupted(p) => p,
        }
    }
}
