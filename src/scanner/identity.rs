//! Physical file identity.
//!
//! Two paths name the same file when they resolve to the same storage
//! object: a symlink and its target, `d/a.bin` and `d/../d/a.bin`, a file
//! seen through a symlinked folder, or two hardlinks. Such paths hash
//! equal but are not duplicates, and removing one of them may remove the
//! only copy.
//!
//! - **Unix**: `(device, inode)` from the followed metadata
//! - **Other**: the canonical path from [`std::fs::canonicalize`]

use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
#[cfg(not(unix))]
use std::path::PathBuf;

/// Identity of the storage object behind a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId(Key);

#[cfg(unix)]
type Key = (u64, u64);

#[cfg(not(unix))]
type Key = PathBuf;

impl FileId {
    /// Identity of `path`, following symlinks.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from reading metadata (or canonicalizing).
    pub fn of(path: &Path) -> io::Result<Self> {
        let meta = fs::metadata(path)?;
        Self::from_metadata(path, &meta)
    }

    /// Identity of `path` when its followed metadata is already at hand.
    ///
    /// # Errors
    ///
    /// Never fails on Unix. Elsewhere returns the canonicalization error.
    #[cfg(unix)]
    pub fn from_metadata(_path: &Path, meta: &Metadata) -> io::Result<Self> {
        use std::os::unix::fs::MetadataExt;
        Ok(Self((meta.dev(), meta.ino())))
    }

    /// Identity of `path` when its followed metadata is already at hand.
    ///
    /// # Errors
    ///
    /// Returns the canonicalization error.
    #[cfg(not(unix))]
    pub fn from_metadata(path: &Path, _meta: &Metadata) -> io::Result<Self> {
        fs::canonicalize(path).map(Self)
    }
}

/// Remembers which files have been seen.
#[derive(Debug, Default)]
pub struct IdentityTracker {
    seen: HashSet<FileId>,
}

impl IdentityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id`. Returns `true` the first time a file is seen.
    pub fn first_sighting(&mut self, id: FileId) -> bool {
        self.seen.insert(id)
    }

    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
