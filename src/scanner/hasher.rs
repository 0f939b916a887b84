//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//! This module provides the [`Hasher`] struct for computing SHA-256
//! fingerprints of file contents. Files are read in fixed [`CHUNK_SIZE`]
//! chunks, so memory use does not depend on file size.
//!
//! Each call to [`Hasher::full_hash`] owns its own digest accumulator and
//! file handle; both are dropped before the call returns.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::HashError;

/// A 256-bit content fingerprint.
pub type Hash = [u8; 32];

/// Number of bytes read per chunk while hashing.
pub const CHUNK_SIZE: usize = 8192;

/// Streaming SHA-256 file hasher.
///
/// The hasher itself holds no digest state and can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    /// Optional shutdown flag checked between chunks
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set, an in-progress hash stops at the next chunk
    /// boundary with [`HashError::Interrupted`].
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

    /// Compute the SHA-256 fingerprint of a file's full content.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file doesn't exist
    /// - `PermissionDenied` if the file can't be opened for reading
    /// - `Io` for any other read failure
    /// - `Interrupted` if shutdown was requested mid-file
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(path, file)
    }

    /// Compute the SHA-256 fingerprint of everything readable from `reader`.
    ///
    /// `path` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::full_hash`], minus the open failures.
    pub fn hash_reader<R: Read>(&self, path: &Path, mut reader: R) -> Result<Hash, HashError> {
        let mut digest = Sha256::new();
        let mut buffer = [0u8; CHUNK_SIZE];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            digest.update(&buffer[..n]);
        }

        let hash: Hash = digest.finalize().into();
        log::trace!("Hashed {}: {}", path.display(), hash_to_hex(&hash));
        Ok(hash)
    }
}

/// Convert a hash to its lowercase hexadecimal representation.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    use std::fmt::Write;

    hash.iter().fold(String::with_capacity(64), |mut out, byte| {
        let _ = write!(out, "{:02x}", byte);
        out
    })
}
