//! Side-channel run log writer.
//!
//! # Format
//!
//! ```text
//! Processing folder: /abs/dir
//! Duplicate files:
//!     /abs/dir/a.bin
//!     /abs/dir/b.bin
//! Deleted 1 files.
//! ```
//!
//! The file is truncated at run start. Writes go through a buffer that is
//! flushed by [`RunLog::finish`] and again when the log is dropped, so
//! partial results survive an interrupted run.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::duplicates::DuplicateGroup;

/// Errors that can occur while opening the run log.
#[derive(Debug, Error)]
pub enum RunLogError {
    /// The log file could not be created or truncated.
    #[error("cannot open output file {path}: {source}")]
    Open {
        /// Requested log path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Plain-text run log.
pub struct RunLog<W: Write> {
    writer: BufWriter<W>,
}

impl RunLog<File> {
    /// Create (or truncate) the log file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `RunLogError::Open` if the file can't be created.
    pub fn create(path: &Path) -> Result<Self, RunLogError> {
        let file = File::create(path).map_err(|source| RunLogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Writing run log to {}", path.display());
        Ok(Self::new(file))
    }
}

impl RunLog<Vec<u8>> {
    /// Create a log that writes into memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Vec::new())
    }

    /// Flush and return everything written so far as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer can't be flushed.
    pub fn into_string(self) -> io::Result<String> {
        let bytes = self.writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl RunLog<io::Sink> {
    /// Create a log that discards everything.
    #[must_use]
    pub fn sink() -> Self {
        Self::new(io::sink())
    }
}

impl<W: Write> RunLog<W> {
    /// Wrap an arbitrary writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Record that a folder is being expanded.
    ///
    /// # Errors
    ///
    /// Returns any write error.
    pub fn folder(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.writer, "Processing folder: {}", path.display())
    }

    /// Write one `Duplicate files:` section per duplicate group.
    ///
    /// Groups with a single member are skipped.
    ///
    /// # Errors
    ///
    /// Returns any write error.
    pub fn duplicate_groups<'a>(
        &mut self,
        groups: impl IntoIterator<Item = &'a DuplicateGroup>,
    ) -> io::Result<()> {
        for group in groups.into_iter().filter(|g| g.is_duplicate()) {
            writeln!(self.writer, "Duplicate files:")?;
            for file in &group.files {
                writeln!(self.writer, "    {}", file.path.display())?;
            }
        }
        Ok(())
    }

    /// Record the number of deleted files.
    ///
    /// # Errors
    ///
    /// Returns any write error.
    pub fn deleted(&mut self, count: usize) -> io::Result<()> {
        writeln!(self.writer, "Deleted {} files.", count)
    }

    /// Flush buffered records to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns any flush error.
    pub fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
