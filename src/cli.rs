//! Command-line interface definitions for dupsweep.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates among two folders and a file
//! dupsweep ~/Pictures ~/Downloads ~/Desktop/photo.jpg
//!
//! # Only look at .jpg and .png files, write the report to dups.txt
//! dupsweep ~/Pictures -t .jpg .png -o dups.txt
//!
//! # Offer to delete the extra copies after the report
//! dupsweep ~/Pictures --delete
//! ```

use clap::{ArgAction, Parser};
use std::collections::HashSet;
use std::path::PathBuf;

/// Find identical files.
///
/// Every file given directly, and every file directly inside a given
/// folder, is fingerprinted with SHA-256. Files with the same fingerprint
/// are reported in the output file; with `--delete` all copies but the
/// first one found can be removed.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folders or files to be processed
    #[arg(value_name = "PATH")]
    pub initial_paths: Vec<PathBuf>,

    /// Folders or files to be processed
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Select only specific file types (case-sensitive name suffixes, e.g. .jpg)
    #[arg(short, long, value_name = "SUFFIX", num_args = 1..)]
    pub types: Vec<String>,

    /// Path to the output file [default: result.txt]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Offer to delete duplicates after the report (the first copy is kept)
    #[arg(long)]
    pub delete: bool,

    /// Delete without asking for confirmation
    #[arg(short = 'y', long, requires = "delete")]
    pub yes: bool,

    /// Move duplicates to the system trash instead of removing them
    #[arg(long)]
    pub trash: bool,

    /// Take symlinked files inside listed folders (each file is still hashed once)
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip unreadable or undeletable files instead of stopping
    #[arg(long)]
    pub skip_errors: bool,

    /// Number of hashing threads (1 hashes files one at a time)
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE", env = "DUPSWEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Positional and `--paths` inputs merged, first occurrence kept.
    #[must_use]
    pub fn all_paths(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        self.initial_paths
            .iter()
            .chain(self.paths.iter())
            .filter(|p| seen.insert(p.as_path()))
            .cloned()
            .collect()
    }
}
