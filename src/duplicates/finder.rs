//! Duplicate finder: hashes candidates and groups them by fingerprint.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives the hashing phase of a run:
//!
//! 1. **Hash** - compute the SHA-256 fingerprint of every candidate
//! 2. **Group** - append each candidate to its fingerprint's group, in
//!    candidate order
//! 3. **Report** - log each newly found duplicate and a final count
//!
//! Hashing is sequential by default. With `io_threads > 1` fingerprints are
//! computed on a rayon pool, but grouping still walks the results in
//! candidate order, so the survivor of every group is the same as in a
//! sequential run.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::{DuplicateFinder, FinderConfig};
//! use dupsweep::scanner::Candidate;
//! use std::path::PathBuf;
//!
//! let candidates = vec![
//!     Candidate::new(PathBuf::from("/data/x.bin")),
//!     Candidate::new(PathBuf::from("/data/y.bin")),
//! ];
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (groups, summary) = finder.find_duplicates(&candidates).unwrap();
//!
//! println!("Found {} duplicate file(s)", summary.duplicate_files);
//! for group in groups.duplicates() {
//!     println!("{} copies of {}", group.len(), group.survivor().path.display());
//! }
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::groups::FingerprintGroups;
use crate::progress::ProgressCallback;
use crate::scanner::{Candidate, Hash, HashError, Hasher};

/// What to do when a single file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first failure and return it.
    #[default]
    Abort,
    /// Log the failure, leave the file out, and keep going.
    Skip,
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of hashing threads. `1` hashes sequentially.
    pub io_threads: usize,
    /// Behavior when a file can't be read.
    pub hash_errors: ErrorPolicy,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("hash_errors", &self.hash_errors)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 1,
            hash_errors: ErrorPolicy::Abort,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of hashing threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the policy for unreadable files.
    #[must_use]
    pub fn with_hash_errors(mut self, policy: ErrorPolicy) -> Self {
        self.hash_errors = policy;
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

/// Summary statistics from the hashing phase.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Number of candidates handed to the finder
    pub total_files: usize,
    /// Number of candidates that were hashed and grouped
    pub hashed_files: usize,
    /// Number of groups with two or more members
    pub duplicate_groups: usize,
    /// Number of non-survivor members across all groups
    pub duplicate_files: usize,
    /// Files left out under [`ErrorPolicy::Skip`]
    pub skipped: Vec<HashError>,
    /// Duration of the hashing phase
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Check if any duplicates were found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.duplicate_files > 0
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// A file could not be hashed and the policy is to abort.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// The hashing thread pool could not be created.
    #[error("Failed to build hashing thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Hashes candidates and groups them by fingerprint.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new();
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Hash every candidate and group the results.
    ///
    /// Candidates are grouped in slice order; the first candidate of each
    /// fingerprint is that group's survivor.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - a file can't be hashed and the policy is [`ErrorPolicy::Abort`]
    /// - the scan is interrupted by shutdown signal
    /// - the parallel hashing pool can't be created
    pub fn find_duplicates(
        &self,
        candidates: &[Candidate],
    ) -> Result<(FingerprintGroups, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut groups = FingerprintGroups::new();
        let mut summary = ScanSummary {
            total_files: candidates.len(),
            ..ScanSummary::default()
        };

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_phase_start("hashing", candidates.len());
        }

        let result = if self.config.io_threads > 1 {
            self.hash_parallel(candidates, &mut groups, &mut summary)
        } else {
            self.hash_sequential(candidates, &mut groups, &mut summary)
        };

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_phase_end("hashing");
        }
        result?;

        summary.duplicate_groups = groups.duplicates().count();
        summary.duplicate_files = groups.duplicate_file_count();
        summary.scan_duration = start_time.elapsed();

        log::info!("Found {} duplicate file(s).", summary.duplicate_files);
        log::debug!(
            "Hashed {} of {} file(s) into {} group(s) in {:?}",
            summary.hashed_files,
            summary.total_files,
            groups.len(),
            summary.scan_duration
        );

        Ok((groups, summary))
    }

    fn hash_sequential(
        &self,
        candidates: &[Candidate],
        groups: &mut FingerprintGroups,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        for (i, candidate) in candidates.iter().enumerate() {
            if self.config.is_shutdown_requested() {
                return Err(FinderError::Interrupted);
            }

            let result = self.hasher.full_hash(&candidate.path);
            self.report_progress(i + 1, candidate);
            self.record(groups, summary, candidate, result)?;
        }
        Ok(())
    }

    fn hash_parallel(
        &self,
        candidates: &[Candidate],
        groups: &mut FingerprintGroups,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()?;
        let done = AtomicUsize::new(0);

        log::debug!("Hashing on {} thread(s)", self.config.io_threads);

        // Collecting an indexed parallel iterator keeps candidate order.
        let results: Vec<Result<Hash, HashError>> = pool.install(|| {
            candidates
                .par_iter()
                .map(|candidate| {
                    if self.config.is_shutdown_requested() {
                        return Err(HashError::Interrupted(candidate.path.clone()));
                    }
                    let result = self.hasher.full_hash(&candidate.path);
                    let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                    self.report_progress(n, candidate);
                    result
                })
                .collect()
        });

        for (candidate, result) in candidates.iter().zip(results) {
            self.record(groups, summary, candidate, result)?;
        }
        Ok(())
    }

    /// Apply one hashing result to the group index.
    fn record(
        &self,
        groups: &mut FingerprintGroups,
        summary: &mut ScanSummary,
        candidate: &Candidate,
        result: Result<Hash, HashError>,
    ) -> Result<(), FinderError> {
        let hash = match result {
            Ok(hash) => hash,
            Err(HashError::Interrupted(_)) => return Err(FinderError::Interrupted),
            Err(e) => match self.config.hash_errors {
                ErrorPolicy::Abort => {
                    self.config.message(
                        log::Level::Error,
                        &format!("Cannot hash {}: {}", candidate.path.display(), e),
                    );
                    return Err(FinderError::Hash(e));
                }
                ErrorPolicy::Skip => {
                    self.config.message(
                        log::Level::Warn,
                        &format!("Skipping {}: {}", candidate.path.display(), e),
                    );
                    summary.skipped.push(e);
                    return Ok(());
                }
            },
        };

        summary.hashed_files += 1;
        let outcome = groups.insert(hash, candidate.clone());
        if outcome.is_duplicate() {
            let group = groups.get(outcome.group_index);
            if outcome.first_duplicate {
                log::debug!("New duplicate group {}", group.hash_hex());
            }
            self.config.message(
                log::Level::Info,
                &format!(
                    "Found identical files: {} and {}",
                    group.survivor().name,
                    candidate.name
                ),
            );
        }
        Ok(())
    }

    fn report_progress(&self, current: usize, candidate: &Candidate) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_progress(current, &candidate.path.to_string_lossy());
        }
    }
}
