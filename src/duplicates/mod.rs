//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Streaming SHA-256 hashing of every candidate
//! - Fingerprint grouping in first-seen order
//! - Duplicate group management (survivor and deletion candidates)

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, ErrorPolicy, FinderConfig, FinderError, ScanSummary};
pub use groups::{DuplicateGroup, FingerprintGroups, InsertOutcome};
