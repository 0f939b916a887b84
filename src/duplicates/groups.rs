//! Fingerprint grouping.
//!
//! # Overview
//!
//! Every hashed candidate lands in exactly one [`DuplicateGroup`], keyed by
//! its SHA-256 fingerprint. [`FingerprintGroups`] keeps the groups in an
//! explicit `Vec` (first-seen fingerprint order) with a separate
//! hash-to-index map, so neither group order nor member order depends on
//! hash map iteration.
//!
//! Member 0 of a group is the survivor. Everything after it is a deletion
//! candidate.
//!
//! # Example
//!
//! ```
//! use dupsweep::duplicates::FingerprintGroups;
//! use dupsweep::scanner::Candidate;
//! use std::path::PathBuf;
//!
//! let mut groups = FingerprintGroups::new();
//! groups.insert([1; 32], Candidate::new(PathBuf::from("/x.bin")));
//! let outcome = groups.insert([1; 32], Candidate::new(PathBuf::from("/y.bin")));
//!
//! assert!(outcome.first_duplicate);
//! assert_eq!(groups.duplicate_file_count(), 1);
//! assert_eq!(groups.get(outcome.group_index).survivor().name, "x.bin");
//! ```

use std::collections::HashMap;

use crate::scanner::{hash_to_hex, Candidate, Hash};

/// All candidates that share one fingerprint, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// SHA-256 fingerprint shared by every member
    pub hash: Hash,
    /// Members in the order they were processed
    pub files: Vec<Candidate>,
}

impl DuplicateGroup {
    /// Create a new group.
    ///
    /// # Arguments
    ///
    /// * `hash` - SHA-256 content fingerprint
    /// * `files` - Members, in processing order
    #[must_use]
    pub fn new(hash: Hash, files: Vec<Candidate>) -> Self {
        Self { hash, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group holds at least two files.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.files.len() > 1
    }

    /// The member that is kept when duplicates are removed.
    ///
    /// # Panics
    ///
    /// Panics if the group is empty. Groups built by [`FingerprintGroups`]
    /// always have at least one member.
    #[must_use]
    pub fn survivor(&self) -> &Candidate {
        &self.files[0]
    }

    /// Every member except the survivor.
    #[must_use]
    pub fn deletion_candidates(&self) -> &[Candidate] {
        self.files.get(1..).unwrap_or(&[])
    }

    /// Number of duplicate copies (total - 1 survivor).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

/// What happened when a candidate was added to the group index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Index of the group the candidate joined
    pub group_index: usize,
    /// Position of the candidate within its group (0 = survivor)
    pub position: usize,
    /// True when this insert took the group from one member to two
    pub first_duplicate: bool,
}

impl InsertOutcome {
    /// Check if the inserted candidate is a duplicate of an earlier one.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.position > 0
    }
}

/// Ordered fingerprint → members index.
#[derive(Debug, Clone, Default)]
pub struct FingerprintGroups {
    groups: Vec<DuplicateGroup>,
    index: HashMap<Hash, usize>,
    duplicate_files: usize,
}

impl FingerprintGroups {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `candidate` to the group for `hash`, creating the group if needed.
    pub fn insert(&mut self, hash: Hash, candidate: Candidate) -> InsertOutcome {
        let group_index = match self.index.get(&hash) {
            Some(&i) => i,
            None => {
                let i = self.groups.len();
                self.groups.push(DuplicateGroup::new(hash, Vec::new()));
                self.index.insert(hash, i);
                i
            }
        };

        let group = &mut self.groups[group_index];
        group.files.push(candidate);
        let position = group.files.len() - 1;
        if position > 0 {
            self.duplicate_files += 1;
        }

        InsertOutcome {
            group_index,
            position,
            first_duplicate: position == 1,
        }
    }

    /// Get a group by index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> &DuplicateGroup {
        &self.groups[index]
    }

    /// Look up the group for a fingerprint.
    #[must_use]
    pub fn find(&self, hash: &Hash) -> Option<&DuplicateGroup> {
        self.index.get(hash).map(|&i| &self.groups[i])
    }

    /// Number of groups, including singletons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no candidate has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of candidates across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::len).sum()
    }

    /// Number of non-survivor members seen so far.
    #[must_use]
    pub fn duplicate_file_count(&self) -> usize {
        self.duplicate_files
    }

    /// All groups, in first-seen fingerprint order.
    pub fn iter(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter()
    }

    /// Groups with two or more members, in first-seen fingerprint order.
    pub fn duplicates(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter().filter(|g| g.is_duplicate())
    }

    /// Consume the index, keeping only duplicate groups.
    #[must_use]
    pub fn into_duplicates(self) -> Vec<DuplicateGroup> {
        self.groups
            .into_iter()
            .filter(DuplicateGroup::is_duplicate)
            .collect()
    }
}
