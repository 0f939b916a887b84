//! End-to-end collection and grouping.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use dupsweep::duplicates::{DuplicateFinder, ErrorPolicy, FinderConfig, FinderError};
use dupsweep::output::RunLog;
use dupsweep::scanner::{hash_to_hex, Candidate, Collector, CollectorConfig, Hasher};
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) -> PathBuf {
    File::create(path).unwrap().write_all(content).unwrap();
    path.to_path_buf()
}

fn collect(inputs: &[PathBuf]) -> Vec<Candidate> {
    Collector::new(CollectorConfig::default())
        .collect(inputs, &mut RunLog::sink())
        .unwrap()
        .candidates
}

#[test]
fn test_two_identical_files_in_one_folder() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("x.bin"), b"ABC");
    write(&dir.path().join("y.bin"), b"ABC");

    let candidates = collect(&[dir.path().to_path_buf()]);
    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&candidates)
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(summary.duplicate_files, 1);
    let group = groups.get(0);
    assert_eq!(group.len(), 2);
    assert_eq!(
        group.hash_hex(),
        "b5d4045c3f466fa91fe2cc6abe79232a1a57cdf104f7a26e716e0a1e2789df78"
    );
    // Survivor is whichever the listing produced first.
    assert_eq!(group.survivor(), &candidates[0]);
}

#[test]
fn test_mixed_content_groups_by_fingerprint() {
    let dir = tempdir().unwrap();
    let a1 = write(&dir.path().join("a1"), b"A");
    let b = write(&dir.path().join("b"), b"B");
    let a2 = write(&dir.path().join("a2"), b"A");

    let candidates = collect(&[a1.clone(), b.clone(), a2.clone()]);
    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&candidates)
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.duplicate_files, 1);

    let dup: Vec<_> = groups.duplicates().collect();
    assert_eq!(dup.len(), 1);
    let paths: Vec<_> = dup[0].files.iter().map(|c| c.path.clone()).collect();
    assert_eq!(paths, vec![a1, a2]);
    assert_eq!(groups.get(1).files[0].path, b);
}

#[test]
fn test_survivor_follows_argument_order() {
    let dir = tempdir().unwrap();
    let first = write(&dir.path().join("first"), b"same bytes");
    let second = write(&dir.path().join("second"), b"same bytes");

    let forward = collect(&[first.clone(), second.clone()]);
    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&forward)
        .unwrap();
    assert_eq!(groups.get(0).survivor().path, first);

    let backward = collect(&[second.clone(), first]);
    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&backward)
        .unwrap();
    assert_eq!(groups.get(0).survivor().path, second);
}

#[test]
fn test_empty_folder_yields_nothing() {
    let dir = tempdir().unwrap();

    let candidates = collect(&[dir.path().to_path_buf()]);
    assert!(candidates.is_empty());

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&candidates)
        .unwrap();
    assert!(groups.is_empty());
    assert!(!summary.has_duplicates());
}

#[test]
fn test_invalid_input_does_not_block_valid_ones() {
    let dir = tempdir().unwrap();
    let a = write(&dir.path().join("a"), b"dup");
    let b = write(&dir.path().join("b"), b"dup");

    let candidates = collect(&[a, PathBuf::from("/no/such/input"), b]);
    let (_, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&candidates)
        .unwrap();

    assert_eq!(summary.duplicate_files, 1);
}

#[test]
fn test_rescan_is_idempotent() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("one"), b"1");
    write(&dir.path().join("two"), b"1");
    write(&dir.path().join("three"), b"3");

    let inputs = [dir.path().to_path_buf()];
    let (first, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&collect(&inputs))
        .unwrap();
    let (second, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&collect(&inputs))
        .unwrap();

    let first: Vec<_> = first.iter().cloned().collect();
    let second: Vec<_> = second.iter().cloned().collect();
    assert_eq!(first, second);
}

#[test]
fn test_files_larger_than_one_chunk() {
    let dir = tempdir().unwrap();
    let big: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let mut other = big.clone();
    *other.last_mut().unwrap() ^= 0xFF;

    let a = write(&dir.path().join("a"), &big);
    let b = write(&dir.path().join("b"), &big);
    let c = write(&dir.path().join("c"), &other);

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&collect(&[a, b, c]))
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(summary.duplicate_files, 1);
}

#[test]
fn test_parallel_hashing_matches_sequential() {
    let dir = tempdir().unwrap();
    let inputs: Vec<PathBuf> = (0..20)
        .map(|i| write(&dir.path().join(format!("f{i:02}")), &[(i % 4) as u8; 64]))
        .collect();
    let candidates = collect(&inputs);

    let (sequential, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&candidates)
        .unwrap();
    let (parallel, _) = DuplicateFinder::new(FinderConfig::default().with_io_threads(4))
        .find_duplicates(&candidates)
        .unwrap();

    let sequential: Vec<_> = sequential.iter().cloned().collect();
    let parallel: Vec<_> = parallel.iter().cloned().collect();
    assert_eq!(sequential, parallel);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_under_each_policy() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let a = write(&dir.path().join("a"), b"same");
    let locked = write(&dir.path().join("locked"), b"same");
    let b = write(&dir.path().join("b"), b"same");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything; nothing to test then.
    if File::open(&locked).is_ok() {
        return;
    }

    let candidates = collect(&[a, locked.clone(), b]);

    let aborted = DuplicateFinder::with_defaults().find_duplicates(&candidates);
    assert!(matches!(aborted, Err(FinderError::Hash(_))));

    let (groups, summary) =
        DuplicateFinder::new(FinderConfig::default().with_hash_errors(ErrorPolicy::Skip))
            .find_duplicates(&candidates)
            .unwrap();
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].path(), locked.as_path());
    assert_eq!(groups.file_count(), 2);
    assert_eq!(summary.duplicate_files, 1);

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o644)).unwrap();
}

#[test]
fn test_group_fingerprint_matches_direct_hash() {
    let dir = tempdir().unwrap();
    let a = write(&dir.path().join("a"), b"fingerprint me");
    let b = write(&dir.path().join("b"), b"fingerprint me");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&collect(&[a.clone(), b]))
        .unwrap();

    let direct = Hasher::new().full_hash(&a).unwrap();
    assert_eq!(groups.get(0).hash_hex(), hash_to_hex(&direct));
}
