//! Deletion after a scan: survivors stay, copies go.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use dupsweep::actions::{delete_duplicates, DeleteConfig, DeleteError};
use dupsweep::duplicates::{DuplicateFinder, DuplicateGroup, ErrorPolicy};
use dupsweep::output::RunLog;
use dupsweep::scanner::{Collector, CollectorConfig};
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) -> PathBuf {
    File::create(path).unwrap().write_all(content).unwrap();
    path.to_path_buf()
}

fn scan(inputs: &[PathBuf]) -> Vec<DuplicateGroup> {
    let candidates = Collector::new(CollectorConfig::default())
        .collect(inputs, &mut RunLog::sink())
        .unwrap()
        .candidates;
    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&candidates)
        .unwrap();
    groups.into_duplicates()
}

#[test]
fn test_only_survivors_remain() {
    let dir = tempdir().unwrap();
    let a1 = write(&dir.path().join("a1"), b"A");
    let b = write(&dir.path().join("b"), b"B");
    let a2 = write(&dir.path().join("a2"), b"A");
    let a3 = write(&dir.path().join("a3"), b"A");

    let groups = scan(&[a1.clone(), b.clone(), a2.clone(), a3.clone()]);
    let summary = delete_duplicates(&groups, &DeleteConfig::default());

    assert_eq!(summary.deleted_count(), 2);
    assert!(summary.all_succeeded());
    assert!(a1.exists());
    assert!(b.exists());
    assert!(!a2.exists());
    assert!(!a3.exists());
    assert_eq!(fs::read(&a1).unwrap(), b"A");

    let order: Vec<_> = summary.deleted.iter().map(|r| r.path.clone()).collect();
    assert_eq!(order, vec![a2, a3]);
}

#[test]
fn test_every_survivor_keeps_its_content() {
    let dir = tempdir().unwrap();
    let mut inputs = Vec::new();
    for i in 0..9 {
        let content = format!("content {}", i % 3);
        inputs.push(write(&dir.path().join(format!("f{i}")), content.as_bytes()));
    }

    let groups = scan(&inputs);
    assert_eq!(groups.len(), 3);
    let survivors: Vec<_> = groups
        .iter()
        .map(|g| (g.survivor().path.clone(), fs::read(&g.survivor().path).unwrap()))
        .collect();

    let summary = delete_duplicates(&groups, &DeleteConfig::default());
    assert_eq!(summary.deleted_count(), 6);

    for (path, before) in survivors {
        assert_eq!(fs::read(&path).unwrap(), before);
    }
    let remaining = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(remaining, 3);
}

#[test]
fn test_rescan_after_delete_finds_nothing() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("x.bin"), b"ABC");
    write(&dir.path().join("y.bin"), b"ABC");
    let inputs = [dir.path().to_path_buf()];

    let summary = delete_duplicates(&scan(&inputs), &DeleteConfig::default());
    assert_eq!(summary.deleted_count(), 1);

    assert!(scan(&inputs).is_empty());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_vanished_copy_aborts_by_default() {
    let dir = tempdir().unwrap();
    let keep = write(&dir.path().join("keep"), b"same");
    let gone = write(&dir.path().join("gone"), b"same");
    let other = write(&dir.path().join("other"), b"same");

    let groups = scan(&[keep.clone(), gone.clone(), other.clone()]);
    fs::remove_file(&gone).unwrap();

    let summary = delete_duplicates(&groups, &DeleteConfig::default());
    assert!(summary.aborted);
    assert!(matches!(summary.abort_error(), Some(DeleteError::NotFound(p)) if *p == gone));
    assert!(keep.exists());
    assert!(other.exists());
}

#[test]
fn test_vanished_copy_skipped_on_request() {
    let dir = tempdir().unwrap();
    let keep = write(&dir.path().join("keep"), b"same");
    let gone = write(&dir.path().join("gone"), b"same");
    let other = write(&dir.path().join("other"), b"same");

    let groups = scan(&[keep.clone(), gone.clone(), other.clone()]);
    fs::remove_file(&gone).unwrap();

    let config = DeleteConfig::default().with_on_error(ErrorPolicy::Skip);
    let summary = delete_duplicates(&groups, &config);
    assert!(!summary.aborted);
    assert_eq!(summary.failure_count(), 1);
    assert_eq!(summary.deleted_count(), 1);
    assert!(keep.exists());
    assert!(!other.exists());
}

#[test]
fn test_missing_survivor_protects_copies() {
    let dir = tempdir().unwrap();
    let keep = write(&dir.path().join("keep"), b"same");
    let copy = write(&dir.path().join("copy"), b"same");

    let groups = scan(&[keep.clone(), copy.clone()]);
    fs::remove_file(&keep).unwrap();

    let config = DeleteConfig::default().with_on_error(ErrorPolicy::Skip);
    let summary = delete_duplicates(&groups, &config);
    assert_eq!(summary.deleted_count(), 0);
    assert!(matches!(
        summary.failures.as_slice(),
        [DeleteError::SurvivorMissing(p)] if *p == keep
    ));
    assert!(copy.exists());
}

#[cfg(unix)]
#[test]
fn test_symlinked_folder_keeps_only_copy() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::create_dir(&real).unwrap();
    let only = write(&real.join("only.bin"), b"unique");
    let alias = dir.path().join("alias");
    std::os::unix::fs::symlink(&real, &alias).unwrap();

    let groups = scan(&[real, alias]);
    let summary = delete_duplicates(&groups, &DeleteConfig::default());

    assert!(groups.is_empty());
    assert_eq!(summary.deleted_count(), 0);
    assert_eq!(fs::read(&only).unwrap(), b"unique");
}

#[test]
fn test_dot_dot_alias_keeps_only_copy() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("d");
    fs::create_dir(&sub).unwrap();
    let file = write(&sub.join("a.bin"), b"unique");
    let alias = sub.join("..").join("d").join("a.bin");

    let groups = scan(&[file.clone(), alias]);
    let summary = delete_duplicates(&groups, &DeleteConfig::default());

    assert!(groups.is_empty());
    assert_eq!(summary.deleted_count(), 0);
    assert_eq!(fs::read(&file).unwrap(), b"unique");
}

#[cfg(unix)]
#[test]
fn test_symlinked_survivor_keeps_target() {
    let dir = tempdir().unwrap();
    let target = write(&dir.path().join("z_real.bin"), b"unique");
    let link = dir.path().join("a_link.bin");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    // As explicit arguments, and as entries of their folder.
    for inputs in [vec![link.clone(), target.clone()], vec![dir.path().to_path_buf()]] {
        let groups = scan(&inputs);
        let summary = delete_duplicates(&groups, &DeleteConfig::default());

        assert!(groups.is_empty());
        assert_eq!(summary.deleted_count(), 0);
        assert_eq!(fs::read(&link).unwrap(), b"unique");
        assert_eq!(fs::read(&target).unwrap(), b"unique");
    }
}

#[cfg(unix)]
#[test]
fn test_followed_symlinks_still_keep_only_copy() {
    let dir = tempdir().unwrap();
    let target = write(&dir.path().join("z_real.bin"), b"unique");
    let link = dir.path().join("a_link.bin");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let candidates = Collector::new(CollectorConfig::default().with_follow_symlinks(true))
        .collect(&[dir.path().to_path_buf()], &mut RunLog::sink())
        .unwrap()
        .candidates;
    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&candidates)
        .unwrap();
    let summary = delete_duplicates(&groups.into_duplicates(), &DeleteConfig::default());

    assert_eq!(summary.deleted_count(), 0);
    assert_eq!(fs::read(&target).unwrap(), b"unique");
}
