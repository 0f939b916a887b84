//! Whole-run tests through `run_app`.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use dupsweep::cli::Cli;
use dupsweep::error::ExitCode;
use dupsweep::run_app;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) -> PathBuf {
    File::create(path).unwrap().write_all(content).unwrap();
    path.to_path_buf()
}

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["dupsweep", "--no-progress", "-q"];
    full.extend_from_slice(args);
    Cli::parse_from(full)
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_report_only_run() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let a = write(&dir.path().join("a"), b"A");
    let b = write(&dir.path().join("b"), b"A");
    let output = out_dir.path().join("result.txt");

    let code = run_app(cli(&[s(&a), s(&b), "-o", s(&output)])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        format!("Duplicate files:\n    {}\n    {}\n", a.display(), b.display())
    );
    assert!(a.exists());
    assert!(b.exists());
}

#[test]
fn test_folder_run_logs_folder_then_groups() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    write(&dir.path().join("x.bin"), b"ABC");
    write(&dir.path().join("y.bin"), b"ABC");
    write(&dir.path().join("z.bin"), b"XYZ");
    let output = out_dir.path().join("run.txt");

    let code = run_app(cli(&[s(dir.path()), "-o", s(&output)])).unwrap();
    assert_eq!(code, ExitCode::Success);

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        format!("Processing folder: {}", dir.path().display())
    );
    assert_eq!(lines[1], "Duplicate files:");
    assert!(lines[2].starts_with("    ") && lines[2].ends_with(".bin"));
    assert!(lines[3].starts_with("    ") && lines[3].ends_with(".bin"));
    assert!(!text.contains("z.bin"));
}

#[test]
fn test_delete_with_yes_removes_copies() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let keep = write(&dir.path().join("keep"), b"payload");
    let copy = write(&dir.path().join("copy"), b"payload");
    let unique = write(&dir.path().join("unique"), b"other");
    let output = out_dir.path().join("result.txt");

    let code = run_app(cli(&[
        s(&keep),
        s(&copy),
        s(&unique),
        "--delete",
        "-y",
        "-o",
        s(&output),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(keep.exists());
    assert!(!copy.exists());
    assert!(unique.exists());
    assert_eq!(fs::read(&keep).unwrap(), b"payload");

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("Duplicate files:\n"));
    assert!(text.ends_with("Deleted 1 files.\n"));
}

#[test]
fn test_nothing_to_process() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let output = out_dir.path().join("result.txt");

    let code = run_app(cli(&[s(dir.path()), "-o", s(&output)])).unwrap();

    assert_eq!(code, ExitCode::NothingToProcess);
    assert_eq!(code.as_i32(), 0);
    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text, format!("Processing folder: {}\n", dir.path().display()));
}

#[test]
fn test_type_filter_on_command_line() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    write(&dir.path().join("a.jpg"), b"img");
    write(&dir.path().join("a.txt"), b"img");
    write(&dir.path().join("b.txt"), b"img");
    let output = out_dir.path().join("result.txt");

    run_app(cli(&[s(dir.path()), "-t", ".jpg", "-o", s(&output)])).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(!text.contains("Duplicate files:"));
}

#[test]
fn test_output_is_truncated_each_run() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let only = write(&dir.path().join("only"), b"alone");
    let output = write(&out_dir.path().join("result.txt"), b"stale content\n");

    run_app(cli(&[s(&only), "-o", s(&output)])).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn test_unwritable_output_is_fatal() {
    let dir = tempdir().unwrap();
    let file = write(&dir.path().join("f"), b"f");
    let output = dir.path().join("missing-dir").join("result.txt");

    assert!(run_app(cli(&[s(&file), "-o", s(&output)])).is_err());
}

#[test]
fn test_missing_config_file_is_fatal() {
    let dir = tempdir().unwrap();
    let file = write(&dir.path().join("f"), b"f");
    let output = dir.path().join("result.txt");
    let config = dir.path().join("nope.toml");

    let result = run_app(cli(&[s(&file), "-o", s(&output), "--config", s(&config)]));
    assert!(result.is_err());
}

#[test]
fn test_config_file_supplies_types() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let a = write(&dir.path().join("a.md"), b"doc");
    let b = write(&dir.path().join("b.md"), b"doc");
    write(&dir.path().join("c.txt"), b"doc");
    let config = write(
        &out_dir.path().join("config.toml"),
        b"types = [\".md\"]\nio_threads = 2\n",
    );
    let output = out_dir.path().join("result.txt");

    run_app(cli(&[
        s(&a),
        s(&b),
        s(&dir.path().join("c.txt")),
        "-o",
        s(&output),
        "--config",
        s(&config),
    ]))
    .unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        format!("Duplicate files:\n    {}\n    {}\n", a.display(), b.display())
    );
}
