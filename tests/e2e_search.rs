//! End-to-end CLI flows over real fixture files (no mocks).

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Three 2-wide descriptors: rows 0 and 1 identical, row 2 far away.
const SMALL_FIXTURE: &str = "3\n2\n0.0,0.0,\n0.0,0.0,\n100.0,100.0,\n";

/// Fixture with the default 192-wide descriptors: rows 0 and 2 are
/// identical, row 1 is offset by 1.0 in every component (distance
/// sqrt(192) ~= 13.86).
fn default_width_fixture() -> String {
    let zeros: String = (0..192).map(|_| "0.0,").collect();
    let ones: String = (0..192).map(|_| "1.0,").collect();
    format!("3\n192\n{zeros}\n{ones}\n{zeros}\n")
}

#[test]
fn search_writes_single_match_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "summaries.dat", SMALL_FIXTURE);

    Command::cargo_bin("neardup")
        .unwrap()
        .arg("search")
        .arg(&input)
        .args(["--threshold", "1.0", "--workers", "2", "--dimension", "2"])
        .assert()
        .success()
        .stdout("0,0,1\n");
}

#[test]
fn search_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "summaries.dat", SMALL_FIXTURE);
    let output = dir.path().join("matches.dat");

    Command::cargo_bin("neardup")
        .unwrap()
        .arg("search")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--threshold", "1.0", "--workers", "1", "--dimension", "2"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "0,0,1\n");
}

#[test]
fn search_with_default_width_descriptors() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "summaries.dat", &default_width_fixture());

    // Threshold above sqrt(192): every pair qualifies, in scan order
    // for a single worker.
    Command::cargo_bin("neardup")
        .unwrap()
        .arg("search")
        .arg(&input)
        .args(["--threshold", "20.0", "--workers", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0,0,2"))
        .stdout(predicate::function(|out: &str| out.lines().count() == 3));

    // Threshold below it: only the identical pair survives.
    Command::cargo_bin("neardup")
        .unwrap()
        .arg("search")
        .arg(&input)
        .args(["--threshold", "1.0", "--workers", "4"])
        .assert()
        .success()
        .stdout("0,0,2\n");
}

#[test]
fn dimension_mismatch_is_fatal_before_output() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "summaries.dat", SMALL_FIXTURE);
    let output = dir.path().join("matches.dat");

    // Default expected width is 192; the fixture declares 2.
    Command::cargo_bin("neardup")
        .unwrap()
        .arg("search")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("descriptor width"));

    assert!(!output.exists(), "no output may be produced on a fatal error");
}

#[test]
fn single_descriptor_yields_empty_output() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "summaries.dat", "1\n2\n1.0,2.0,\n");

    Command::cargo_bin("neardup")
        .unwrap()
        .arg("search")
        .arg(&input)
        .args(["--threshold", "10.0", "--dimension", "2"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn malformed_input_is_reported() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "summaries.dat", "2\n2\n1.0,oops,\n3.0,4.0,\n");

    Command::cargo_bin("neardup")
        .unwrap()
        .arg("search")
        .arg(&input)
        .args(["--dimension", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn missing_input_file_is_reported() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("neardup")
        .unwrap()
        .arg("search")
        .arg(dir.path().join("nope.dat"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("open dataset file"));
}

#[test]
fn zero_workers_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "summaries.dat", SMALL_FIXTURE);

    Command::cargo_bin("neardup")
        .unwrap()
        .arg("search")
        .arg(&input)
        .args(["--workers", "0", "--dimension", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("worker count"));
}

#[test]
fn completions_generate() {
    Command::cargo_bin("neardup")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("neardup"));
}
