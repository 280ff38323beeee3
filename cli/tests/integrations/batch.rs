use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cli_batch() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("units.txt");
    fs::write(&file, "# vitals\nmm[Hg]\n/min\n\nCel\n").unwrap();

    Command::cargo_bin("ucum")
        .unwrap()
        .arg("batch")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("mm[Hg]"))
        .stdout(predicate::str::contains("Cel"));
}

#[test]
fn test_cli_batch_reports_failures() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("units.txt");
    fs::write(&file, "m\nfoo\n").unwrap();

    Command::cargo_bin("ucum")
        .unwrap()
        .arg("batch")
        .arg(&file)
        .assert()
        .failure()
        .stdout(predicate::str::contains("foo"))
        .stderr(predicate::str::contains("1 of 2 expressions are invalid"));
}
