use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_validate() {
    Command::cargo_bin("ucum")
        .unwrap()
        .arg("validate")
        .arg("kg.m/s2")
        .assert()
        .success()
        .stdout(predicate::str::contains("kg.m/s2 is valid"));
}

#[test]
fn test_cli_validate_syntax_error() {
    Command::cargo_bin("ucum")
        .unwrap()
        .arg("validate")
        .arg("m s")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Syntax error"))
        .stderr(predicate::str::contains("m.s"));
}

#[test]
fn test_cli_unresolved_symbol_suggestions() {
    Command::cargo_bin("ucum")
        .unwrap()
        .arg("validate")
        .arg("in_i")
        .assert()
        .failure()
        .stderr(predicate::str::contains("[in_i]"));
}

#[test]
fn test_cli_feature_flag_switch() {
    Command::cargo_bin("ucum")
        .unwrap()
        .args(["validate", "k[in_i]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NonMetricPrefix"));

    Command::cargo_bin("ucum")
        .unwrap()
        .args(["--prefix-on-non-metric", "validate", "k[in_i]"])
        .assert()
        .success();
}

#[test]
fn test_cli_rejects_huge_exponents() {
    Command::cargo_bin("ucum")
        .unwrap()
        .args(["validate", "[in_i]2000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Resource limit exceeded: max_exponent"));
}
