use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_canonicalize() {
    Command::cargo_bin("ucum")
        .unwrap()
        .arg("canonicalize")
        .arg("Ohm")
        .assert()
        .success()
        .stdout(predicate::str::contains("C-2.g.m2.s-1"))
        .stdout(predicate::str::contains("1000"));
}

#[test]
fn test_cli_print_styles() {
    Command::cargo_bin("ucum")
        .unwrap()
        .args(["print", "kg.m/s2", "--style", "wolfram"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kg * m / s^2"));
}

#[test]
fn test_cli_check() {
    Command::cargo_bin("ucum")
        .unwrap()
        .args(["check", "N", "kg.m/s2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("equal"));

    Command::cargo_bin("ucum")
        .unwrap()
        .args(["check", "m", "s"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not commensurable"));
}
