use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_convert() {
    Command::cargo_bin("ucum")
        .unwrap()
        .args(["convert", "1", "[in_i]", "m"])
        .assert()
        .success()
        .stdout(predicate::str::contains("= 0.0254 m"));

    Command::cargo_bin("ucum")
        .unwrap()
        .args(["convert", "5", "Cel", "K"])
        .assert()
        .success()
        .stdout(predicate::str::contains("278.15"));
}

#[test]
fn test_cli_convert_fahrenheit_is_exact() {
    Command::cargo_bin("ucum")
        .unwrap()
        .args(["convert", "100", "Cel", "[degF]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("= 212 [degF]"));
}

#[test]
fn test_cli_convert_with_molar_mass() {
    Command::cargo_bin("ucum")
        .unwrap()
        .args(["convert", "1", "mol", "g", "--molar-mass", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("= 5 g"));

    Command::cargo_bin("ucum")
        .unwrap()
        .args(["convert", "1", "mol", "g"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MissingMolarMass"));
}

#[test]
fn test_cli_convert_rejects_out_of_range_literal() {
    Command::cargo_bin("ucum")
        .unwrap()
        .args(["convert", "1e999999999999", "m", "cm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidNumber"));
}

#[test]
fn test_cli_convert_json() {
    let output = Command::cargo_bin("ucum")
        .unwrap()
        .args(["--json", "convert", "1", "[in_i]2", "cm2"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["value"], "6.4516");
    assert_eq!(value["to"], "cm2");
}
