//! CLI-level coverage of the exit-code table.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn ucl() -> Command {
    Command::cargo_bin("ucl").expect("binary builds")
}

#[test]
fn missing_input_file_exits_66() {
    ucl()
        .args(["--in", "/no/such/file.conf"])
        .assert()
        .code(66)
        .stderr(predicate::str::contains("input file not found"));
}

#[test]
fn malformed_document_exits_65() {
    let mut input = tempfile::NamedTempFile::new().unwrap();
    writeln!(input, "key = ;").unwrap();
    ucl()
        .args(["--in", input.path().to_str().unwrap()])
        .assert()
        .code(65);
}

#[test]
fn valid_document_round_trips_to_json() {
    let mut input = tempfile::NamedTempFile::new().unwrap();
    writeln!(input, "port = 80;").unwrap();
    ucl()
        .args(["--in", input.path().to_str().unwrap(), "--format", "compact_json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"port\":80"));
}

#[test]
fn schema_violation_exits_65() {
    let mut input = tempfile::NamedTempFile::new().unwrap();
    writeln!(input, "port = \"not-a-number\";").unwrap();
    let mut schema = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        schema,
        r#"{{"properties": {{"port": {{"type": "integer"}}}}}}"#
    )
    .unwrap();
    ucl()
        .args([
            "--in",
            input.path().to_str().unwrap(),
            "--schema",
            schema.path().to_str().unwrap(),
        ])
        .assert()
        .code(65);
}

#[test]
fn output_is_written_to_the_requested_file() {
    let mut input = tempfile::NamedTempFile::new().unwrap();
    writeln!(input, "port = 80;").unwrap();
    let output = tempfile::NamedTempFile::new().unwrap();
    ucl()
        .args([
            "--in",
            input.path().to_str().unwrap(),
            "--out",
            output.path().to_str().unwrap(),
            "--format",
            "compact_json",
        ])
        .assert()
        .success();
    let written = std::fs::read_to_string(output.path()).unwrap();
    assert!(written.contains("\"port\":80"));
}
