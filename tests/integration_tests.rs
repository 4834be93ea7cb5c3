//! Integration tests for the deepdiff CLI tool.
//!
//! These tests verify the complete end-to-end behavior of the CLI,
//! including argument parsing, file processing, and output formatting.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a Command for the deepdiff binary
fn deepdiff() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("deepdiff"))
}

#[test]
fn test_identical_files_exit_0() {
    deepdiff()
        .arg("tests/fixtures/identical_1.json")
        .arg("tests/fixtures/identical_2.json")
        .assert()
        .success()
        .code(0)
        .stdout(predicate::str::contains("No differences"));
}

#[test]
fn test_different_files_exit_1() {
    deepdiff()
        .arg("tests/fixtures/modified_old.json")
        .arg("tests/fixtures/modified_new.json")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("age"));
}

#[test]
fn test_file_not_found_exit_2() {
    deepdiff()
        .arg("tests/fixtures/nonexistent.json")
        .arg("tests/fixtures/identical_1.json")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_modified_field() {
    deepdiff()
        .arg("tests/fixtures/modified_old.json")
        .arg("tests/fixtures/modified_new.json")
        .arg("--format=plain")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("age: 30 != 31"))
        .stdout(predicate::str::contains("Summary: 1 difference"));
}

#[test]
fn test_nested_changes() {
    deepdiff()
        .arg("tests/fixtures/nested_old.json")
        .arg("tests/fixtures/nested_new.json")
        .arg("--format=plain")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("server.ports.#1: 443 != 8443"))
        .stdout(predicate::str::contains("server.tls.enabled: false != true"));
}

#[test]
fn test_max_depth_limits_walk() {
    deepdiff()
        .arg("tests/fixtures/nested_old.json")
        .arg("tests/fixtures/nested_new.json")
        .arg("--max-depth=4")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No differences"));
}

#[test]
fn test_array_changes_capped_by_default() {
    deepdiff()
        .arg("tests/fixtures/array_old.json")
        .arg("tests/fixtures/array_new.json")
        .arg("--format=plain")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("items.#0: 1 != 0"))
        .stdout(predicate::str::contains("items.#9: 10 != 0"))
        .stdout(predicate::str::contains("items.#10").not())
        .stdout(predicate::str::contains("Summary: 10 differences"));
}

#[test]
fn test_max_diff_flag() {
    deepdiff()
        .arg("tests/fixtures/array_old.json")
        .arg("tests/fixtures/array_new.json")
        .arg("--format=plain")
        .arg("--max-diff=3")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Summary: 3 differences"));
}

#[test]
fn test_invalid_max_diff_exit_2() {
    deepdiff()
        .arg("tests/fixtures/modified_old.json")
        .arg("tests/fixtures/modified_new.json")
        .arg("--max-diff=0")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_float_precision_flag() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old.json");
    let new = dir.path().join("new.json");
    std::fs::write(&old, r#"{"pi": 3.14159}"#).unwrap();
    std::fs::write(&new, r#"{"pi": 3.14158}"#).unwrap();

    deepdiff().arg(&old).arg(&new).assert().code(1);

    deepdiff()
        .arg(&old)
        .arg(&new)
        .arg("--float-precision=3")
        .assert()
        .code(0);
}

#[test]
fn test_type_change() {
    deepdiff()
        .arg("tests/fixtures/type_old.json")
        .arg("tests/fixtures/type_new.json")
        .arg("--format=plain")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("count: f64 != String"));
}

#[test]
fn test_log_errors_flag() {
    deepdiff()
        .arg("tests/fixtures/type_old.json")
        .arg("tests/fixtures/type_new.json")
        .arg("--log-errors")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("values are different types"));
}

#[test]
fn test_json_output_format() {
    deepdiff()
        .arg("tests/fixtures/modified_old.json")
        .arg("tests/fixtures/modified_new.json")
        .arg("--format=json")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"age: 30 != 31\""));
}

#[test]
fn test_map_json_output_format() {
    let output = deepdiff()
        .arg("tests/fixtures/modified_old.json")
        .arg("tests/fixtures/modified_new.json")
        .arg("--format=json")
        .arg("--map")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!({"age": {"old_value": 30.0, "new_value": 31.0}})
    );
}

#[test]
fn test_map_plain_output_format() {
    deepdiff()
        .arg("tests/fixtures/modified_old.json")
        .arg("tests/fixtures/modified_new.json")
        .arg("--format=plain")
        .arg("--map")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("age: 30 → 31"));
}

#[test]
fn test_plain_output_format() {
    deepdiff()
        .arg("tests/fixtures/modified_old.json")
        .arg("tests/fixtures/modified_new.json")
        .arg("--format=plain")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_verbose_flag() {
    deepdiff()
        .arg("tests/fixtures/identical_1.json")
        .arg("tests/fixtures/identical_2.json")
        .arg("--verbose")
        .assert()
        .success()
        .stderr(predicate::str::contains("Parsing"))
        .stderr(predicate::str::contains("Computing diff"));
}

#[test]
fn test_quiet_flag() {
    deepdiff()
        .arg("tests/fixtures/modified_old.json")
        .arg("tests/fixtures/modified_new.json")
        .arg("--quiet")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("age"))
        .stdout(predicate::str::contains("Summary").not());
}

#[test]
fn test_help_flag() {
    deepdiff()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deep structural comparison"))
        .stdout(predicate::str::contains("--max-depth"));
}

#[test]
fn test_version_flag() {
    deepdiff()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("deepdiff"));
}

#[test]
fn test_max_value_length() {
    deepdiff()
        .arg("tests/fixtures/mixed.json")
        .arg("tests/fixtures/mixed.toml")
        .arg("--format=plain")
        .arg("--map")
        .arg("--max-value-length=3")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("features.#2: ... → ..."));
}

#[test]
fn test_mixed_json_yaml() {
    deepdiff()
        .arg("tests/fixtures/mixed.json")
        .arg("tests/fixtures/mixed.yaml")
        .assert()
        .code(0);
}

#[test]
fn test_mixed_json_toml() {
    deepdiff()
        .arg("tests/fixtures/mixed.json")
        .arg("tests/fixtures/mixed.toml")
        .arg("--format=plain")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("features.#2: toml != [empty value]"));
}

#[test]
fn test_stdin_input() {
    let content = std::fs::read_to_string("tests/fixtures/modified_new.json").unwrap();
    deepdiff()
        .arg("tests/fixtures/modified_old.json")
        .arg("-")
        .arg("--format=plain")
        .write_stdin(content)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("age: 30 != 31"));
}

#[test]
fn test_both_stdin_rejected() {
    deepdiff()
        .arg("-")
        .arg("-")
        .write_stdin("{}")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("stdin"));
}

#[test]
fn test_invalid_file_format() {
    deepdiff()
        .arg("tests/fixtures/invalid.txt")
        .arg("tests/fixtures/identical_1.json")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Could not detect file format"));
}
