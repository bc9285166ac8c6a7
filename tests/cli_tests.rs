//! Integration tests for the flagform CLI
//!
//! These tests run the actual binary against YAML form definitions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const PROFILE_FORM: &str = r#"
fields:
  - key: name
    name: Name
    description: Your name
  - key: active
    name: Active
    type: boolean
  - key: tags
    name: Tags
    type: array
    required: false
  - key: region
    name: Region
    type: options
    options:
      eu: Europe
      us: United States
    default: eu
    value_keys: [location, region]
"#;

/// Get the binary to test
fn flagform_cmd() -> Command {
    Command::cargo_bin("flagform").unwrap()
}

fn write_form(dir: &TempDir, yaml: &str) -> PathBuf {
    let path = dir.path().join("form.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn test_help_flag() {
    flagform_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve form fields"));
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_valid_form() {
    let temp_dir = TempDir::new().unwrap();
    let form = write_form(&temp_dir, PROFILE_FORM);

    flagform_cmd()
        .args(["check", form.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"))
        .stdout(predicate::str::contains("--name"))
        .stdout(predicate::str::contains("[options]"));
}

#[test]
fn test_check_unknown_field_key() {
    let temp_dir = TempDir::new().unwrap();
    let form = write_form(
        &temp_dir,
        "fields:\n  - key: name\n    name: Name\n    colour: red\n",
    );

    flagform_cmd()
        .args(["check", form.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized config key: colour"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_check_invalid_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let form = write_form(&temp_dir, "fields: [unclosed\n");

    flagform_cmd()
        .args(["check", form.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YAML parse error"));
}

#[test]
fn test_check_missing_file() {
    flagform_cmd()
        .args(["check", "/nonexistent/flagform/form.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

// ============================================================================
// resolve
// ============================================================================

#[test]
fn test_resolve_prints_json() {
    let temp_dir = TempDir::new().unwrap();
    let form = write_form(&temp_dir, PROFILE_FORM);

    let output = flagform_cmd()
        .args(["resolve", "-n", form.to_str().unwrap(), "--", "--name=Alice", "--tags", "a,b"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let values: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        values,
        serde_json::json!({
            "name": "Alice",
            "active": true,
            "tags": ["a", "b"],
            "location": {"region": "eu"}
        })
    );
}

#[test]
fn test_resolve_boolean_flag_values() {
    let temp_dir = TempDir::new().unwrap();
    let form = write_form(&temp_dir, PROFILE_FORM);

    flagform_cmd()
        .args(["resolve", "-n", form.to_str().unwrap(), "--", "--name", "Bob", "--active=no"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""active": false"#));
}

#[test]
fn test_resolve_missing_required() {
    let temp_dir = TempDir::new().unwrap();
    let form = write_form(&temp_dir, PROFILE_FORM);

    flagform_cmd()
        .args(["resolve", "--no-interaction", form.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--name is required"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_resolve_invalid_option() {
    let temp_dir = TempDir::new().unwrap();
    let form = write_form(&temp_dir, PROFILE_FORM);

    flagform_cmd()
        .args(["resolve", "-n", form.to_str().unwrap(), "--", "--name", "Eve", "--region", "apac"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("apac is not one of: eu, us"));
}

#[test]
fn test_resolve_unknown_flag_is_rejected_by_parser() {
    let temp_dir = TempDir::new().unwrap();
    let form = write_form(&temp_dir, PROFILE_FORM);

    flagform_cmd()
        .args(["resolve", "-n", form.to_str().unwrap(), "--", "--nickname", "E"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--nickname"));
}

#[test]
fn test_resolve_not_applicable_flag() {
    let temp_dir = TempDir::new().unwrap();
    let form = write_form(
        &temp_dir,
        r#"
fields:
  - key: mode
    name: Mode
    default: basic
  - key: level
    name: Level
    conditions:
      mode: advanced
"#,
    );

    flagform_cmd()
        .args(["resolve", "-n", form.to_str().unwrap(), "--", "--level", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--level is not applicable"));

    flagform_cmd()
        .args(["resolve", "-n", form.to_str().unwrap(), "--", "--mode", "advanced", "--level", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""level": "3""#));
}

#[test]
fn test_resolve_without_terminal_does_not_prompt() {
    let temp_dir = TempDir::new().unwrap();
    let form = write_form(&temp_dir, PROFILE_FORM);

    // stdin is not a terminal, so no question is asked even without -n
    flagform_cmd()
        .args(["resolve", form.to_str().unwrap()])
        .write_stdin("Alice\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--name is required"));
}
