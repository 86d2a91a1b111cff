//! Smoke tests for the spm CLI.
//!
//! These tests verify basic CLI functionality:
//! - `spm --version` outputs version info
//! - `spm --help` outputs help text
//! - `spm` (no args) prints usage and fails

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the spm binary.
fn spm() -> Command {
    Command::new(env!("CARGO_BIN_EXE_spm"))
}

#[test]
fn test_version_flag() {
    spm()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("spm"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    spm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("board"))
        .stdout(predicate::str::contains("roadmap"));
}

#[test]
fn test_no_args_prints_usage() {
    spm()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    spm()
        .args(["board", "list", "-q", "-v"])
        .assert()
        .failure();
}
