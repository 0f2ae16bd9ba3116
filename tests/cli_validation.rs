//! CLI argument validation tests
//!
//! Argument errors must be reported before any tool runs or file is written.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

/// Helper function to create a test command
fn create_test_cmd() -> Command {
    let mut cmd = Command::cargo_bin("netstats").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("ENABLE_COLOR");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    create_test_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ping"))
        .stdout(predicate::str::contains("traceroute"));
}

#[test]
fn test_version_flag() {
    create_test_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_traceroute_help_shows_options() {
    create_test_cmd()
        .args(["traceroute", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--num-runs"))
        .stdout(predicate::str::contains("--run-delay"))
        .stdout(predicate::str::contains("--max-hops"))
        .stdout(predicate::str::contains("--test"));
}

#[test]
fn test_output_arguments_are_required() {
    create_test_cmd()
        .args(["ping", "-t", "example.com", "-g", "p.svg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_invalid_delay_rejected() {
    create_test_cmd()
        .args(["ping", "-t", "example.com", "-d", "-1", "-o", "p.json", "-g", "p.svg"])
        .assert()
        .failure();

    create_test_cmd()
        .args(["traceroute", "-t", "example.com", "-d", "soon", "-o", "t.json", "-g", "t.svg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid number of seconds"));
}

#[test]
fn test_zero_counts_rejected() {
    let out = TempDir::new().unwrap();

    create_test_cmd()
        .current_dir(out.path())
        .args(["ping", "-t", "example.com", "-m", "0", "-o", "p.json", "-g", "p.svg"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--max-pings must be greater than 0"));

    create_test_cmd()
        .current_dir(out.path())
        .args(["traceroute", "-t", "example.com", "-n", "0", "-o", "t.json", "-g", "t.svg"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--num-runs must be greater than 0"));

    assert!(!out.path().join("p.json").exists());
    assert!(!out.path().join("t.json").exists());
}

#[test]
fn test_invalid_enable_color_env() {
    let out = TempDir::new().unwrap();

    create_test_cmd()
        .current_dir(out.path())
        .env("ENABLE_COLOR", "sometimes")
        .args(["traceroute", "-t", "example.com", "-o", "t.json", "-g", "t.svg"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ENABLE_COLOR"));
}

#[test]
fn test_missing_fixture_directory() {
    let out = TempDir::new().unwrap();

    create_test_cmd()
        .current_dir(out.path())
        .args(["traceroute", "--test", "no-such-dir", "-o", "t.json", "-g", "t.svg"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("no-such-dir"));
}
