//! Argument parsing, help and version output.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn studioctl() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("studioctl"))
}

#[test]
fn test_no_args_prints_help_and_fails() {
    studioctl()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("SageMaker Studio"));
}

#[test]
fn test_help_lists_every_command() {
    let output = studioctl().arg("--help").output().expect("run studioctl");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for cmd in [
        "domains",
        "apps",
        "sessions",
        "terminate",
        "cache",
        "config",
        "version",
    ] {
        assert!(stdout.contains(cmd), "help is missing {cmd}:\n{stdout}");
    }
}

#[test]
fn test_version_flag() {
    studioctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_command_human() {
    studioctl()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "studioctl {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json() {
    let output = studioctl()
        .args(["version", "--json"])
        .output()
        .expect("run studioctl");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_apps_requires_a_subcommand() {
    studioctl()
        .arg("apps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("list"))
        .stderr(predicate::str::contains("terminate"));
}

#[test]
fn test_apps_list_requires_region() {
    studioctl()
        .args(["apps", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--region"));
}

#[test]
fn test_terminate_rejects_both_user_and_space() {
    studioctl()
        .args([
            "terminate",
            "--region",
            "us-east-1",
            "--domain",
            "d-abc",
            "--user",
            "alice",
            "--space",
            "team",
            "--app-name",
            "kg",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_sessions_as_user_needs_a_space() {
    studioctl()
        .args([
            "sessions",
            "--region",
            "us-east-1",
            "--domain",
            "d-abc",
            "--user",
            "alice",
            "--as-user",
            "bob",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"))
        .stderr(predicate::str::contains("CreatePresignedDomainUrl").not());
}

#[test]
fn test_malformed_region_fails_before_any_aws_call() {
    studioctl()
        .args(["apps", "list", "--region", "Not A Region"])
        .env("AWS_EC2_METADATA_DISABLED", "true")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Not A Region"));
}

#[test]
fn test_malformed_region_json_error() {
    let output = studioctl()
        .args(["apps", "list", "--region", "bogus", "--json"])
        .output()
        .expect("run studioctl");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "invalid_region");
}
