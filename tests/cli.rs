//! Integration tests for the `vizreg` binary.
//!
//! These exercise argument handling, configuration errors, and the
//! pre-network part of the run lifecycle. Nothing here talks to a
//! service; network-dependent sequencing is covered by the mock-driven
//! unit tests in the library.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn vizreg() -> Command {
    Command::cargo_bin("vizreg").expect("binary builds")
}

fn write_config(dir: &Path, contents: &str) {
    std::fs::write(dir.join(".vizreg.toml"), contents).unwrap();
}

#[test]
fn no_arguments_prints_usage_and_succeeds() {
    vizreg()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn unknown_command_is_a_usage_error() {
    vizreg()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn compare_requires_two_shas() {
    vizreg().args(["compare", "abc"]).assert().failure().code(2);
}

#[test]
fn has_report_requires_a_sha() {
    vizreg().arg("has-report").assert().failure().code(2);
}

#[test]
fn version_flag_reports_version() {
    vizreg()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn completions_generate_for_bash() {
    vizreg()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vizreg"));
}

#[test]
fn missing_config_file_is_fatal_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    vizreg()
        .current_dir(dir.path())
        .args(["has-report", "abc123"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"))
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn malformed_config_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "api_key = [unclosed");

    vizreg()
        .current_dir(dir.path())
        .args(["empty", "abc123"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration parse error"));
}

#[test]
fn missing_credentials_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"
        [render]
        command = "true"
        "#,
    );

    vizreg()
        .current_dir(dir.path())
        .env_remove("VIZREG_API_KEY")
        .env_remove("VIZREG_API_SECRET")
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing API credentials"));
}

#[cfg(unix)]
#[test]
fn run_announces_generated_sha_before_render_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"
        api_key = "k"
        api_secret = "s"

        [render]
        command = "sh"
        args = ["-c", "exit 3"]
        "#,
    );

    vizreg()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "A temporary one will be used in place",
        ))
        .stderr(predicate::str::contains(
            "Render command exited with status 3",
        ));
}

#[cfg(unix)]
#[test]
fn run_with_supplied_sha_does_not_announce_a_token() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"
        api_key = "k"
        api_secret = "s"

        [render]
        command = "sh"
        args = ["-c", "exit 1"]
        "#,
    );

    vizreg()
        .current_dir(dir.path())
        .args(["run", "abc123"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("temporary").not());
}

#[cfg(unix)]
#[test]
fn dev_mode_fails_when_the_watcher_exits() {
    let dir = tempfile::tempdir().unwrap();
    // A watcher that emits nothing and exits immediately: the event
    // channel closes without a single cycle, which dev treats as fatal.
    write_config(
        dir.path(),
        r#"
        api_key = "k"
        api_secret = "s"

        [render]
        command = "true"
        watch_args = []
        "#,
    );

    vizreg()
        .current_dir(dir.path())
        .arg("dev")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("render watcher exited"));
}

#[cfg(unix)]
#[test]
fn env_variables_override_config_credentials() {
    let dir = tempfile::tempdir().unwrap();
    // Credentials come from the environment; the file has none.
    write_config(
        dir.path(),
        r#"
        [render]
        command = "true"
        "#,
    );

    // With env credentials present, the config loads and `run` proceeds
    // to the render step; "true" produces no manifest, which is the
    // error we expect to see instead of a credentials failure.
    vizreg()
        .current_dir(dir.path())
        .env("VIZREG_API_KEY", "k")
        .env("VIZREG_API_SECRET", "s")
        .args(["run", "abc123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing API credentials").not())
        .stderr(predicate::str::contains("manifest"));
}
