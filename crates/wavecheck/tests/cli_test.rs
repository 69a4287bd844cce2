//! Integration tests for the `wavecheck` binary.
//!
//! These validate argument parsing, help output, shell completions, the
//! history store commands, and error handling — all without a live
//! controller.
#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Build a command for the `wavecheck` binary with env isolation.
///
/// Clears all `WAVECHECK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn wavecheck_cmd() -> Command {
    let mut cmd = Command::cargo_bin("wavecheck").unwrap();
    cmd.env("HOME", "/tmp/wavecheck-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/wavecheck-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/wavecheck-test-nonexistent")
        .env_remove("WAVECHECK_PROFILE")
        .env_remove("WAVECHECK_CONTROLLER")
        .env_remove("WAVECHECK_SITE")
        .env_remove("WAVECHECK_USERNAME")
        .env_remove("WAVECHECK_PASSWORD")
        .env_remove("WAVECHECK_OUTPUT")
        .env_remove("WAVECHECK_INSECURE")
        .env_remove("WAVECHECK_TIMEOUT");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let output = wavecheck_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "expected 'Usage' in output:\n{text}");
}

#[test]
fn help_lists_commands() {
    wavecheck_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("diagnose")
            .and(predicate::str::contains("score"))
            .and(predicate::str::contains("history"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn version_flag() {
    wavecheck_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wavecheck"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn completions_bash() {
    wavecheck_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn completions_zsh() {
    wavecheck_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn invalid_subcommand_fails() {
    let output = wavecheck_cmd().arg("frobnicate").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("frobnicate"),
        "expected error mentioning the bad subcommand:\n{text}"
    );
}

#[test]
fn diagnose_without_config_explains_setup() {
    let output = wavecheck_cmd().arg("diagnose").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("config init") || text.contains("Configuration file not found"),
        "expected setup guidance:\n{text}"
    );
}

#[test]
fn score_without_config_fails_with_general_exit() {
    let output = wavecheck_cmd().arg("score").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn config_path_prints_a_path() {
    wavecheck_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();

    wavecheck_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote starter config"));

    // A second init without --force refuses to clobber.
    wavecheck_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    wavecheck_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

// ── History commands ────────────────────────────────────────────────

#[test]
fn history_list_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("history.json");

    wavecheck_cmd()
        .args(["history", "list", "--history"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("No recommendation history"));
}

#[test]
fn history_clear_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("history.json");

    let output = wavecheck_cmd()
        .args(["history", "clear", "--history"])
        .arg(&store)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    wavecheck_cmd()
        .args(["history", "clear", "--yes", "--history"])
        .arg(&store)
        .assert()
        .success();
}

#[test]
fn history_prune_reports_count() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("history.json");

    wavecheck_cmd()
        .args(["history", "prune", "--days", "30", "--history"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pruned 0 entries"));
}
