//! Integration tests for the `sgsync` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live control plane.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `sgsync` binary with env isolation.
///
/// Clears all `SGSYNC_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn sgsync_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sgsync");
    cmd.env("HOME", "/tmp/sgsync-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/sgsync-test-nonexistent")
        .env_remove("SGSYNC_PROFILE")
        .env_remove("SGSYNC_ENDPOINT")
        .env_remove("SGSYNC_API_KEY")
        .env_remove("SGSYNC_GROUPS")
        .env_remove("SGSYNC_TAG")
        .env_remove("SGSYNC_OUTPUT")
        .env_remove("SGSYNC_INSECURE")
        .env_remove("SGSYNC_TIMEOUT")
        .env_remove("SGSYNC_INTERVAL");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = sgsync_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    sgsync_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("public IP")
            .and(predicate::str::contains("sync"))
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("rules")),
    );
}

#[test]
fn test_version_flag() {
    sgsync_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sgsync"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    sgsync_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    sgsync_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    sgsync_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = sgsync_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_sync_no_config() {
    sgsync_cmd().arg("sync").assert().failure().stderr(
        predicate::str::contains("config")
            .or(predicate::str::contains("Configuration"))
            .or(predicate::str::contains("endpoint"))
            .or(predicate::str::contains("profile")),
    );
}

#[test]
fn test_sync_endpoint_without_key() {
    // An endpoint alone is not enough; the key must come from somewhere.
    sgsync_cmd()
        .args(["sync", "--endpoint", "https://firewall.example.net"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key").or(predicate::str::contains("credentials")));
}

#[test]
fn test_sync_requires_a_group() {
    // Endpoint and key alone are not enough for a reconciling command.
    let output = sgsync_cmd()
        .args([
            "sync",
            "--endpoint",
            "https://firewall.example.net",
            "--api-key",
            "k",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("group"),
        "Expected error about missing groups:\n{text}"
    );
}

#[test]
fn test_sync_requires_a_tag() {
    let output = sgsync_cmd()
        .args([
            "sync",
            "--endpoint",
            "https://firewall.example.net",
            "--api-key",
            "k",
            "--group",
            "sg-1",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("tag"),
        "Expected error about missing tag:\n{text}"
    );
}

#[test]
fn test_watch_requires_group_and_tag() {
    // Watch validates before its first cycle, so this returns
    // immediately instead of looping.
    let output = sgsync_cmd()
        .args([
            "watch",
            "--endpoint",
            "https://firewall.example.net",
            "--api-key",
            "k",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
}

#[test]
fn test_config_show_no_config() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    sgsync_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_prints_a_path() {
    sgsync_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_invalid_output_format() {
    let output = sgsync_cmd()
        .args(["--output", "invalid", "sync"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_invalid_watch_interval() {
    let output = sgsync_cmd()
        .args(["watch", "--interval", "not-a-duration"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid interval"
    );
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should be about
    // missing configuration, not about argument parsing.
    sgsync_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "--group",
            "sg-1",
            "--tag",
            "home",
            "sync",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("endpoint"))
                .or(predicate::str::contains("profile")),
        );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_watch_help_mentions_interval() {
    sgsync_cmd()
        .args(["watch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interval").and(predicate::str::contains("cycles")));
}

#[test]
fn test_config_subcommands_exist() {
    sgsync_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("profiles"))
                .and(predicate::str::contains("path")),
        );
}
