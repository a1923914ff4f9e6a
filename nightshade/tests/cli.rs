//! CLI tests for the `nightshade` binary.
//!
//! Spawns the binary with piped stdin and verifies exit codes for normal
//! termination, detonation and invalid configuration.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use nightshade::exit_codes;
use nightshade::io::config::{CountdownConfig, NightshadeConfig};
use nightshade::test_support::TempConfig;

fn nightshade() -> Command {
    Command::new(env!("CARGO_BIN_EXE_nightshade"))
}

#[test]
fn check_passes_with_default_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = nightshade()
        .current_dir(temp.path())
        .arg("check")
        .output()
        .expect("nightshade check");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok");
}

#[test]
fn check_rejects_invalid_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("nightshade.toml");
    fs::write(&path, "[countdown]\ntick_millis = 0\n").expect("write config");

    let status = nightshade()
        .current_dir(temp.path())
        .arg("check")
        .stderr(Stdio::null())
        .status()
        .expect("nightshade check");

    assert_eq!(status.code(), Some(exit_codes::INVALID));
}

#[test]
fn play_exits_cleanly_on_exit_command() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut child = nightshade()
        .current_dir(temp.path())
        .args(["play", "--quiet-intro"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn nightshade play");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"ls\nexit\n")
        .expect("write stdin");

    let output = child.wait_with_output().expect("wait");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout.contains("missions/"));
    assert!(stdout.contains("Goodbye, Agent."));
}

#[test]
fn play_exits_with_detonated_code_when_time_runs_out() {
    let config = TempConfig::new(&NightshadeConfig {
        intro: false,
        countdown: CountdownConfig {
            tick_millis: 50,
            ..CountdownConfig::fixed(1)
        },
    })
    .expect("temp config");
    let mut child = nightshade()
        .arg("play")
        .arg("--config")
        .arg(config.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn nightshade play");

    // Keep stdin open so only the countdown can end the session.
    let mut stdin = child.stdin.take().expect("stdin");
    stdin
        .write_all(b"cd bomb_module\narm\n")
        .expect("write stdin");
    stdin.flush().expect("flush stdin");

    let output = child.wait_with_output().expect("wait");
    drop(stdin);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(exit_codes::DETONATED));
    assert!(stdout.contains("BOOM!"));
    assert!(!stdout.contains("Bomb defused"));
}
