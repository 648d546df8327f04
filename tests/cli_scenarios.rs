//! Binary-level scenarios for `bat`.
//!
//! Each test drives the compiled binary with small `sh` children and checks
//! standard output, standard error and the exit status together.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use harness::ExitCode;
use predicates::prelude::*;
use tempfile::TempDir;

fn bat() -> Command {
    let mut command = Command::cargo_bin("bat").unwrap();
    command.env_remove("BAT_LOG");
    command
}

fn write(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn sh(dir: &Path, name: &str, body: &str) -> String {
    format!("sh {}", write(dir, name, body.as_bytes()).display())
}

fn code(exit: ExitCode) -> i32 {
    i32::from(exit)
}

#[test]
fn no_arguments_prints_help() {
    bat()
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage: bat"))
        .stdout(predicate::str::contains("-S, --server CMD"));
}

#[test]
fn matching_reply_prints_ok() {
    let dir = TempDir::new().unwrap();
    let script = write(dir.path(), "ping.bat", b"~>PING<~PONG");
    let server = sh(dir.path(), "pong.sh", "head -c 4 >/dev/null\nprintf PONG\n");

    bat()
        .arg("-S")
        .arg(&server)
        .arg("-s")
        .arg(&script)
        .assert()
        .success()
        .stdout("OK\n");
}

#[test]
fn mismatching_reply_prints_fail_and_counts() {
    let dir = TempDir::new().unwrap();
    let script = write(dir.path(), "ping.bat", b"~>PING<~PONG");
    let server = sh(dir.path(), "ponk.sh", "head -c 4 >/dev/null\nprintf PONK\n");

    bat()
        .args(["-d", "-S", &server, "-s"])
        .arg(&script)
        .assert()
        .code(1)
        .stdout("FAIL\n")
        .stderr(predicate::str::contains("EXPECTED:\nPONGRECEIVED:\nPONK"));
}

#[test]
fn collapsible_rules_hide_timestamps() {
    let dir = TempDir::new().unwrap();
    let script = write(dir.path(), "clock.bat", b"~>TIME<~TS");
    let rules = write(dir.path(), "clock.rules", b"TS \\d{10}\n");
    let server = sh(dir.path(), "clock.sh", "head -c 4 >/dev/null\nprintf 1700000000\n");

    bat()
        .args(["-S", &server, "-s"])
        .arg(&script)
        .arg("-c")
        .arg(&rules)
        .assert()
        .success()
        .stdout("OK\n");

    bat()
        .args(["-S", &server, "-s"])
        .arg(&script)
        .assert()
        .code(1)
        .stdout("FAIL\n");
}

#[test]
fn recorded_session_replays_against_same_server() {
    let dir = TempDir::new().unwrap();
    let client = sh(dir.path(), "client.sh", "printf 'hello world'\n");
    let recording = dir.path().join("live.bat");

    bat()
        .args(["-C", &client, "-S", "cat", "-T", "0.5", "-r"])
        .arg(&recording)
        .assert()
        .success()
        .stdout("");
    assert_eq!(fs::read(&recording).unwrap(), b"~>hello world<~hello world");

    bat()
        .args(["-S", "cat", "-s"])
        .arg(&recording)
        .assert()
        .success()
        .stdout("OK\n");
}

#[test]
fn record_to_stdout_emits_session_format() {
    let dir = TempDir::new().unwrap();
    let client = sh(dir.path(), "client.sh", "printf PING\n");

    bat()
        .args(["-C", &client, "-S", "cat", "-T", "0.5", "-R"])
        .assert()
        .success()
        .stdout("~>PING<~PING");
}

#[test]
fn custom_separators_frame_script_and_recording() {
    let dir = TempDir::new().unwrap();
    let script = write(dir.path(), "custom.bat", b"[[a]]a[[b]]b");
    let recording = dir.path().join("custom-out.bat");

    bat()
        .args([
            "-S",
            "cat",
            "--request-separator",
            "[[",
            "--response-separator",
            "]]",
            "-s",
        ])
        .arg(&script)
        .arg("-r")
        .arg(&recording)
        .assert()
        .success()
        .stdout("OK\nOK\n");
    assert_eq!(fs::read(&recording).unwrap(), b"[[a]]a[[b]]b");
}

#[test]
fn missing_script_exits_with_script_code() {
    let dir = TempDir::new().unwrap();
    bat()
        .args(["-S", "cat", "-s"])
        .arg(dir.path().join("absent.bat"))
        .assert()
        .code(code(ExitCode::SCRIPT))
        .stderr(predicate::str::contains("can't open script"));
}

#[test]
fn missing_rule_file_exits_with_rules_code() {
    let dir = TempDir::new().unwrap();
    let script = write(dir.path(), "a.bat", b"~>a<~a");
    bat()
        .args(["-S", "cat", "-s"])
        .arg(&script)
        .arg("-c")
        .arg(dir.path().join("absent.rules"))
        .assert()
        .code(code(ExitCode::RULES));
}

#[test]
fn server_alone_is_a_usage_error() {
    bat()
        .args(["-S", "cat"])
        .assert()
        .code(code(ExitCode::USAGE))
        .stderr(predicate::str::contains("usage"));
}

#[test]
fn unstartable_server_counts_as_failure() {
    let dir = TempDir::new().unwrap();
    let script = write(dir.path(), "a.bat", b"~>a<~a");
    bat()
        .args(["-T", "0.2", "-S", "/nonexistent/bat-server", "-s"])
        .arg(&script)
        .assert()
        .code(1)
        .stdout("FAIL\n");
}

#[test]
fn malformed_timeout_is_a_usage_error() {
    bat()
        .args(["-s", "x.bat", "-t", "later"])
        .assert()
        .code(code(ExitCode::USAGE))
        .stderr(predicate::str::contains("-t"));
}
