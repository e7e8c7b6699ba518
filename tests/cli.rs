//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::Command;

const ADDR: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

/// Runs the binary in `dir` with no configuration in its environment.
fn run_scaffold(dir: &Path, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_poc-scaffold");
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env_remove("ETHERSCAN_API_KEY")
        .env_remove("ETH_RPC_URL")
        .env_remove("POC_RECORD")
        .output()
        .expect("failed to run poc-scaffold binary")
}

fn is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn no_arguments_prints_usage_and_exits_1() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_scaffold(tmp.path(), &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Usage:"));
    assert!(is_empty(tmp.path()));
}

#[test]
fn address_without_prefix_exits_1() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_scaffold(tmp.path(), &["A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("0x"));
    assert!(is_empty(tmp.path()));
}

#[test]
fn too_many_arguments_exits_1() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_scaffold(tmp.path(), &[ADDR, "Vault", "extra"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(is_empty(tmp.path()));
}

#[test]
fn missing_environment_exits_1() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_scaffold(tmp.path(), &[ADDR]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("ETHERSCAN_API_KEY"));
    assert!(is_empty(tmp.path()));
}

#[test]
fn help_shows_usage() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_scaffold(tmp.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("<ADDRESS>"));
    assert!(stdout.contains("[FOLDER]"));
}
