//! CLI Integration Tests for toolbridge
//!
//! Runs the built binary for help, version and startup error paths. None of
//! these reach a language model or tool server.

use std::process::{Command, Output};
use tempfile::TempDir;

/// Run toolbridge with arguments in `dir`, with provider secrets cleared
fn run_toolbridge(args: &[&str], dir: &TempDir) -> Output {
    Command::new(env!("CARGO_BIN_EXE_toolbridge"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("TAVILY_API_KEY")
        .env_remove("TOOLBRIDGE_MODEL")
        .env_remove("TOOLBRIDGE_MCP_URL")
        .env_remove("TOOLBRIDGE_LOG_LEVEL")
        .output()
        .expect("Failed to execute toolbridge")
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    let output = run_toolbridge(&["--help"], &dir);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("toolbridge"));
    assert!(stdout.contains("chat"));
    assert!(stdout.contains("ask"));
    assert!(stdout.contains("tools"));
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("EXAMPLES"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    let output = run_toolbridge(&["--version"], &dir);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_ask_requires_query() {
    let dir = TempDir::new().unwrap();
    let output = run_toolbridge(&["ask"], &dir);

    assert!(!output.status.success());
}

// =============================================================================
// Startup Errors
// =============================================================================

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_toolbridge(&["--config", "nope.toml", "ask", "hi"], &dir);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"));
}

#[test]
fn test_ask_without_api_key_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_toolbridge(&["ask", "hello"], &dir);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OPENAI_API_KEY"));
}

#[test]
fn test_serve_without_tavily_key_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_toolbridge(&["serve"], &dir);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TAVILY_API_KEY"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("toolbridge.toml"), "[llm\nmodel = ").unwrap();
    let output = run_toolbridge(&["ask", "hello"], &dir);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid config"));
}
