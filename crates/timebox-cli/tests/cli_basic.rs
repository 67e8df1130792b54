//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway configuration file and
//! verify outputs.

use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command against the config at `config` and return output.
fn run_cli(config: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_timebox"))
        .arg("--config")
        .arg(config)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn config_in(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("config.json")
}

#[test]
fn test_first_run_creates_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let (code, stdout, _) = run_cli(&config, &["config", "show"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["defaultContextName"], "default");
    assert!(config.exists());
    assert!(dir.path().join("contexts").join("default.json").exists());
}

#[test]
fn test_preset_save_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let (code, _, stderr) = run_cli(
        &config,
        &[
            "preset", "save", "tests", "--task", "Write tests", "--dod",
            "- Write tests\n- Review PR\n\n", "--minutes", "25",
        ],
    );
    assert_eq!(code, 0, "stderr: {stderr}");

    let (code, stdout, _) = run_cli(&config, &["preset", "list", "--json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["tests"]["task"], "Write tests");
    assert_eq!(json["tests"]["dod"], serde_json::json!(["Write tests", "Review PR"]));
    assert_eq!(json["tests"]["minutes"], 25.0);

    let (code, stdout, _) = run_cli(&config, &["preset", "show", "tests"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("- Review PR"));
}

#[test]
fn test_preset_save_rejects_bad_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let (code, _, stderr) = run_cli(
        &config,
        &["preset", "save", "p", "--task", "Task", "--minutes", "soon"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid duration"));
}

#[test]
fn test_preset_delete_missing_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&config_in(&dir), &["preset", "delete", "ghost"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No preset named"));
}

#[test]
fn test_context_commands() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    assert_eq!(run_cli(&config, &["context", "create", "work"]).0, 0);
    assert_eq!(run_cli(&config, &["context", "create", "home"]).0, 0);

    let (code, _, stderr) = run_cli(&config, &["context", "rename", "work", "home"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("already exists"));

    let (code, _, stderr) = run_cli(&config, &["context", "delete", "default", "--yes"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("cannot be deleted"));

    assert_eq!(run_cli(&config, &["--context", "work", "context", "set-default"]).0, 0);
    let (_, stdout, _) = run_cli(&config, &["context", "current"]);
    assert!(stdout.contains("Default context: work"));

    assert_eq!(run_cli(&config, &["context", "delete", "home", "--yes"]).0, 0);
    let (_, stdout, _) = run_cli(&config, &["context", "list"]);
    assert!(stdout.contains("work [active, default]"));
    assert!(!stdout.contains("home"));
}

#[test]
fn test_context_delete_without_confirmation_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    assert_eq!(run_cli(&config, &["context", "create", "scratch"]).0, 0);

    let (code, stdout, _) = run_cli(&config, &["context", "delete", "scratch"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Aborted."));
    assert!(dir.path().join("contexts").join("scratch.json").exists());
}

#[test]
fn test_start_runs_to_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let (code, stdout, stderr) = run_cli(
        &config,
        &["start", "--task", "Blink", "--dod", "- look away", "--minutes", "0.02", "--json"],
    );
    assert_eq!(code, 0, "stderr: {stderr}");

    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events.first().unwrap()["type"], "SessionStarted");
    assert_eq!(events.first().unwrap()["checklist_len"], 1);
    let expired: Vec<_> = events
        .iter()
        .filter(|e| e["type"] == "SessionExpired")
        .collect();
    assert_eq!(expired.len(), 1);
    assert!(!stdout.contains('\x07'));
    assert!(stderr.contains('\x07'));
}

#[test]
fn test_start_unknown_preset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(&config_in(&dir), &["start", "--preset", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Preset 'nope' not found"));
}
