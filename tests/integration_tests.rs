//! Integration tests for the pulse CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.
//! Nothing here needs a running backend: offline commands are checked
//! directly and backend commands are pointed at a closed port.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Nothing listens here, so every fetch fails fast
const DEAD_BACKEND: &str = "http://127.0.0.1:9";

/// Helper to get a pulse command isolated from the user's config and env
fn pulse(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pulse").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("PULSE_API_URL")
        .env_remove("PULSE_TOKEN")
        .env_remove("PULSE_TIMEOUT_SECS")
        .env_remove("PULSE_DEMO_FALLBACK")
        .env_remove("PULSE_FORMAT")
        .env_remove("PULSE_DOWNLOAD_DIR")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pulse AI"));
}

#[test]
fn test_version_displays() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pulse"));
}

#[test]
fn test_unknown_command_fails() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_subcommand_help_lists_operations() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["analytics", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("xbar-r"))
        .stdout(predicate::str::contains("capability"));
}

// ============================================================================
// Parse Command Tests
// ============================================================================

#[test]
fn test_parse_bottleneck_from_stdin() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["parse", "bottleneck"])
        .write_stdin("Assembly, 45, 40, 10, 85\nWelding, 60, 40, 5, 95")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Assembly\""))
        .stdout(predicate::str::contains("\"cycle_time\": 60.0"))
        .stdout(predicate::str::contains("\"utilization\": 95.0"));
}

#[test]
fn test_parse_bottleneck_blank_optionals_omitted() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["parse", "bottleneck"])
        .write_stdin("Paint, 30")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cycle_time\": 30.0"))
        .stdout(predicate::str::contains("takt_time").not());
}

#[test]
fn test_parse_series_drops_bad_entries() {
    let home = TempDir::new().unwrap();
    let output = pulse(&home)
        .args(["parse", "series"])
        .write_stdin("1.5, abc, 2\n3")
        .output()
        .unwrap();
    assert!(output.status.success());

    let values: Vec<f64> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(values, vec![1.5, 2.0, 3.0]);
}

#[test]
fn test_parse_subgroups_from_file() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("subgroups.csv");
    fs::write(&input, "10.1, 10.2, 9.9\n\n10.0, 10.3, 10.1\n").unwrap();

    let output = pulse(&home)
        .args(["parse", "subgroups", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let groups: Vec<Vec<f64>> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1], vec![10.0, 10.3, 10.1]);
}

#[test]
fn test_parse_missing_file_fails() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["parse", "vsm", "-i", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

// ============================================================================
// Rating Command Tests
// ============================================================================

#[test]
fn test_rating_cpk_boundaries() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["rating", "cpk", "1.67"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Excellent"));
    pulse(&home)
        .args(["rating", "cpk", "1.33"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Capable"));
    pulse(&home)
        .args(["rating", "cpk", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marginal"));
    pulse(&home)
        .args(["rating", "cpk", "0.99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not capable"));
}

#[test]
fn test_rating_json_output() {
    let home = TempDir::new().unwrap();
    let output = pulse(&home)
        .args(["--format", "json", "rating", "pce", "25"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["metric"], "pce");
    assert_eq!(value["color"], "green");
}

#[test]
fn test_rating_value_added_needs_improvement() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["rating", "va", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("42.0% needs improvement"));
}

// ============================================================================
// Team Roles Tests
// ============================================================================

#[test]
fn test_team_roles_lists_all_roles() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["team", "roles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Owner"))
        .stdout(predicate::str::contains("Administrator"))
        .stdout(predicate::str::contains("Viewer"));
}

#[test]
fn test_team_roles_json_single_role() {
    let home = TempDir::new().unwrap();
    let output = pulse(&home)
        .args(["--format", "json", "team", "roles", "viewer"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let roles = value.as_array().unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0]["role"], "viewer");
}

#[test]
fn test_team_invite_rejects_owner_role() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["team", "invite", "lee@example.com", "--role", "owner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_path_under_home() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pulse"))
        .stdout(predicate::str::contains("config.yaml"));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["config", "set", "api_url", "https://pulse.example/api"])
        .assert()
        .success();

    pulse(&home)
        .args(["config", "show", "api_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://pulse.example/api"));
}

#[test]
fn test_config_flag_overrides_file() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["config", "set", "api_url", "https://pulse.example/api"])
        .assert()
        .success();

    pulse(&home)
        .args(["--api-url", "http://override/api", "config", "show", "api_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://override/api"));
}

#[test]
fn test_config_token_is_masked() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["config", "set", "token", "abcdefgh1234"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****1234"))
        .stdout(predicate::str::contains("abcdefgh").not());

    pulse(&home)
        .args(["config", "show", "token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****1234"));
}

#[test]
fn test_config_unknown_key_fails() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn test_config_unset_missing_file_fails() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["config", "unset", "token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

// ============================================================================
// Completions Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pulse"));
}

// ============================================================================
// Demo Fallback Tests
// ============================================================================

#[test]
fn test_unreachable_backend_fails_without_fallback() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["--api-url", DEAD_BACKEND, "team", "members"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load team members"));
}

#[test]
fn test_demo_fallback_flag_shows_fixture() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args(["--api-url", DEAD_BACKEND, "--demo-fallback", "team", "members"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Maria Chen"))
        .stderr(predicate::str::contains("demo data"));
}

#[test]
fn test_demo_fallback_from_env() {
    let home = TempDir::new().unwrap();
    let output = pulse(&home)
        .env("PULSE_DEMO_FALLBACK", "true")
        .args(["--api-url", DEAD_BACKEND, "--format", "json", "gov", "boards"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let boards: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!boards.as_array().unwrap().is_empty());
}

#[test]
fn test_demo_fallback_quiet_suppresses_notice() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args([
            "--api-url",
            DEAD_BACKEND,
            "--demo-fallback",
            "--quiet",
            "lss",
            "dashboard",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("demo data").not());
}

#[test]
fn test_mutations_never_fall_back() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args([
            "--api-url",
            DEAD_BACKEND,
            "--demo-fallback",
            "meetings",
            "delete",
            "mtg-1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to delete meeting"));
}

#[test]
fn test_id_format_lists_fixture_ids() {
    let home = TempDir::new().unwrap();
    pulse(&home)
        .args([
            "--api-url",
            DEAD_BACKEND,
            "--demo-fallback",
            "--format",
            "id",
            "lss",
            "projects",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("lss-21"))
        .stdout(predicate::str::contains("lss-14"));
}
