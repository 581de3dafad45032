//! Integration tests for configuration loading from files on disk.

use std::fs;
use std::sync::Mutex;

use calcopilot_domain::{CopilotError, LogFormat};
use calcopilot_infra::config;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Serialises tests that touch the process environment.
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct EnvGuard(&'static [&'static str]);

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in self.0 {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_load_toml_keeps_defaults_for_missing_sections() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("calcopilot.toml");
    fs::write(
        &path,
        r#"
[server]
port = 4100

[free_busy]
work_start_hour = 8
work_end_hour = 17
default_timezone = "Europe/Berlin"

[logging]
format = "json"
"#,
    )
    .expect("write config");

    let config = config::load_from_file(&path).expect("config should load");

    assert_eq!(config.server.port, 4100);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.free_busy.work_start_hour, 8);
    assert_eq!(config.free_busy.default_timezone, "Europe/Berlin");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.orchestrator.max_iterations, 5);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_json_config() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "orchestrator": { "max_iterations": 3, "model": "gpt-4o" },
            "amadeus": { "base_url": "https://api.amadeus.com" }
        }"#,
    )
    .expect("write config");

    let config = config::load_from_file(&path).expect("config should load");

    assert_eq!(config.orchestrator.max_iterations, 3);
    assert_eq!(config.orchestrator.model, "gpt-4o");
    assert_eq!(config.amadeus.base_url, "https://api.amadeus.com");
    assert_eq!(config.amadeus.token_refresh_margin_secs, 60);
}

#[test]
fn test_env_overrides_apply_after_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("calcopilot.toml");
    fs::write(&path, "[server]\nport = 4100\n").expect("write config");

    let mut config = config::load_from_file(&path).expect("config should load");
    config::apply_env_overrides(&mut config, |key| match key {
        "CALCOPILOT_PORT" => Some("5000".to_string()),
        "CALCOPILOT_DEFAULT_TIMEZONE" => Some("Asia/Tokyo".to_string()),
        _ => None,
    })
    .expect("overrides apply");

    assert_eq!(config.server.port, 5000);
    assert_eq!(config.free_busy.default_timezone, "Asia/Tokyo");
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = TempDir::new().expect("temp dir");

    let err = config::load_from_file(&dir.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, CopilotError::Config(msg) if msg.contains("not found")));
}

#[test]
fn test_malformed_toml_is_config_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("calcopilot.toml");
    fs::write(&path, "[server\nport = ").expect("write config");

    let err = config::load_from_file(&path).unwrap_err();

    assert!(matches!(err, CopilotError::Config(msg) if msg.starts_with("Invalid TOML format")));
}

#[test]
fn test_invalid_working_hours_fail_validation() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("calcopilot.toml");
    fs::write(&path, "[free_busy]\nwork_start_hour = 18\nwork_end_hour = 9\n").expect("write");

    let config = config::load_from_file(&path).expect("parses");

    assert!(matches!(config.validate(), Err(CopilotError::Config(_))));
}

#[test]
fn test_load_applies_process_environment() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let _guard = EnvGuard(&["CALCOPILOT_MAX_ITERATIONS", "CALCOPILOT_MODEL"]);
    std::env::set_var("CALCOPILOT_MAX_ITERATIONS", "2");
    std::env::set_var("CALCOPILOT_MODEL", "gpt-4o");

    let config = config::load().expect("config should load");

    assert_eq!(config.orchestrator.max_iterations, 2);
    assert_eq!(config.orchestrator.model, "gpt-4o");
}

#[test]
fn test_load_validates_overrides() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let _guard = EnvGuard(&["CALCOPILOT_MAX_SLOTS"]);
    std::env::set_var("CALCOPILOT_MAX_SLOTS", "0");

    let err = config::load().unwrap_err();

    assert!(matches!(err, CopilotError::Config(msg) if msg.contains("max_slots")));
}
