//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Search the standard locations for a config file (optional)
//! 2. Parse it as TOML or JSON, by extension; missing sections keep defaults
//! 3. Apply environment overrides
//! 4. Validate
//!
//! ## Environment Variables
//! - `CALCOPILOT_HOST`, `CALCOPILOT_PORT`: listen address
//! - `CALCOPILOT_MAX_ITERATIONS`: tool-calling turns per request
//! - `CALCOPILOT_MODEL`: chat completion model
//! - `CALCOPILOT_WORK_START_HOUR`, `CALCOPILOT_WORK_END_HOUR`: working window
//! - `CALCOPILOT_MAX_SLOTS`: free slots returned per lookup
//! - `CALCOPILOT_DEFAULT_TIMEZONE`: timezone used when a request names none
//! - `CALCOPILOT_LOG_FORMAT` (`text`/`json`), `CALCOPILOT_LOG_FILTER`
//! - `OPENAI_API_KEY`, `AMADEUS_API_KEY`, `AMADEUS_API_SECRET`: credentials
//!
//! ## File Locations
//! `calcopilot.{toml,json}` then `config.{toml,json}`, in the working
//! directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use calcopilot_domain::{AppConfig, CopilotError, LogFormat, Result};

const FILE_NAMES: [&str; 4] = ["calcopilot.toml", "calcopilot.json", "config.toml", "config.json"];

/// Load configuration from the first config file found (if any) plus the
/// environment.
///
/// # Errors
/// Returns `CopilotError::Config` when a file exists but cannot be parsed, an
/// override has an invalid value, or the result fails validation.
pub fn load() -> Result<AppConfig> {
    let mut config = match find_config_path() {
        Some(path) => load_from_file(&path)?,
        None => {
            tracing::debug!("no config file found, using defaults");
            AppConfig::default()
        }
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Parse one config file. Format is chosen by extension.
pub fn load_from_file(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Err(CopilotError::Config(format!("Config file not found: {}", path.display())));
    }
    tracing::info!(path = %path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| CopilotError::Config(format!("Failed to read config file: {e}")))?;
    parse_config(&contents, path)
}

fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CopilotError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CopilotError::Config(format!("Invalid JSON format: {e}"))),
        other => Err(CopilotError::Config(format!("Unsupported config format: {other}"))),
    }
}

/// First existing config file in the standard locations.
pub fn find_config_path() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Apply overrides read through `lookup` (normally the process environment).
///
/// Empty values are ignored so a blank line in `.env` does not clobber the
/// file.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(host) = get("CALCOPILOT_HOST") {
        config.server.host = host;
    }
    if let Some(port) = get("CALCOPILOT_PORT") {
        config.server.port = parse_var("CALCOPILOT_PORT", &port)?;
    }
    if let Some(n) = get("CALCOPILOT_MAX_ITERATIONS") {
        config.orchestrator.max_iterations = parse_var("CALCOPILOT_MAX_ITERATIONS", &n)?;
    }
    if let Some(model) = get("CALCOPILOT_MODEL") {
        config.orchestrator.model = model;
    }
    if let Some(hour) = get("CALCOPILOT_WORK_START_HOUR") {
        config.free_busy.work_start_hour = parse_var("CALCOPILOT_WORK_START_HOUR", &hour)?;
    }
    if let Some(hour) = get("CALCOPILOT_WORK_END_HOUR") {
        config.free_busy.work_end_hour = parse_var("CALCOPILOT_WORK_END_HOUR", &hour)?;
    }
    if let Some(n) = get("CALCOPILOT_MAX_SLOTS") {
        config.free_busy.max_slots = parse_var("CALCOPILOT_MAX_SLOTS", &n)?;
    }
    if let Some(tz) = get("CALCOPILOT_DEFAULT_TIMEZONE") {
        config.free_busy.default_timezone = tz;
    }
    if let Some(format) = get("CALCOPILOT_LOG_FORMAT") {
        config.logging.format = LogFormat::from_str(&format)
            .map_err(|e| CopilotError::Config(format!("Invalid CALCOPILOT_LOG_FORMAT: {e}")))?;
    }
    if let Some(filter) = get("CALCOPILOT_LOG_FILTER") {
        config.logging.filter = filter;
    }
    if let Some(key) = get("OPENAI_API_KEY") {
        config.openai.api_key = Some(key);
    }
    if let Some(key) = get("AMADEUS_API_KEY") {
        config.amadeus.api_key = Some(key);
    }
    if let Some(secret) = get("AMADEUS_API_SECRET") {
        config.amadeus.api_secret = Some(secret);
    }
    Ok(())
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| CopilotError::Config(format!("Invalid {key} value {raw:?}: {e}")))
}
