//! Application configuration structures
//!
//! Every section defaults independently so a partial TOML/JSON file (or no
//! file at all) still yields a runnable configuration. Loading and
//! environment overrides live in `calcopilot-infra::config`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_FREE_SLOTS, DEFAULT_MAX_RANGE_DAYS, DEFAULT_MAX_TOOL_ITERATIONS,
    DEFAULT_MEETING_DURATION_MINUTES, DEFAULT_MODEL, DEFAULT_TIMEZONE, DEFAULT_WORK_END_HOUR,
    DEFAULT_WORK_START_HOUR,
};
use crate::errors::{CopilotError, Result};
use crate::impl_domain_status_conversions;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub orchestrator: OrchestratorConfig,
    pub free_busy: FreeBusyConfig,
    pub openai: OpenAiConfig,
    pub amadeus: AmadeusConfig,
    pub weather: WeatherConfig,
    pub google: GoogleConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reject configurations the engines would refuse at request time anyway.
    pub fn validate(&self) -> Result<()> {
        let fb = &self.free_busy;
        if fb.work_end_hour > 23 || fb.work_start_hour >= fb.work_end_hour {
            return Err(CopilotError::Config(format!(
                "work hours must satisfy start < end <= 23 (got {}..{})",
                fb.work_start_hour, fb.work_end_hour
            )));
        }
        if fb.max_slots == 0 {
            return Err(CopilotError::Config("free_busy.max_slots must be at least 1".into()));
        }
        if fb.default_duration_minutes <= 0 {
            return Err(CopilotError::Config(
                "free_busy.default_duration_minutes must be positive".into(),
            ));
        }
        if self.orchestrator.max_iterations == 0 {
            return Err(CopilotError::Config(
                "orchestrator.max_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Model turns allowed to request tools before the final answer is forced.
    pub max_iterations: usize,
    pub model: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { max_iterations: DEFAULT_MAX_TOOL_ITERATIONS, model: DEFAULT_MODEL.into() }
    }
}

/// Working-hours defaults and result limits for availability lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeBusyConfig {
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub max_slots: usize,
    pub default_duration_minutes: i64,
    pub default_timezone: String,
    pub max_range_days: i64,
}

impl Default for FreeBusyConfig {
    fn default() -> Self {
        Self {
            work_start_hour: DEFAULT_WORK_START_HOUR,
            work_end_hour: DEFAULT_WORK_END_HOUR,
            max_slots: DEFAULT_MAX_FREE_SLOTS,
            default_duration_minutes: DEFAULT_MEETING_DURATION_MINUTES,
            default_timezone: DEFAULT_TIMEZONE.into(),
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub api_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self { api_key: None, api_url: "https://api.openai.com/v1/chat/completions".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmadeusConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub base_url: String,
    /// Tokens are refreshed this many seconds before they expire.
    pub token_refresh_margin_secs: u64,
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            base_url: "https://test.api.amadeus.com".into(),
            token_refresh_margin_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".into(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub calendar_base_url: String,
    pub gmail_base_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            calendar_base_url: "https://www.googleapis.com/calendar/v3".into(),
            gmail_base_url: "https://gmail.googleapis.com/gmail/v1".into(),
        }
    }
}

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl_domain_status_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "info".into(), format: LogFormat::Text }
    }
}
