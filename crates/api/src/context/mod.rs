//! Application context - dependency injection container

use std::sync::Arc;

use calcopilot_common::{Clock, SystemClock};
use calcopilot_core::timezone::parse_timezone;
use calcopilot_core::{
    CalendarConnector, CompletionProvider, DraftMailbox, FlightSearchPort, ToolRegistry,
    WeatherPort,
};
use calcopilot_domain::{AppConfig, CopilotError, Result};
use calcopilot_infra::{
    AmadeusClient, GmailClient, GoogleCalendarConnector, HttpClient, OpenAIClient,
    OpenMeteoClient,
};
use chrono_tz::Tz;
use tracing::{info, warn};

/// Application context - holds configuration and every adapter
///
/// Adapters are shared across requests; per-user state (the Google access
/// token) is bound per request through the [`CalendarConnector`].
pub struct AppContext {
    pub config: AppConfig,
    /// `None` when no OpenAI key is configured; chat requests then fail.
    pub completion: Option<Arc<dyn CompletionProvider>>,
    pub calendar: Arc<dyn CalendarConnector>,
    pub mailbox: Arc<dyn DraftMailbox>,
    pub flights: Arc<dyn FlightSearchPort>,
    pub weather: Arc<dyn WeatherPort>,
    pub clock: Arc<dyn Clock>,
    default_timezone: Tz,
}

impl AppContext {
    /// Wire the production adapters from `config`.
    pub fn new(config: AppConfig) -> Result<Self> {
        let http = HttpClient::new()?;

        let amadeus = AmadeusClient::from_config(&config.amadeus, http.clone());
        if !amadeus.is_configured() {
            warn!("Amadeus credentials missing; flight search will report an error");
        }

        let mut builder = Self::builder(config.clone())
            .calendar(Arc::new(GoogleCalendarConnector::new(
                http.clone(),
                config.google.calendar_base_url.clone(),
            )))
            .mailbox(Arc::new(GmailClient::new(http.clone(), config.google.gmail_base_url.clone())))
            .flights(Arc::new(amadeus))
            .weather(Arc::new(OpenMeteoClient::from_config(&config.weather, http.clone())));

        match OpenAIClient::from_settings(
            config.openai.api_key.as_deref(),
            &config.openai.api_url,
            &config.orchestrator.model,
            http,
        ) {
            Ok(client) => builder = builder.completion(Arc::new(client)),
            Err(err) => warn!(error = %err, "chat completions disabled"),
        }

        let context = builder.build()?;
        info!(
            model = %context.config.orchestrator.model,
            timezone = %context.default_timezone,
            chat_enabled = context.completion.is_some(),
            "application context initialised"
        );
        Ok(context)
    }

    pub fn builder(config: AppConfig) -> AppContextBuilder {
        AppContextBuilder {
            config,
            completion: None,
            calendar: None,
            mailbox: None,
            flights: None,
            weather: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn default_timezone(&self) -> Tz {
        self.default_timezone
    }

    /// Request timezone, or the configured default when absent or unknown.
    pub fn resolve_timezone(&self, requested: Option<&str>) -> Tz {
        match requested.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => parse_timezone(name).unwrap_or_else(|err| {
                warn!(timezone = name, error = %err, "falling back to default timezone");
                self.default_timezone
            }),
            None => self.default_timezone,
        }
    }

    /// Tools for one request; calendar tools only when a token is present.
    pub fn tool_registry(&self, tz: Tz, access_token: Option<&str>) -> ToolRegistry {
        let builder = ToolRegistry::builder(tz)
            .with_free_busy_config(self.config.free_busy.clone())
            .with_flights(self.flights.clone())
            .with_weather(self.weather.clone());
        match access_token {
            Some(token) => builder.with_calendar(self.calendar.connect(token)).build(),
            None => builder.build(),
        }
    }
}

/// Builder for [`AppContext`]; tests use it to inject mock ports.
pub struct AppContextBuilder {
    config: AppConfig,
    completion: Option<Arc<dyn CompletionProvider>>,
    calendar: Option<Arc<dyn CalendarConnector>>,
    mailbox: Option<Arc<dyn DraftMailbox>>,
    flights: Option<Arc<dyn FlightSearchPort>>,
    weather: Option<Arc<dyn WeatherPort>>,
    clock: Arc<dyn Clock>,
}

impl AppContextBuilder {
    #[must_use]
    pub fn completion(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.completion = Some(provider);
        self
    }

    #[must_use]
    pub fn calendar(mut self, connector: Arc<dyn CalendarConnector>) -> Self {
        self.calendar = Some(connector);
        self
    }

    #[must_use]
    pub fn mailbox(mut self, mailbox: Arc<dyn DraftMailbox>) -> Self {
        self.mailbox = Some(mailbox);
        self
    }

    #[must_use]
    pub fn flights(mut self, flights: Arc<dyn FlightSearchPort>) -> Self {
        self.flights = Some(flights);
        self
    }

    #[must_use]
    pub fn weather(mut self, weather: Arc<dyn WeatherPort>) -> Self {
        self.weather = Some(weather);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// # Errors
    /// `Config` when a port is missing or the default timezone is not a
    /// known IANA name.
    pub fn build(self) -> Result<AppContext> {
        let missing = |port: &str| CopilotError::Config(format!("{port} adapter not configured"));
        let default_timezone = parse_timezone(&self.config.free_busy.default_timezone)
            .map_err(|e| CopilotError::Config(e.detail().to_string()))?;

        Ok(AppContext {
            completion: self.completion,
            calendar: self.calendar.ok_or_else(|| missing("calendar"))?,
            mailbox: self.mailbox.ok_or_else(|| missing("mailbox"))?,
            flights: self.flights.ok_or_else(|| missing("flights"))?,
            weather: self.weather.ok_or_else(|| missing("weather"))?,
            clock: self.clock,
            default_timezone,
            config: self.config,
        })
    }
}
