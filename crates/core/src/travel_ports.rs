//! Flight and weather lookup ports

use async_trait::async_trait;
use calcopilot_domain::{DailyWeather, FlightOffer, FlightQuery, GeoLocation, Result};
use chrono::NaiveDate;

/// Flight offer search
#[async_trait]
pub trait FlightSearchPort: Send + Sync {
    /// Resolve a city or airport name to an IATA code.
    ///
    /// Returns `NotFound` when nothing matches.
    async fn resolve_location(&self, query: &str) -> Result<String>;

    /// Up to five offers for the query.
    async fn search_offers(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>>;
}

/// Geocoding plus daily forecasts
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// First match for a city name, if any.
    async fn geocode(&self, city: &str) -> Result<Option<GeoLocation>>;

    /// One entry per day in `start..=end`; empty when the range is outside
    /// the forecast horizon.
    async fn daily_forecast(
        &self,
        location: &GeoLocation,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyWeather>>;
}
