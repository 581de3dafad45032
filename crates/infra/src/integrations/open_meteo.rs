//! Open-Meteo geocoding and daily forecast adapter
//!
//! No credentials are needed. The forecast API only covers about 16 days
//! ahead; ranges outside that horizon yield an empty forecast.

use async_trait::async_trait;
use calcopilot_core::WeatherPort;
use calcopilot_domain::{CopilotError, DailyWeather, GeoLocation, Result, WeatherConfig};
use chrono::NaiveDate;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode";

#[derive(Clone)]
pub struct OpenMeteoClient {
    http: HttpClient,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    pub fn from_config(config: &WeatherConfig, http: HttpClient) -> Self {
        Self {
            http,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
    name: String,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    daily: Option<Daily>,
}

/// Column-oriented daily series; values may be `null` past the model horizon.
#[derive(Debug, Default, Deserialize)]
struct Daily {
    #[serde(default)]
    time: Vec<NaiveDate>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    weathercode: Vec<Option<u8>>,
}

impl Daily {
    fn into_days(self) -> Vec<DailyWeather> {
        self.time
            .iter()
            .enumerate()
            .filter_map(|(i, date)| {
                let high_f = self.temperature_2m_max.get(i).copied().flatten()?;
                let low_f = self.temperature_2m_min.get(i).copied().flatten()?;
                Some(DailyWeather {
                    date: *date,
                    high_f,
                    low_f,
                    precipitation_in: self.precipitation_sum.get(i).copied().flatten().unwrap_or(0.0),
                    weather_code: self.weathercode.get(i).copied().flatten().unwrap_or(0),
                })
            })
            .collect()
    }
}

#[async_trait]
impl WeatherPort for OpenMeteoClient {
    async fn geocode(&self, city: &str) -> Result<Option<GeoLocation>> {
        let builder = self.http.request(Method::GET, &self.geocoding_url).query(&[
            ("name", city),
            ("count", "1"),
            ("language", "en"),
            ("format", "json"),
        ]);
        let response = self.http.send(builder).await?;
        if !response.status().is_success() {
            let status = response.status();
            warn!(status = status.as_u16(), city, "geocoding request failed");
            return Err(CopilotError::Upstream(format!("Geocoding failed with status {status}")));
        }

        let body: GeocodingResponse = response.json().await.map_err(InfraError::from)?;
        let location = body.results.into_iter().next().map(|hit| GeoLocation {
            name: hit.name,
            country: hit.country.unwrap_or_default(),
            latitude: hit.latitude,
            longitude: hit.longitude,
        });
        debug!(city, found = location.is_some(), "geocoded city");
        Ok(location)
    }

    async fn daily_forecast(
        &self,
        location: &GeoLocation,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyWeather>> {
        let builder = self.http.request(Method::GET, &self.forecast_url).query(&[
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("temperature_unit", "fahrenheit".to_string()),
            ("precipitation_unit", "inch".to_string()),
            ("timezone", "auto".to_string()),
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
        ]);
        let response = self.http.send(builder).await?;

        // Dates outside the forecast horizon are rejected with 400.
        if response.status() == StatusCode::BAD_REQUEST {
            debug!(%start, %end, "forecast range outside the horizon");
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            let status = response.status();
            warn!(status = status.as_u16(), "forecast request failed");
            return Err(CopilotError::Upstream(format!("Forecast failed with status {status}")));
        }

        let body: ForecastResponse = response.json().await.map_err(InfraError::from)?;
        let days = body.daily.unwrap_or_default().into_days();
        debug!(location = %location.name, days = days.len(), "forecast received");
        Ok(days)
    }
}
