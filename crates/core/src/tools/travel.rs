//! Flight search and weather forecast tools

use std::sync::Arc;

use async_trait::async_trait;
use calcopilot_domain::{CopilotError, FlightQuery, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{non_empty, parse_args, to_json, ToolHandler, ToolName};
use crate::timezone::parse_local_date;
use crate::travel::{build_packing_list, forecast_days, is_iata_code, kayak_link, summarize_offer};
use crate::travel_ports::{FlightSearchPort, WeatherPort};

const MAX_OFFERS: usize = 5;

#[derive(Deserialize)]
struct FlightArgs {
    origin: String,
    destination: String,
    departure_date: String,
    #[serde(default)]
    return_date: Option<String>,
    #[serde(default)]
    adults: Option<f64>,
    #[serde(default)]
    currency: Option<String>,
}

/// `search_flights`
pub struct SearchFlightsTool {
    flights: Arc<dyn FlightSearchPort>,
}

impl SearchFlightsTool {
    pub fn new(flights: Arc<dyn FlightSearchPort>) -> Self {
        Self { flights }
    }

    async fn resolve(&self, query: &str) -> Result<String> {
        let normalized = query.trim().to_uppercase();
        if is_iata_code(&normalized) {
            Ok(normalized)
        } else {
            self.flights.resolve_location(&normalized).await
        }
    }
}

#[async_trait]
impl ToolHandler for SearchFlightsTool {
    async fn call(&self, args: Value) -> Result<Value> {
        let args: FlightArgs = parse_args(ToolName::SearchFlights, args)?;
        let departure = parse_local_date(&args.departure_date)?;
        let return_date = non_empty(args.return_date).map(|d| parse_local_date(&d)).transpose()?;
        let adults = match args.adults {
            Some(n) if n.is_finite() && n >= 1.0 => n.round() as u32,
            Some(n) => {
                return Err(CopilotError::InvalidInput(format!(
                    "adults must be at least 1 (got {n})"
                )))
            }
            None => 1,
        };
        let currency = non_empty(args.currency).unwrap_or_else(|| "USD".to_string());

        let (origin, destination) =
            futures::try_join!(self.resolve(&args.origin), self.resolve(&args.destination))?;

        let query = FlightQuery {
            origin: origin.clone(),
            destination: destination.clone(),
            departure_date: departure,
            return_date,
            adults,
            currency: currency.clone(),
        };
        let offers = self.flights.search_offers(&query).await?;
        if offers.is_empty() {
            return Ok(json!({
                "flights": [],
                "message": "No flights found for this route and date combination.",
            }));
        }

        let link = kayak_link(&origin, &destination, departure, return_date, adults);
        let flights: Vec<_> =
            offers.iter().take(MAX_OFFERS).filter_map(|o| summarize_offer(o, &link)).collect();

        Ok(json!({
            "origin": origin,
            "destination": destination,
            "departure_date": departure.to_string(),
            "return_date": return_date.map(|d| d.to_string()),
            "adults": adults,
            "currency": currency,
            "flights": to_json(&flights)?,
            "search_link": link,
        }))
    }
}

#[derive(Deserialize)]
struct WeatherArgs {
    city: String,
    start_date: String,
    end_date: String,
}

/// `get_weather_forecast`: daily forecast plus a packing list
pub struct WeatherForecastTool {
    weather: Arc<dyn WeatherPort>,
}

impl WeatherForecastTool {
    pub fn new(weather: Arc<dyn WeatherPort>) -> Self {
        Self { weather }
    }
}

#[async_trait]
impl ToolHandler for WeatherForecastTool {
    async fn call(&self, args: Value) -> Result<Value> {
        let args: WeatherArgs = parse_args(ToolName::GetWeatherForecast, args)?;
        let start = parse_local_date(&args.start_date)?;
        let end = parse_local_date(&args.end_date)?;

        let location = self.weather.geocode(&args.city).await?.ok_or_else(|| {
            CopilotError::NotFound(format!("Could not find location: \"{}\"", args.city))
        })?;

        let days = self.weather.daily_forecast(&location, start, end).await?;
        if days.is_empty() {
            return Err(CopilotError::NotFound(
                "Weather data unavailable for this date range. Forecasts cover up to 16 days \
                 ahead."
                    .into(),
            ));
        }

        Ok(json!({
            "destination": format!("{}, {}", location.name, location.country),
            "forecast": to_json(&forecast_days(&days))?,
            "packing_list": build_packing_list(&days),
        }))
    }
}
