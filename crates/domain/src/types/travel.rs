//! Flight and weather lookup types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Flight offer search, with airports already resolved to IATA codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adults: u32,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSegment {
    pub carrier_code: String,
    pub departure_iata: String,
    /// Local departure time as reported by the provider.
    pub departure_at: String,
    pub arrival_iata: String,
    pub arrival_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    /// ISO 8601 duration, e.g. `PT14H30M`.
    pub duration: String,
    pub segments: Vec<FlightSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightOffer {
    /// Decimal string as reported by the provider.
    pub grand_total: String,
    pub currency: String,
    /// Outbound first, then the return leg for round trips.
    pub itineraries: Vec<Itinerary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One day of forecast in imperial units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub high_f: f64,
    pub low_f: f64,
    pub precipitation_in: f64,
    /// WMO weather interpretation code.
    pub weather_code: u8,
}
