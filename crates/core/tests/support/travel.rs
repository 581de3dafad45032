use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calcopilot_core::{FlightSearchPort, WeatherPort};
use calcopilot_domain::{
    CopilotError, DailyWeather, FlightOffer, FlightQuery, GeoLocation, Result as DomainResult,
};
use chrono::NaiveDate;

/// Flight search with fixed location lookups and offers.
#[derive(Default, Clone)]
pub struct StubFlights {
    pub locations: HashMap<String, String>,
    pub offers: Vec<FlightOffer>,
    lookups: Arc<Mutex<Vec<String>>>,
    queries: Arc<Mutex<Vec<FlightQuery>>>,
}

impl StubFlights {
    pub fn new(locations: &[(&str, &str)], offers: Vec<FlightOffer>) -> Self {
        Self {
            locations: locations.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
            offers,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<FlightQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl FlightSearchPort for StubFlights {
    async fn resolve_location(&self, query: &str) -> DomainResult<String> {
        self.lookups.lock().unwrap().push(query.to_string());
        self.locations
            .get(query)
            .cloned()
            .ok_or_else(|| CopilotError::NotFound(format!("Could not find an airport for \"{query}\".")))
    }

    async fn search_offers(&self, query: &FlightQuery) -> DomainResult<Vec<FlightOffer>> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.offers.clone())
    }
}

/// Weather source with one known city.
#[derive(Default, Clone)]
pub struct StubWeather {
    pub location: Option<GeoLocation>,
    pub days: Vec<DailyWeather>,
}

#[async_trait]
impl WeatherPort for StubWeather {
    async fn geocode(&self, _city: &str) -> DomainResult<Option<GeoLocation>> {
        Ok(self.location.clone())
    }

    async fn daily_forecast(
        &self,
        _location: &GeoLocation,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<DailyWeather>> {
        Ok(self.days.iter().filter(|d| d.date >= start && d.date <= end).cloned().collect())
    }
}
