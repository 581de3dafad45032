//! Amadeus API payloads

use calcopilot_domain::{FlightOffer, FlightSegment, Itinerary};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationsResponse {
    #[serde(default)]
    pub data: Vec<Location>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Location {
    #[serde(default)]
    pub iata_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEntry {
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OffersResponse {
    #[serde(default)]
    pub data: Vec<Offer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Offer {
    pub price: Price,
    #[serde(default)]
    pub itineraries: Vec<WireItinerary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Price {
    pub grand_total: String,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireItinerary {
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub segments: Vec<WireSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSegment {
    pub carrier_code: String,
    pub departure: Endpoint,
    pub arrival: Endpoint,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Endpoint {
    pub iata_code: String,
    pub at: String,
}

impl From<Offer> for FlightOffer {
    fn from(offer: Offer) -> Self {
        Self {
            grand_total: offer.price.grand_total,
            currency: offer.price.currency,
            itineraries: offer
                .itineraries
                .into_iter()
                .map(|itinerary| Itinerary {
                    duration: itinerary.duration,
                    segments: itinerary
                        .segments
                        .into_iter()
                        .map(|segment| FlightSegment {
                            carrier_code: segment.carrier_code,
                            departure_iata: segment.departure.iata_code,
                            departure_at: segment.departure.at,
                            arrival_iata: segment.arrival.iata_code,
                            arrival_at: segment.arrival.at,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
