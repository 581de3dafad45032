//! Flight offer presentation: carrier names, durations and booking links

use calcopilot_domain::{FlightOffer, Itinerary};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static IATA_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,3}$").expect("IATA_CODE pattern is valid and well-formed"));

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?").expect("ISO_DURATION pattern is valid and well-formed")
});

/// Display name for common carriers.
pub fn carrier_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "AA" => "American Airlines",
        "DL" => "Delta",
        "UA" => "United",
        "WN" => "Southwest",
        "B6" => "JetBlue",
        "AS" => "Alaska Airlines",
        "F9" => "Frontier",
        "NK" => "Spirit",
        "G4" => "Allegiant",
        "BA" => "British Airways",
        "LH" => "Lufthansa",
        "AF" => "Air France",
        "KL" => "KLM",
        "EK" => "Emirates",
        "QR" => "Qatar Airways",
        "SQ" => "Singapore Airlines",
        "CX" => "Cathay Pacific",
        "NH" => "ANA",
        "JL" => "Japan Airlines",
        "AC" => "Air Canada",
        "VS" => "Virgin Atlantic",
        _ => return None,
    };
    Some(name)
}

/// Two or three upper-case letters, used as-is without a location lookup.
pub fn is_iata_code(query: &str) -> bool {
    IATA_CODE.is_match(query)
}

/// `PT14H30M` -> `14h 30m`. Unrecognised input is returned unchanged.
pub fn format_iso_duration(iso: &str) -> String {
    let Some(caps) = ISO_DURATION.captures(iso) else {
        return iso.to_string();
    };
    let parts: Vec<String> = [(1, 'h'), (2, 'm')]
        .into_iter()
        .filter_map(|(group, unit)| caps.get(group).map(|m| format!("{}{unit}", m.as_str())))
        .collect();
    if parts.is_empty() {
        iso.to_string()
    } else {
        parts.join(" ")
    }
}

/// Kayak search URL for the route.
pub fn kayak_link(
    origin: &str,
    destination: &str,
    departure: NaiveDate,
    return_date: Option<NaiveDate>,
    adults: u32,
) -> String {
    let trip = match return_date {
        Some(ret) => format!("{origin}-{destination}/{departure}/{ret}"),
        None => format!("{origin}-{destination}/{departure}"),
    };
    format!("https://www.kayak.com/flights/{trip}/{adults}adults")
}

/// One direction of an offer as shown to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItinerarySummary {
    pub airline: String,
    pub carrier_code: String,
    pub departs: String,
    pub arrives: String,
    pub duration: String,
    pub stops: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferSummary {
    pub price: String,
    pub outbound: ItinerarySummary,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub return_leg: Option<ItinerarySummary>,
    pub booking_link: String,
}

fn summarize_itinerary(itinerary: &Itinerary) -> Option<ItinerarySummary> {
    let first = itinerary.segments.first()?;
    let last = itinerary.segments.last()?;
    Some(ItinerarySummary {
        airline: carrier_name(&first.carrier_code)
            .map_or_else(|| first.carrier_code.clone(), str::to_string),
        carrier_code: first.carrier_code.clone(),
        departs: format!("{} {}", first.departure_iata, first.departure_at),
        arrives: format!("{} {}", last.arrival_iata, last.arrival_at),
        duration: format_iso_duration(&itinerary.duration),
        stops: itinerary.segments.len() - 1,
    })
}

/// Price rounded to cents followed by the currency code.
pub fn format_price(grand_total: &str, currency: &str) -> String {
    match grand_total.parse::<f64>() {
        Ok(amount) => format!("{amount:.2} {currency}"),
        Err(_) => format!("{grand_total} {currency}"),
    }
}

/// Summary of an offer; `None` when it carries no outbound segments.
pub fn summarize_offer(offer: &FlightOffer, booking_link: &str) -> Option<OfferSummary> {
    let outbound = summarize_itinerary(offer.itineraries.first()?)?;
    Some(OfferSummary {
        price: format_price(&offer.grand_total, &offer.currency),
        outbound,
        return_leg: offer.itineraries.get(1).and_then(summarize_itinerary),
        booking_link: booking_link.to_string(),
    })
}
