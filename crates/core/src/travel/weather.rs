//! Forecast presentation and packing suggestions

use calcopilot_domain::DailyWeather;
use serde::Serialize;

/// Human-readable label for a WMO weather interpretation code.
pub fn condition_label(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Icy fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Light rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Light snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Light showers",
        81 => "Moderate showers",
        82 => "Heavy showers",
        85 => "Light snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub date: String,
    pub condition: &'static str,
    pub high_f: f64,
    pub low_f: f64,
    pub precipitation_in: f64,
}

/// Forecast rows with temperatures rounded to whole degrees.
pub fn forecast_days(days: &[DailyWeather]) -> Vec<ForecastDay> {
    days.iter()
        .map(|day| ForecastDay {
            date: day.date.to_string(),
            condition: condition_label(day.weather_code),
            high_f: day.high_f.round(),
            low_f: day.low_f.round(),
            precipitation_in: day.precipitation_in,
        })
        .collect()
}

const ALWAYS_PACK: [&str; 4] = [
    "Comfortable walking shoes",
    "Phone charger and power bank",
    "Travel adapter (if international)",
    "Any medications and toiletries",
];

/// Packing suggestions for the whole trip, most specific first.
pub fn build_packing_list(days: &[DailyWeather]) -> Vec<&'static str> {
    let max_high = days.iter().map(|d| d.high_f.round()).fold(f64::NEG_INFINITY, f64::max);
    let min_low = days.iter().map(|d| d.low_f.round()).fold(f64::INFINITY, f64::min);
    let has_rain = days.iter().any(|d| d.precipitation_in > 0.05);
    let has_snow = days.iter().any(|d| (71..=77).contains(&d.weather_code));
    let has_thunder = days.iter().any(|d| d.weather_code >= 95);

    let mut packing = Vec::new();
    if max_high >= 85.0 {
        packing.extend(["Shorts and t-shirts", "Sunscreen and sunglasses", "Hat or cap"]);
    }
    if min_low < 45.0 {
        packing.extend(["Warm jacket or heavy coat", "Thermal layers", "Gloves and scarf"]);
    }
    if min_low < 32.0 {
        packing.extend(["Heavy winter boots", "Wool socks"]);
    }
    if (50.0..85.0).contains(&max_high) && min_low >= 32.0 {
        packing.push("Light jacket or layers for variable temps");
    }
    if has_rain || has_thunder {
        packing.extend(["Umbrella or compact rain jacket", "Waterproof shoes or extra dry socks"]);
    }
    if has_snow {
        packing.extend(["Snow boots", "Extra warm socks"]);
    }
    packing.extend(ALWAYS_PACK);
    packing
}
