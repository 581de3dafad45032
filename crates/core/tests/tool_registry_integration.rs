//! Tool dispatch through the registry with in-memory collaborators.

mod support;

use std::sync::Arc;

use calcopilot_core::{ToolName, ToolRegistry};
use calcopilot_domain::constants::SIGNED_OUT_MESSAGE;
use calcopilot_domain::{
    DailyWeather, FlightOffer, FlightSegment, FreeBusyConfig, GeoLocation, Itinerary, ToolCall,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use support::calendar::{CalendarCall, MockCalendar};
use support::travel::{StubFlights, StubWeather};
use support::{date, timed_event};

fn new_york() -> chrono_tz::Tz {
    chrono_tz::America::New_York
}

fn calendar_registry(calendar: &MockCalendar) -> ToolRegistry {
    ToolRegistry::builder(new_york()).with_calendar(Arc::new(calendar.clone())).build()
}

async fn call(registry: &ToolRegistry, name: &str, args: Value) -> Value {
    registry.dispatch(&ToolCall::new("call_1", name, args.to_string())).await
}

#[tokio::test]
async fn test_every_tool_is_declared_even_when_signed_out() {
    let registry = ToolRegistry::builder(new_york()).build();

    assert_eq!(registry.definitions().len(), ToolName::ALL.len());
    assert!(!registry.has_handler(ToolName::GetEvents));
    assert!(registry.has_handler(ToolName::PrepareEmailDraft));

    for tool in ["get_events", "get_free_slots", "create_calendar_event"] {
        let result = call(&registry, tool, json!({})).await;
        assert_eq!(result["error"], SIGNED_OUT_MESSAGE, "{tool}");
    }

    let result = call(&registry, "search_flights", json!({})).await;
    assert_eq!(result["error"], "search_flights is not available right now.");
}

#[tokio::test]
async fn test_get_events_lists_local_days() {
    let calendar = MockCalendar::new(vec![
        timed_event("evt-a", "Standup", "2026-03-02T09:30:00-05:00", "2026-03-02T09:45:00-05:00"),
        timed_event("evt-b", "Next week", "2026-03-09T09:30:00-04:00", "2026-03-09T10:00:00-04:00"),
    ]);
    let registry = calendar_registry(&calendar);

    let result =
        call(&registry, "get_events", json!({"start_date": "2026-03-02", "end_date": "2026-03-02"}))
            .await;

    assert_eq!(
        result,
        json!([{
            "event_id": "evt-a",
            "summary": "Standup",
            "start": "2026-03-02T09:30:00-05:00",
            "end": "2026-03-02T09:45:00-05:00",
        }])
    );
    assert_eq!(calendar.calls(), vec![CalendarCall::List { max_results: 50 }]);
    let window = calendar.windows()[0];
    assert_eq!(window.time_min, Utc.with_ymd_and_hms(2026, 3, 2, 5, 0, 0).unwrap());
    assert_eq!(window.time_max, Utc.with_ymd_and_hms(2026, 3, 3, 4, 59, 59).unwrap());
}

#[tokio::test]
async fn test_get_events_rejects_impossible_dates() {
    let calendar = MockCalendar::default();
    let registry = calendar_registry(&calendar);

    let result =
        call(&registry, "get_events", json!({"start_date": "2026-02-29", "end_date": "2026-03-01"}))
            .await;

    assert_eq!(
        result["error"],
        "\"2026-02-29\" is not a valid calendar date. Please use an existing date."
    );
    assert!(calendar.calls().is_empty());
}

#[tokio::test]
async fn test_free_slots_around_a_meeting() {
    let calendar = MockCalendar::new(vec![timed_event(
        "evt-a",
        "Sync",
        "2026-03-02T10:00:00-05:00",
        "2026-03-02T10:30:00-05:00",
    )]);
    let registry = calendar_registry(&calendar);

    let result = call(
        &registry,
        "get_free_slots",
        json!({
            "start_date": "2026-03-02",
            "end_date": "2026-03-02",
            "duration_minutes": 30,
            "timezone": "America/New_York",
        }),
    )
    .await;

    assert_eq!(
        result,
        json!({
            "duration_requested_minutes": 30,
            "search_window": { "start": "2026-03-02", "end": "2026-03-02" },
            "total_free_slots_found": 2,
            "slots_returned": 2,
            "slots": [
                {
                    "start": "2026-03-02T09:00:00-05:00",
                    "end": "2026-03-02T10:00:00-05:00",
                    "available_minutes": 60,
                },
                {
                    "start": "2026-03-02T10:30:00-05:00",
                    "end": "2026-03-02T18:00:00-05:00",
                    "available_minutes": 450,
                },
            ],
        })
    );
    assert_eq!(calendar.calls(), vec![CalendarCall::List { max_results: 250 }]);
}

#[tokio::test]
async fn test_free_slots_fractional_duration_compares_seconds() {
    let calendar = MockCalendar::new(vec![timed_event(
        "evt-a",
        "Sync",
        "2026-03-02T09:30:45-05:00",
        "2026-03-02T17:00:00-05:00",
    )]);
    let registry = calendar_registry(&calendar);
    let args = |minutes: f64| {
        json!({"start_date": "2026-03-02", "end_date": "2026-03-02", "duration_minutes": minutes})
    };

    // 30m45s free before the meeting, 60 minutes after.
    let result = call(&registry, "get_free_slots", args(30.5)).await;
    assert_eq!(result["duration_requested_minutes"], 30.5);
    assert_eq!(result["total_free_slots_found"], 2);
    assert_eq!(result["slots"][0]["start"], "2026-03-02T09:00:00-05:00");
    assert_eq!(result["slots"][0]["end"], "2026-03-02T09:30:45-05:00");

    let result = call(&registry, "get_free_slots", args(30.8)).await;
    assert_eq!(result["total_free_slots_found"], 1);
    assert_eq!(result["slots"][0]["start"], "2026-03-02T17:00:00-05:00");
}

#[tokio::test]
async fn test_free_slots_notes_truncation() {
    let calendar = MockCalendar::default();
    let config = FreeBusyConfig { max_slots: 3, ..FreeBusyConfig::default() };
    let registry = ToolRegistry::builder(new_york())
        .with_calendar(Arc::new(calendar.clone()))
        .with_free_busy_config(config)
        .build();

    let result = call(
        &registry,
        "get_free_slots",
        json!({"start_date": "2026-03-02", "end_date": "2026-03-06"}),
    )
    .await;

    assert_eq!(result["duration_requested_minutes"], 30);
    assert_eq!(result["total_free_slots_found"], 5);
    assert_eq!(result["slots_returned"], 3);
    assert_eq!(result["note"], "Only the first 3 of 5 slots are shown.");
}

#[tokio::test]
async fn test_free_slots_validates_before_listing() {
    let calendar = MockCalendar::default();
    let registry = calendar_registry(&calendar);

    let bad_inputs = [
        json!({"start_date": "2026-03-02", "end_date": "2026-03-02", "duration_minutes": 0}),
        json!({"start_date": "2026-03-02", "end_date": "2026-03-02", "duration_minutes": 1441}),
        json!({"start_date": "2026-03-02", "end_date": "2026-03-02", "duration_minutes": 1e300}),
        json!({"start_date": "2026-03-02", "end_date": "2026-03-02", "duration_minutes": -1e300}),
        json!({"start_date": "2026-03-05", "end_date": "2026-03-02"}),
        json!({"start_date": "2026-03-02", "end_date": "2026-03-02", "timezone": "Mars/Olympus"}),
        json!({"start_date": "2026-01-01", "end_date": "2027-06-01"}),
    ];
    for args in bad_inputs {
        let result = call(&registry, "get_free_slots", args.clone()).await;
        assert!(result["error"].is_string(), "{args}");
    }
    assert!(calendar.calls().is_empty());
}

#[tokio::test]
async fn test_create_attaches_local_offset() {
    let calendar = MockCalendar::default();
    let registry = calendar_registry(&calendar);

    let result = call(
        &registry,
        "create_calendar_event",
        json!({
            "summary": "Lunch with Priya",
            "start_datetime": "2026-07-10T12:00",
            "end_datetime": "2026-07-10T13:00:00Z",
            "location": "",
        }),
    )
    .await;

    assert_eq!(
        result,
        json!({
            "success": true,
            "event_id": "evt-1",
            "summary": "Lunch with Priya",
            "start": "2026-07-10T12:00:00-04:00",
            "end": "2026-07-10T13:00:00-04:00",
        })
    );
    assert_eq!(calendar.events()[0].location, None);
}

#[tokio::test]
async fn test_create_rejects_inverted_range() {
    let calendar = MockCalendar::default();
    let registry = calendar_registry(&calendar);

    let result = call(
        &registry,
        "create_calendar_event",
        json!({
            "summary": "Backwards",
            "start_datetime": "2026-07-10T13:00:00",
            "end_datetime": "2026-07-10T12:00:00",
        }),
    )
    .await;

    assert_eq!(result["error"], "end_datetime must be after start_datetime");
    assert!(calendar.calls().is_empty());
}

#[tokio::test]
async fn test_update_and_delete() {
    let calendar = MockCalendar::new(vec![timed_event(
        "evt-a",
        "Sync",
        "2026-03-02T10:00:00-05:00",
        "2026-03-02T10:30:00-05:00",
    )]);
    let registry = calendar_registry(&calendar);

    let empty = call(&registry, "update_calendar_event", json!({"event_id": "evt-a"})).await;
    assert_eq!(empty["error"], "No fields to update were provided.");

    let updated = call(
        &registry,
        "update_calendar_event",
        json!({"event_id": "evt-a", "summary": "Weekly sync", "end_datetime": "2026-03-02T11:00"}),
    )
    .await;
    assert_eq!(updated["summary"], "Weekly sync");
    assert_eq!(updated["start"], "2026-03-02T10:00:00-05:00");
    assert_eq!(updated["end"], "2026-03-02T11:00:00-05:00");

    let deleted = call(&registry, "delete_calendar_event", json!({"event_id": "evt-a"})).await;
    assert_eq!(deleted, json!({"success": true}));

    let missing = call(&registry, "delete_calendar_event", json!({"event_id": "evt-a"})).await;
    assert_eq!(missing["error"], "event evt-a");

    assert_eq!(
        calendar.calls(),
        vec![
            CalendarCall::Update("evt-a".into()),
            CalendarCall::Delete("evt-a".into()),
            CalendarCall::Delete("evt-a".into()),
        ]
    );
}

#[tokio::test]
async fn test_blank_arguments_count_as_empty_object() {
    let registry = ToolRegistry::builder(new_york()).build();

    let result = registry.dispatch(&ToolCall::new("call_1", "prepare_email_draft", "  ")).await;

    assert!(result["error"].as_str().unwrap().starts_with("Invalid arguments for prepare_email_draft"));
}

fn offer() -> FlightOffer {
    let leg = |from: &str, to: &str| Itinerary {
        duration: "PT11H5M".into(),
        segments: vec![FlightSegment {
            carrier_code: "NH".into(),
            departure_iata: from.into(),
            departure_at: "2026-05-01T11:00:00".into(),
            arrival_iata: to.into(),
            arrival_at: "2026-05-02T15:05:00".into(),
        }],
    };
    FlightOffer {
        grand_total: "1234.5".into(),
        currency: "USD".into(),
        itineraries: vec![leg("SFO", "NRT"), leg("NRT", "SFO")],
    }
}

#[tokio::test]
async fn test_flight_search_resolves_city_names() {
    let flights = StubFlights::new(&[("TOKYO", "NRT")], vec![offer()]);
    let registry = ToolRegistry::builder(new_york()).with_flights(Arc::new(flights.clone())).build();

    let result = call(
        &registry,
        "search_flights",
        json!({
            "origin": " sfo ",
            "destination": "Tokyo",
            "departure_date": "2026-05-01",
            "return_date": "2026-05-10",
            "adults": 2,
        }),
    )
    .await;

    assert_eq!(flights.lookups(), vec!["TOKYO"]);
    let query = &flights.queries()[0];
    assert_eq!(query.origin, "SFO");
    assert_eq!(query.destination, "NRT");
    assert_eq!(query.adults, 2);
    assert_eq!(query.currency, "USD");

    let link = "https://www.kayak.com/flights/SFO-NRT/2026-05-01/2026-05-10/2adults";
    assert_eq!(result["search_link"], link);
    assert_eq!(result["flights"][0]["price"], "1234.50 USD");
    assert_eq!(result["flights"][0]["outbound"]["duration"], "11h 5m");
    assert_eq!(result["flights"][0]["return"]["departs"], "NRT 2026-05-01T11:00:00");
    assert_eq!(result["flights"][0]["booking_link"], link);
}

#[tokio::test]
async fn test_flight_search_errors() {
    let flights = StubFlights::new(&[], vec![]);
    let registry = ToolRegistry::builder(new_york()).with_flights(Arc::new(flights.clone())).build();

    let unknown = call(
        &registry,
        "search_flights",
        json!({"origin": "JFK", "destination": "Atlantis", "departure_date": "2026-05-01"}),
    )
    .await;
    assert_eq!(unknown["error"], "Could not find an airport for \"ATLANTIS\".");

    let no_adults = call(
        &registry,
        "search_flights",
        json!({"origin": "JFK", "destination": "LAX", "departure_date": "2026-05-01", "adults": 0}),
    )
    .await;
    assert!(no_adults["error"].as_str().unwrap().starts_with("adults must be at least 1"));

    let empty = call(
        &registry,
        "search_flights",
        json!({"origin": "JFK", "destination": "LAX", "departure_date": "2026-05-01"}),
    )
    .await;
    assert_eq!(empty["flights"], json!([]));
    assert!(empty["message"].is_string());
}

#[tokio::test]
async fn test_weather_forecast_and_packing() {
    let weather = StubWeather {
        location: Some(GeoLocation {
            name: "Reykjavik".into(),
            country: "Iceland".into(),
            latitude: 64.15,
            longitude: -21.94,
        }),
        days: vec![DailyWeather {
            date: date(2026, 11, 3),
            high_f: 38.4,
            low_f: 29.6,
            precipitation_in: 0.2,
            weather_code: 73,
        }],
    };
    let registry = ToolRegistry::builder(new_york()).with_weather(Arc::new(weather)).build();

    let result = call(
        &registry,
        "get_weather_forecast",
        json!({"city": "Reykjavik", "start_date": "2026-11-03", "end_date": "2026-11-04"}),
    )
    .await;

    assert_eq!(result["destination"], "Reykjavik, Iceland");
    assert_eq!(result["forecast"][0]["high_f"], 38.0);
    let packing: Vec<&str> =
        result["packing_list"].as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
    assert!(packing.contains(&"Heavy winter boots"));
    assert!(packing.contains(&"Snow boots"));
    assert!(packing.contains(&"Umbrella or compact rain jacket"));
    assert!(!packing.contains(&"Sunscreen and sunglasses"));
}

#[tokio::test]
async fn test_weather_unknown_city_and_empty_range() {
    let registry =
        ToolRegistry::builder(new_york()).with_weather(Arc::new(StubWeather::default())).build();
    let result = call(
        &registry,
        "get_weather_forecast",
        json!({"city": "Atlantis", "start_date": "2026-11-03", "end_date": "2026-11-04"}),
    )
    .await;
    assert_eq!(result["error"], "Could not find location: \"Atlantis\"");

    let weather = StubWeather {
        location: Some(GeoLocation {
            name: "Lima".into(),
            country: "Peru".into(),
            latitude: -12.05,
            longitude: -77.04,
        }),
        days: vec![],
    };
    let registry = ToolRegistry::builder(new_york()).with_weather(Arc::new(weather)).build();
    let result = call(
        &registry,
        "get_weather_forecast",
        json!({"city": "Lima", "start_date": "2027-01-03", "end_date": "2027-01-04"}),
    )
    .await;
    assert!(result["error"].as_str().unwrap().starts_with("Weather data unavailable"));
}
