//! Tool descriptions and JSON input schemas

use serde_json::{json, Value};

use super::{ToolDefinition, ToolName};

/// Definitions for every tool, in catalog order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolName::ALL
        .into_iter()
        .map(|name| ToolDefinition {
            name,
            description: description(name),
            input_schema: input_schema(name),
        })
        .collect()
}

fn description(name: ToolName) -> &'static str {
    match name {
        ToolName::GetEvents => {
            "Fetch calendar events (with their IDs, titles, and times) for a date range. \
             Always call this before update_calendar_event or delete_calendar_event so you \
             have the correct event_id."
        }
        ToolName::CreateCalendarEvent => {
            "Create a new event on the user's primary Google Calendar."
        }
        ToolName::UpdateCalendarEvent => {
            "Update fields on an existing calendar event. Requires event_id; call get_events \
             first if you don't have it. Only the fields you provide will be changed."
        }
        ToolName::DeleteCalendarEvent => {
            "Permanently delete a calendar event. Requires event_id; call get_events first if \
             you don't have it. Only call this after the user has explicitly confirmed the \
             deletion."
        }
        ToolName::GetFreeSlots => {
            "Find available (free) time slots in the user's Google Calendar for a given date \
             range. Use this whenever the user wants to find time to schedule something, check \
             their availability, or figure out when they are free. Only working hours are \
             searched."
        }
        ToolName::PrepareEmailDraft => {
            "Prepare an email draft for the user to review. Call this after writing an email \
             draft in your response; it will display a 'Save to Gmail Drafts' button in the UI \
             so the user can save it with one click. Does not send or save anything \
             automatically."
        }
        ToolName::SearchFlights => {
            "Search for available one-way or round-trip flights between two airports or \
             cities. Returns up to 5 options with airline, departure/arrival times, duration, \
             stops, price, and a Kayak booking link. Pass IATA airport codes when known (e.g. \
             'JFK', 'NRT'); pass a city name otherwise and the tool will resolve it."
        }
        ToolName::GetWeatherForecast => {
            "Get a daily weather forecast for a destination city over a date range. Returns \
             conditions, high/low temperatures, precipitation, and a packing list. Call this \
             when the user asks what to expect weather-wise or what to pack for a trip."
        }
    }
}

fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn number(description: &str) -> Value {
    json!({ "type": "number", "description": description })
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({ "type": "object", "properties": properties, "required": required })
}

fn input_schema(name: ToolName) -> Value {
    match name {
        ToolName::GetEvents => object(
            json!({
                "start_date": string("Start of range, YYYY-MM-DD."),
                "end_date": string("End of range, YYYY-MM-DD (inclusive)."),
            }),
            &["start_date", "end_date"],
        ),
        ToolName::CreateCalendarEvent => object(
            json!({
                "summary": string("Event title."),
                "start_datetime": string(
                    "Start time in YYYY-MM-DDTHH:MM:SS (local time, no timezone suffix)."
                ),
                "end_datetime": string(
                    "End time in YYYY-MM-DDTHH:MM:SS (local time, no timezone suffix)."
                ),
                "description": string("Optional event description or notes."),
                "location": string("Optional location."),
            }),
            &["summary", "start_datetime", "end_datetime"],
        ),
        ToolName::UpdateCalendarEvent => object(
            json!({
                "event_id": string("ID of the event to update."),
                "summary": string("New event title."),
                "start_datetime": string("New start time, YYYY-MM-DDTHH:MM:SS (local time)."),
                "end_datetime": string("New end time, YYYY-MM-DDTHH:MM:SS (local time)."),
                "description": string("New description."),
                "location": string("New location."),
            }),
            &["event_id"],
        ),
        ToolName::DeleteCalendarEvent => object(
            json!({ "event_id": string("ID of the event to delete.") }),
            &["event_id"],
        ),
        ToolName::GetFreeSlots => object(
            json!({
                "start_date": string(
                    "Start of the search window, YYYY-MM-DD (e.g. '2026-02-27')."
                ),
                "end_date": string("End of the search window, YYYY-MM-DD (inclusive)."),
                "duration_minutes": number(
                    "Desired slot length in minutes. Defaults to 30 if the user didn't specify."
                ),
                "timezone": string(
                    "IANA timezone identifier (e.g. 'America/New_York'). Always pass this; \
                     the system prompt provides the user's timezone."
                ),
            }),
            &["start_date", "end_date", "timezone"],
        ),
        ToolName::PrepareEmailDraft => object(
            json!({
                "to": string(
                    "Recipient email address or display name (e.g. 'joe@company.com' or \
                     'Joe Smith <joe@company.com>'). Omit if unknown."
                ),
                "subject": string("Email subject line."),
                "body": string("Full plain-text email body."),
            }),
            &["subject", "body"],
        ),
        ToolName::SearchFlights => object(
            json!({
                "origin": string(
                    "Departure airport IATA code or city name (e.g. 'SFO' or 'San Francisco')."
                ),
                "destination": string(
                    "Arrival airport IATA code or city name (e.g. 'NRT' or 'Tokyo')."
                ),
                "departure_date": string("Outbound departure date, YYYY-MM-DD."),
                "return_date": string(
                    "Return date for round trips, YYYY-MM-DD. Omit for one-way."
                ),
                "adults": number("Number of adult passengers. Defaults to 1."),
                "currency": string("Currency code, e.g. 'USD'. Defaults to 'USD'."),
            }),
            &["origin", "destination", "departure_date"],
        ),
        ToolName::GetWeatherForecast => object(
            json!({
                "city": string("Destination city name, e.g. 'Tokyo' or 'Paris, France'."),
                "start_date": string("First day of the trip, YYYY-MM-DD."),
                "end_date": string("Last day of the trip, YYYY-MM-DD."),
            }),
            &["city", "start_date", "end_date"],
        ),
    }
}
