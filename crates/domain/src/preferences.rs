//! User preferences and the system-prompt section rendered from them
//!
//! Preferences are owned by the client and sent with every chat request;
//! nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MAX_ADDITIONAL_CONTEXT_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredTime {
    Morning,
    Afternoon,
    Evening,
    #[default]
    Any,
}

impl_domain_status_conversions!(PreferredTime {
    Morning => "morning",
    Afternoon => "afternoon",
    Evening => "evening",
    Any => "any",
});

impl PreferredTime {
    fn label(self) -> &'static str {
        match self {
            Self::Morning => "morning (before noon)",
            Self::Afternoon => "afternoon (12–5 PM)",
            Self::Evening => "evening (after 5 PM)",
            Self::Any => "any time of day",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationStyle {
    #[default]
    Concise,
    Detailed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Imperial,
    Metric,
}

/// Soft weekly commitment the assistant should schedule around
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringActivity {
    pub id: String,
    pub name: String,
    pub times_per_week: u8,
    pub duration_minutes: u32,
    #[serde(default)]
    pub preferred_time: PreferredTime,
    /// 0 = Sunday .. 6 = Saturday; empty means any day.
    #[serde(default)]
    pub preferred_days: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPreferences {
    pub home_location: String,
    pub work_location: String,
    pub nearest_airport: String,
    /// Index 0 = Sunday; anything other than 7 entries falls back to Mon-Fri.
    pub work_days: Vec<bool>,
    /// `HH:MM`, 24-hour.
    pub work_start_time: String,
    pub work_end_time: String,
    pub buffer_minutes: u32,
    /// `HH:MM`, or empty to disable.
    pub lunch_break_start: String,
    pub lunch_break_end: String,
    pub default_meeting_duration: u32,
    pub activities: Vec<RecurringActivity>,
    pub communication_style: CommunicationStyle,
    pub units: Units,
    pub additional_context: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            home_location: String::new(),
            work_location: String::new(),
            nearest_airport: String::new(),
            work_days: default_work_days(),
            work_start_time: "09:00".into(),
            work_end_time: "18:00".into(),
            buffer_minutes: 0,
            lunch_break_start: String::new(),
            lunch_break_end: String::new(),
            default_meeting_duration: 30,
            activities: Vec::new(),
            communication_style: CommunicationStyle::Concise,
            units: Units::Imperial,
            additional_context: String::new(),
        }
    }
}

fn default_work_days() -> Vec<bool> {
    vec![false, true, true, true, true, true, false]
}

/// Render the `USER PREFERENCES` block appended to the system prompt.
///
/// Returns an empty string when there is nothing to add.
pub fn build_preferences_context(prefs: &UserPreferences) -> String {
    let mut sections: Vec<String> = Vec::new();

    let mut profile = Vec::new();
    if !prefs.home_location.is_empty() {
        profile.push(format!("Home: {}", prefs.home_location));
    }
    if !prefs.work_location.is_empty() {
        profile.push(format!("Work: {}", prefs.work_location));
    }
    if !prefs.nearest_airport.is_empty() {
        profile.push(format!("Nearest airport: {}", prefs.nearest_airport));
    }
    if prefs.units == Units::Metric {
        profile.push("Units: metric (°C, km)".to_string());
    }
    if !profile.is_empty() {
        sections.push(profile.join("\n"));
    }

    let work_days =
        if prefs.work_days.len() == 7 { prefs.work_days.clone() } else { default_work_days() };
    let mut schedule = Vec::new();
    let day_names: Vec<&str> = work_days
        .iter()
        .zip(DAY_NAMES)
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
    if !day_names.is_empty() {
        schedule.push(format!("Work days: {}", day_names.join(", ")));
    }
    schedule.push(format!("Work hours: {}–{}", prefs.work_start_time, prefs.work_end_time));
    if prefs.buffer_minutes > 0 {
        schedule.push(format!("Buffer between meetings: {} min", prefs.buffer_minutes));
    }
    if !prefs.lunch_break_start.is_empty() && !prefs.lunch_break_end.is_empty() {
        schedule.push(format!(
            "Lunch break: {}–{} (avoid scheduling over this)",
            prefs.lunch_break_start, prefs.lunch_break_end
        ));
    }
    if prefs.default_meeting_duration != 30 {
        schedule.push(format!("Default meeting duration: {} min", prefs.default_meeting_duration));
    }
    sections.push(schedule.join("\n"));

    if !prefs.activities.is_empty() {
        let mut lines = vec![
            "Recurring weekly activities (soft commitments: schedule these and avoid conflicts):"
                .to_string(),
        ];
        for activity in &prefs.activities {
            let day_label = if activity.preferred_days.is_empty() {
                "any day".to_string()
            } else {
                let days: Vec<&str> = activity
                    .preferred_days
                    .iter()
                    .filter_map(|d| DAY_NAMES.get(usize::from(*d)).copied())
                    .collect();
                format!("preferred days: {}", days.join("/"))
            };
            lines.push(format!(
                "  • {}: {}×/week, {} min, {}, {}",
                activity.name,
                activity.times_per_week,
                activity.duration_minutes,
                activity.preferred_time.label(),
                day_label
            ));
        }
        lines.push(
            "When a new event conflicts with a recurring activity, warn the user and offer to \
             reschedule the activity to the next available matching slot."
                .to_string(),
        );
        lines.push(
            "When asked to \"plan my week\" or \"schedule my activities\", use get_free_slots \
             then create_calendar_event for each recurring activity."
                .to_string(),
        );
        sections.push(lines.join("\n"));
    }

    let extra = prefs.additional_context.trim();
    if !extra.is_empty() {
        let clipped: String = extra.chars().take(MAX_ADDITIONAL_CONTEXT_CHARS).collect();
        sections.push(format!("Additional context: {clipped}"));
    }

    if sections.is_empty() {
        return String::new();
    }
    format!("\n\nUSER PREFERENCES\n{}", sections.join("\n\n"))
}
