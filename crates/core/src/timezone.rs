//! Timezone clock
//!
//! Converts between local wall-clock time in a named IANA zone and absolute
//! instants. Offsets are looked up for each wall time individually, so a range
//! that spans a DST transition gets the right offset on either side of it.
//!
//! Wall times that do not exist (spring-forward gaps) are read with the offset
//! in effect before the jump, which places them just after the gap. Wall times
//! that occur twice (fall-back overlaps) resolve to the earlier instant.

use calcopilot_domain::{CopilotError, EventWindow, Result};
use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    SecondsFormat, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

static OFFSET_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(Z|[+-]\d{2}:?\d{2})$").expect("OFFSET_SUFFIX pattern is valid and well-formed")
});

static MINUTE_PRECISION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"T\d{2}:\d{2}$").expect("MINUTE_PRECISION pattern is valid and well-formed")
});

static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("DATE_SHAPE pattern is valid and well-formed")
});

/// Parse an IANA zone name such as `America/New_York`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CopilotError::InvalidInput(format!("Unknown timezone: {name}")))
}

/// Parse a `YYYY-MM-DD` date, telling impossible dates apart from garbage.
pub fn parse_local_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) if DATE_SHAPE.is_match(trimmed) => Ok(date),
        _ if DATE_SHAPE.is_match(trimmed) => Err(not_a_calendar_date(trimmed)),
        _ => Err(CopilotError::InvalidInput(format!(
            "Invalid date: \"{raw}\". Expected YYYY-MM-DD."
        ))),
    }
}

/// Map a local wall time to an instant.
pub fn resolve_local(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Gaps never last a day, so a day earlier is safely before it.
            let before = tz.offset_from_utc_datetime(&(naive - TimeDelta::hours(24)));
            let offset_secs = i64::from(before.fix().local_minus_utc());
            (naive - TimeDelta::seconds(offset_secs)).and_utc()
        }
    }
}

/// `hour:00:00` on `date` in `tz`.
pub fn instant_at_local_hour(date: NaiveDate, hour: u32, tz: Tz) -> Result<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0)
        .ok_or_else(|| CopilotError::InvalidInput(format!("Hour out of range: {hour}")))?;
    Ok(resolve_local(date.and_time(time), tz))
}

/// UTC offset of `tz` at `instant`, in minutes east of Greenwich.
pub fn offset_minutes(tz: Tz, instant: DateTime<Utc>) -> i32 {
    tz.offset_from_utc_datetime(&instant.naive_utc()).fix().local_minus_utc() / 60
}

/// The instant as seen on a wall clock in `tz`, carrying a fixed offset.
pub fn to_local(instant: DateTime<Utc>, tz: Tz) -> DateTime<FixedOffset> {
    let offset = tz.offset_from_utc_datetime(&instant.naive_utc()).fix();
    instant.with_timezone(&offset)
}

/// ISO-8601 with an explicit numeric offset (`+00:00`, never `Z`).
pub fn format_with_offset(instant: DateTime<Utc>, tz: Tz) -> String {
    to_local(instant, tz).to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Instants covering `start` 00:00:00 through `end` 23:59:59 local time.
pub fn local_day_window(start: NaiveDate, end: NaiveDate, tz: Tz) -> Result<EventWindow> {
    if start > end {
        return Err(CopilotError::InvalidInput(format!(
            "start date {start} is after end date {end}"
        )));
    }
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    Ok(EventWindow {
        time_min: resolve_local(start.and_time(NaiveTime::MIN), tz),
        time_max: resolve_local(end.and_time(last_second), tz),
    })
}

/// Turn a model-produced local datetime into an offset-qualified one.
///
/// Any trailing `Z` or numeric offset is discarded and replaced by the offset
/// `tz` has at that wall time. `HH:MM` is padded to `HH:MM:SS`, and a bare
/// date means local midnight.
pub fn normalize_local_datetime(raw: &str, tz: Tz) -> Result<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    let clean = OFFSET_SUFFIX.replace(trimmed, "");
    let with_secs = if MINUTE_PRECISION.is_match(&clean) {
        format!("{clean}:00")
    } else {
        clean.into_owned()
    };

    let (date_part, time_part) = match with_secs.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (with_secs.as_str(), None),
    };

    if DATE_SHAPE.is_match(date_part) && NaiveDate::parse_from_str(date_part, "%Y-%m-%d").is_err()
    {
        return Err(not_a_calendar_date(date_part));
    }

    let naive = match time_part {
        Some(_) => NaiveDateTime::parse_from_str(&with_secs, "%Y-%m-%dT%H:%M:%S%.f").ok(),
        None if DATE_SHAPE.is_match(date_part) => NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN)),
        None => None,
    }
    .ok_or_else(|| CopilotError::InvalidInput(format!("Invalid datetime: \"{raw}\"")))?;

    Ok(to_local(resolve_local(naive, tz), tz))
}

fn not_a_calendar_date(date: &str) -> CopilotError {
    CopilotError::InvalidInput(format!(
        "\"{date}\" is not a valid calendar date. Please use an existing date."
    ))
}
