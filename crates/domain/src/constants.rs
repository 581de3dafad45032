//! Domain constants

/// Model turns that may request tools before the final answer is forced.
pub const DEFAULT_MAX_TOOL_ITERATIONS: usize = 5;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_WORK_START_HOUR: u32 = 9;
pub const DEFAULT_WORK_END_HOUR: u32 = 18;

/// Free slots returned to the model; the true total is reported separately.
pub const DEFAULT_MAX_FREE_SLOTS: usize = 30;

pub const DEFAULT_MEETING_DURATION_MINUTES: i64 = 30;
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Longest date range a single availability lookup may span.
pub const DEFAULT_MAX_RANGE_DAYS: i64 = 366;

/// Minutes in a local day; the layout grid ends here.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Monday to Friday at eight hours a day; the base for the weekly load share.
pub const WORK_MINUTES_PER_WEEK: i64 = 5 * 8 * 60;

/// Span given to events whose end is not after their start.
pub const MIN_EVENT_SPAN_MINUTES: u32 = 30;

/// Summary shown for events without a title.
pub const UNTITLED_EVENT: &str = "(No title)";

pub const SIGNED_OUT_MESSAGE: &str =
    "User is not signed in with Google. Cannot access Google Calendar.";
