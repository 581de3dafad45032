//! Domain types and models

pub mod analytics;
pub mod calendar;
pub mod chat;
pub mod interval;
pub mod layout;
pub mod travel;

pub use analytics::{DayStats, WeekStats};
pub use calendar::{CalendarEvent, EventPatch, EventTime, EventWindow, NewEvent};
pub use chat::{ChatMessage, ChatRequest, DraftData, Role, ToolCall};
pub use interval::{BusyInterval, FreeSlot, FreeSlotQuery, FreeSlotReport, WorkingHoursPolicy};
pub use layout::{LayoutSlot, TimedEvent};
pub use travel::{DailyWeather, FlightOffer, FlightQuery, FlightSegment, GeoLocation, Itinerary};
