//! Core types: events, time windows, slots, tracing setup

pub mod event;
pub mod time;
pub mod tracing;

pub use event::{
    Attendee, CalendarEvent, EventCategory, GeoPoint, RecurrenceFrequency, RecurrenceRule,
    Reminder, ReminderMethod,
};
pub use time::{TimeSlot, TimeWindow, enumerate_slots, same_day, same_iso_week};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
