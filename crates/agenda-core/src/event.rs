//! Event types for the calendar engine.
//!
//! This module provides the canonical data model:
//! - [`CalendarEvent`]: the unit the engine schedules, queries and syncs
//! - [`EventCategory`]: a fixed classification set used for filtering
//! - [`RecurrenceRule`] / [`Reminder`] / [`Attendee`]: metadata translated
//!   to the remote provider's wire shape during sync

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::time::TimeWindow;

/// The fixed category set for calendar events.
///
/// Categories drive filtering and statistics, never scheduling logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    #[default]
    Work,
    Personal,
    Meeting,
    Holiday,
    Travel,
    Health,
}

impl EventCategory {
    /// Returns a human-readable name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Meeting => "meeting",
            Self::Holiday => "holiday",
            Self::Travel => "travel",
            Self::Health => "health",
        }
    }
}

/// How often a recurring event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceFrequency {
    /// Returns the RRULE frequency token for this variant.
    pub fn rrule_freq(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

/// A recurrence rule attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// How often the event repeats.
    pub frequency: RecurrenceFrequency,
    /// Multiplier on the frequency (every N days/weeks/...).
    pub interval: u32,
    /// Last date on which the event recurs, if bounded.
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// Creates an unbounded rule with the given frequency and interval.
    pub fn new(frequency: RecurrenceFrequency, interval: u32) -> Self {
        Self {
            frequency,
            interval,
            end_date: None,
        }
    }

    /// Builder method to bound the rule by an end date.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderMethod {
    Email,
    Popup,
}

/// A reminder attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Delivery method.
    pub method: ReminderMethod,
    /// How many minutes before the event start the reminder fires.
    pub minutes_before: u32,
}

impl Reminder {
    /// Creates a new reminder.
    pub fn new(method: ReminderMethod, minutes_before: u32) -> Self {
        Self {
            method,
            minutes_before,
        }
    }
}

/// An attendee of a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// The attendee's email address.
    pub email: String,
    /// The attendee's display name, if known.
    pub display_name: Option<String>,
    /// Whether attendance is optional.
    pub optional: bool,
}

impl Attendee {
    /// Creates a new attendee with the given email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            optional: false,
        }
    }
}

/// Geographic coordinates attached to a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// The canonical calendar event.
///
/// Events are created by the command executor (from a matched intent or a
/// structured form) or imported from a remote provider. The `remote_id`
/// back-reference is set only after a successful remote create; its absence
/// means the event has not been synced yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Locally unique identifier, assigned at creation, immutable.
    pub id: String,
    /// Non-empty display title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional free-text location.
    pub location: Option<String>,
    /// Optional geocoordinates for the location.
    pub geo: Option<GeoPoint>,
    /// When the event starts. Invariant: `start <= end`.
    pub start: DateTime<Utc>,
    /// When the event ends.
    pub end: DateTime<Utc>,
    /// Whole-day events are interpreted as full-day intervals regardless
    /// of the clock time stored in `start`/`end`.
    pub all_day: bool,
    /// Category used for filtering and statistics.
    pub category: EventCategory,
    /// Display color hint; not load-bearing for scheduling.
    pub color: Option<String>,
    /// Optional recurrence rule.
    pub recurrence: Option<RecurrenceRule>,
    /// Ordered reminders.
    pub reminders: Vec<Reminder>,
    /// Event attendees.
    pub attendees: Vec<Attendee>,
    /// The remote provider's id for this event, bound after the first
    /// successful export. `None` means "not yet synced".
    pub remote_id: Option<String>,
}

impl CalendarEvent {
    /// Creates a new event with required fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            location: None,
            geo: None,
            start,
            end,
            all_day: false,
            category: EventCategory::default(),
            color: None,
            recurrence: None,
            reminders: Vec::new(),
            attendees: Vec::new(),
            remote_id: None,
        }
    }

    /// Returns the interval this event occupies.
    ///
    /// All-day events occupy their whole calendar day(s), from midnight on
    /// the start date to midnight after the end date.
    pub fn effective_window(&self) -> TimeWindow {
        if self.all_day {
            let start = self
                .start
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .expect("valid time")
                .and_utc();
            let end = self
                .end
                .date_naive()
                .succ_opt()
                .expect("valid successor date")
                .and_hms_opt(0, 0, 0)
                .expect("valid time")
                .and_utc();
            TimeWindow::new(start, end)
        } else {
            TimeWindow::new(self.start, self.end)
        }
    }

    /// Returns the duration of the event in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Returns true if this event has been exported to the remote provider.
    pub fn is_synced(&self) -> bool {
        self.remote_id.is_some()
    }

    /// Case-insensitive containment check against title and description.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set geocoordinates.
    pub fn with_geo(mut self, geo: GeoPoint) -> Self {
        self.geo = Some(geo);
        self
    }

    /// Builder method to mark the event as all-day.
    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Builder method to set the category.
    pub fn with_category(mut self, category: EventCategory) -> Self {
        self.category = category;
        self
    }

    /// Builder method to set the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builder method to set the recurrence rule.
    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// Builder method to add a reminder.
    pub fn with_reminder(mut self, reminder: Reminder) -> Self {
        self.reminders.push(reminder);
        self
    }

    /// Builder method to add an attendee.
    pub fn with_attendee(mut self, attendee: Attendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    /// Builder method to bind the remote provider's id.
    pub fn with_remote_id(mut self, remote_id: impl Into<String>) -> Self {
        self.remote_id = Some(remote_id.into());
        self
    }
}
