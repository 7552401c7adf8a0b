//! Wire representation of remote calendar events.
//!
//! The remote API speaks camelCase JSON with Google-style event shapes:
//! date-only start/end for all-day events, `dateTime` plus `timeZone`
//! otherwise, RRULE strings for recurrence and an overrides block for
//! reminders. [`to_remote`] and [`from_remote`] translate between that
//! shape and [`CalendarEvent`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agenda_core::{Attendee, CalendarEvent, EventCategory, Reminder, ReminderMethod};

use crate::error::{RemoteResult, SyncError};

/// A remote event as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    /// The remote-assigned id. Absent on events not yet created remotely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: RemoteEventTime,
    pub end: RemoteEventTime,
    /// RRULE strings, e.g. `RRULE:FREQ=WEEKLY;INTERVAL=1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<RemoteReminders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<RemoteAttendee>>,
}

/// A remote timestamp: `date` for all-day events, `dateTime` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl RemoteEventTime {
    /// A date-only value, as used by all-day events.
    pub fn date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            date_time: None,
            time_zone: Some("UTC".to_string()),
        }
    }

    /// A timed value.
    pub fn date_time(date_time: DateTime<Utc>) -> Self {
        Self {
            date: None,
            date_time: Some(date_time),
            time_zone: Some("UTC".to_string()),
        }
    }

    fn resolve(&self) -> Option<DateTime<Utc>> {
        self.date_time.or_else(|| {
            self.date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
    }
}

/// The remote reminders block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteReminders {
    pub use_default: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<RemoteReminder>,
}

/// One reminder override: `method` is `"email"` or `"popup"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteReminder {
    pub method: String,
    pub minutes: u32,
}

/// A remote attendee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAttendee {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

/// Translates a local event into its wire shape.
///
/// All-day events serialize as date-only start/end. Recurrence becomes a
/// single RRULE string with `UNTIL` appended when the rule has an end
/// date. A non-empty reminder list disables the remote defaults.
pub fn to_remote(event: &CalendarEvent) -> RemoteEvent {
    let (start, end) = if event.all_day {
        (
            RemoteEventTime::date(event.start.date_naive()),
            RemoteEventTime::date(event.end.date_naive()),
        )
    } else {
        (
            RemoteEventTime::date_time(event.start),
            RemoteEventTime::date_time(event.end),
        )
    };

    let recurrence = event.recurrence.as_ref().map(|rule| {
        let mut rrule = format!(
            "RRULE:FREQ={};INTERVAL={}",
            rule.frequency.rrule_freq(),
            rule.interval
        );
        if let Some(until) = rule.end_date {
            rrule.push_str(&format!(";UNTIL={}", until.format("%Y%m%d")));
        }
        vec![rrule]
    });

    let reminders = if event.reminders.is_empty() {
        None
    } else {
        Some(RemoteReminders {
            use_default: false,
            overrides: event
                .reminders
                .iter()
                .map(|r| RemoteReminder {
                    method: match r.method {
                        ReminderMethod::Email => "email".to_string(),
                        ReminderMethod::Popup => "popup".to_string(),
                    },
                    minutes: r.minutes_before,
                })
                .collect(),
        })
    };

    let attendees = if event.attendees.is_empty() {
        None
    } else {
        Some(
            event
                .attendees
                .iter()
                .map(|a| RemoteAttendee {
                    email: a.email.clone(),
                    display_name: a.display_name.clone(),
                    optional: a.optional,
                })
                .collect(),
        )
    };

    RemoteEvent {
        id: event.remote_id.clone(),
        summary: event.title.clone(),
        description: event.description.clone(),
        location: event.location.clone(),
        start,
        end,
        recurrence,
        reminders,
        attendees,
    }
}

/// Translates a wire event into a local one.
///
/// The local id is a fresh v4 UUID; the remote id lands in `remote_id`.
/// Date-only events anchor at midnight UTC and are marked all-day.
/// RRULE strings are not parsed back into a structured rule.
///
/// # Errors
///
/// Returns an invalid-response error when a timestamp carries neither
/// `date` nor `dateTime`.
pub fn from_remote(remote: &RemoteEvent) -> RemoteResult<CalendarEvent> {
    let start = remote
        .start
        .resolve()
        .ok_or_else(|| SyncError::invalid_response("event start has neither date nor dateTime"))?;
    let end = remote
        .end
        .resolve()
        .ok_or_else(|| SyncError::invalid_response("event end has neither date nor dateTime"))?;
    let all_day = remote.start.date.is_some();

    // Location and geocoordinates stay unset on import; a later
    // enrichment step fills them in.
    let mut event = CalendarEvent::new(Uuid::new_v4().to_string(), &remote.summary, start, end)
        .with_all_day(all_day)
        .with_category(EventCategory::Personal);
    event.remote_id = remote.id.clone();
    event.description = remote.description.clone();
    event.reminders = remote
        .reminders
        .iter()
        .flat_map(|r| r.overrides.iter())
        .map(|r| Reminder {
            method: if r.method == "email" {
                ReminderMethod::Email
            } else {
                ReminderMethod::Popup
            },
            minutes_before: r.minutes,
        })
        .collect();
    event.attendees = remote
        .attendees
        .iter()
        .flatten()
        .map(|a| Attendee {
            email: a.email.clone(),
            display_name: a.display_name.clone(),
            optional: a.optional,
        })
        .collect();

    Ok(event)
}
