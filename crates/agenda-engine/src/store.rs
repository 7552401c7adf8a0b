//! The event store seam.
//!
//! The engine never owns persistence; it talks to an [`EventStore`]
//! collaborator through this trait. [`MemoryStore`] is the in-memory
//! reference implementation used by tests and embedders that do not need
//! durable storage.

use thiserror::Error;
use uuid::Uuid;

use agenda_core::{
    Attendee, CalendarEvent, EventCategory, RecurrenceRule, Reminder, TimeWindow,
};
use chrono::{DateTime, Utc};

/// Errors from an event store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store backend cannot be reached. Fatal for the operation in
    /// progress; always propagated, never converted to guidance text.
    #[error("event store unavailable: {0}")]
    Unavailable(String),

    /// No event with the given id exists.
    #[error("event not found: {0}")]
    NotFound(String),
}

/// A specialized Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The fields of an event to be created, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub category: EventCategory,
    pub color: Option<String>,
    pub recurrence: Option<RecurrenceRule>,
    pub reminders: Vec<Reminder>,
    pub attendees: Vec<Attendee>,
}

impl EventDraft {
    /// Creates a draft with required fields.
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            location: None,
            start,
            end,
            all_day: false,
            category: EventCategory::default(),
            color: None,
            recurrence: None,
            reminders: Vec::new(),
            attendees: Vec::new(),
        }
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the category.
    pub fn with_category(mut self, category: EventCategory) -> Self {
        self.category = category;
        self
    }

    /// Builder method to mark the draft as all-day.
    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Materializes the draft into an event with the given id.
    pub fn into_event(self, id: impl Into<String>) -> CalendarEvent {
        let mut event = CalendarEvent::new(id, self.title, self.start, self.end)
            .with_all_day(self.all_day)
            .with_category(self.category);
        event.description = self.description;
        event.location = self.location;
        event.color = self.color;
        event.recurrence = self.recurrence;
        event.reminders = self.reminders;
        event.attendees = self.attendees;
        event
    }
}

/// CRUD + range query over calendar events.
///
/// Implementations must assign a stable, unique id on `create`.
pub trait EventStore {
    /// Returns the events whose effective interval overlaps `window`.
    fn query(&self, window: &TimeWindow) -> StoreResult<Vec<CalendarEvent>>;

    /// Persists a new event, assigning its id.
    fn create(&mut self, draft: EventDraft) -> StoreResult<CalendarEvent>;

    /// Replaces the mutable fields of an existing event.
    ///
    /// Returns `None` when no event with the given id exists.
    fn update(&mut self, id: &str, draft: EventDraft) -> StoreResult<Option<CalendarEvent>>;

    /// Removes an event by id.
    fn delete(&mut self, id: &str) -> StoreResult<()>;
}

/// In-memory event store. Ids are v4 UUIDs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Vec<CalendarEvent>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all events in insertion order.
    pub fn all(&self) -> Vec<CalendarEvent> {
        self.events.clone()
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when the store holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventStore for MemoryStore {
    fn query(&self, window: &TimeWindow) -> StoreResult<Vec<CalendarEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| window.overlaps(&e.effective_window()))
            .cloned()
            .collect())
    }

    fn create(&mut self, draft: EventDraft) -> StoreResult<CalendarEvent> {
        let event = draft.into_event(Uuid::new_v4().to_string());
        self.events.push(event.clone());
        Ok(event)
    }

    fn update(&mut self, id: &str, draft: EventDraft) -> StoreResult<Option<CalendarEvent>> {
        match self.events.iter_mut().find(|e| e.id == id) {
            Some(existing) => {
                let remote_id = existing.remote_id.clone();
                let mut updated = draft.into_event(id);
                updated.remote_id = remote_id;
                *existing = updated.clone();
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    fn delete(&mut self, id: &str) -> StoreResult<()> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
