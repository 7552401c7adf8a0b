//! Time types for calendar events.
//!
//! This module provides [`TimeWindow`] for half-open interval reasoning,
//! [`TimeSlot`] for free-slot results, and the slot enumeration and
//! same-day/same-week helpers the scheduling engine is built on.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)` in UTC.
///
/// All overlap reasoning in the engine uses this type: two intervals
/// overlap iff one starts before the other ends *and* ends after the
/// other starts. Intervals that merely touch do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Creates a time window from a start time and duration.
    pub fn from_duration(start: DateTime<Utc>, duration: Duration) -> Self {
        Self::new(start, start + duration)
    }

    /// Creates a time window covering a whole calendar day (UTC).
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_hms_opt(0, 0, 0).expect("valid time").and_utc();
        let end = date
            .succ_opt()
            .expect("valid successor date")
            .and_hms_opt(0, 0, 0)
            .expect("valid time")
            .and_utc();
        Self { start, end }
    }

    /// Returns the duration of this window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if a datetime falls within this window.
    ///
    /// Uses half-open interval semantics: `[start, end)`.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }

    /// Checks if another interval overlaps this window.
    ///
    /// An interval overlaps if it starts before the window ends AND ends
    /// after the window starts. Touching boundaries never overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        other.start < self.end && other.end > self.start
    }

    /// Checks if the interval `[start, end)` overlaps this window.
    pub fn overlaps_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}

/// A free time interval produced by the availability engine.
///
/// Slots are transient query results and are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Start of the free interval (inclusive).
    pub start: DateTime<Utc>,
    /// End of the free interval (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    /// Creates a new slot.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns this slot as a [`TimeWindow`] for overlap tests.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }

    /// Formats the slot as a `HH:MM-HH:MM` range.
    pub fn format_range(&self) -> String {
        format!(
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Enumerates consecutive candidate slots on `day`, from `work_start` to
/// `work_end` (whole hours, UTC), each `slot_len` long.
///
/// The last slot never extends past `work_end`. The sequence is recomputed
/// fresh on every call; there is no cached state.
pub fn enumerate_slots(
    day: NaiveDate,
    work_start: u32,
    work_end: u32,
    slot_len: Duration,
) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    if work_start >= work_end || work_end > 24 || slot_len <= Duration::zero() {
        return slots;
    }

    // work_start < work_end <= 24, so work_start is a valid hour; a
    // window ending at hour 24 is midnight of the next day.
    let day_start = day.and_hms_opt(work_start, 0, 0).expect("valid hour");
    let mut cursor = Utc.from_utc_datetime(&day_start);
    let end = cursor + Duration::hours(i64::from(work_end - work_start));

    while cursor + slot_len <= end {
        slots.push(TimeSlot::new(cursor, cursor + slot_len));
        cursor += slot_len;
    }
    slots
}

/// Checks whether a datetime falls on the given calendar date (UTC).
pub fn same_day(dt: DateTime<Utc>, date: NaiveDate) -> bool {
    dt.date_naive() == date
}

/// Checks whether two datetimes fall in the same ISO week (UTC).
pub fn same_iso_week(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    let (wa, wb) = (a.iso_week(), b.iso_week());
    wa.year() == wb.year() && wa.week() == wb.week()
}
