//! Conflict detection and free-slot discovery.
//!
//! Pure functions over a caller-owned event slice. Overlap uses the strict
//! half-open rule from [`agenda_core::TimeWindow`]: an existing event
//! conflicts with `[start, end)` iff `existing.start < end` and
//! `existing.end > start`. All-day events are widened to their whole-day
//! window before the test.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use agenda_core::{CalendarEvent, TimeSlot, enumerate_slots};

/// Default working-day start hour for slot discovery.
pub const WORK_DAY_START: u32 = 9;
/// Default working-day end hour for slot discovery.
pub const WORK_DAY_END: u32 = 18;

/// Returns the first event (store order) whose interval overlaps
/// `[start, end)`, or `None` when the candidate interval is free.
///
/// Deterministic given input order.
pub fn find_conflict<'a>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    events: &'a [CalendarEvent],
) -> Option<&'a CalendarEvent> {
    events
        .iter()
        .find(|event| event.effective_window().overlaps_range(start, end))
}

/// Enumerates free slots on `day` between `work_start` and `work_end`
/// (whole hours), each `slot_len` long.
///
/// A slot is free iff no event overlaps it. The result is recomputed fresh
/// on every call; an empty day yields the full set of windows.
pub fn find_available_slots(
    day: NaiveDate,
    events: &[CalendarEvent],
    work_start: u32,
    work_end: u32,
    slot_len: Duration,
) -> Vec<TimeSlot> {
    enumerate_slots(day, work_start, work_end, slot_len)
        .into_iter()
        .filter(|slot| find_conflict(slot.start, slot.end, events).is_none())
        .collect()
}

/// [`find_available_slots`] with the default working window (09-18, 1h).
pub fn find_available_slots_default(day: NaiveDate, events: &[CalendarEvent]) -> Vec<TimeSlot> {
    find_available_slots(day, events, WORK_DAY_START, WORK_DAY_END, Duration::hours(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent::new(id, format!("Event {id}"), start, end)
    }

    mod conflicts {
        use super::*;

        #[test]
        fn overlapping_event_is_reported() {
            let events = vec![event(
                "a",
                utc(2025, 3, 10, 14, 0, 0),
                utc(2025, 3, 10, 15, 0, 0),
            )];
            let hit = find_conflict(utc(2025, 3, 10, 14, 30, 0), utc(2025, 3, 10, 15, 30, 0), &events);
            assert_eq!(hit.map(|e| e.id.as_str()), Some("a"));
        }

        #[test]
        fn touching_intervals_are_not_conflicts() {
            let events = vec![event(
                "a",
                utc(2025, 3, 10, 14, 0, 0),
                utc(2025, 3, 10, 15, 0, 0),
            )];
            // Candidate ends exactly where the event starts.
            assert!(
                find_conflict(utc(2025, 3, 10, 13, 0, 0), utc(2025, 3, 10, 14, 0, 0), &events)
                    .is_none()
            );
            // Candidate starts exactly where the event ends.
            assert!(
                find_conflict(utc(2025, 3, 10, 15, 0, 0), utc(2025, 3, 10, 16, 0, 0), &events)
                    .is_none()
            );
        }

        #[test]
        fn first_in_store_order_wins() {
            let events = vec![
                event("a", utc(2025, 3, 10, 14, 0, 0), utc(2025, 3, 10, 15, 0, 0)),
                event("b", utc(2025, 3, 10, 14, 0, 0), utc(2025, 3, 10, 15, 0, 0)),
            ];
            let hit = find_conflict(utc(2025, 3, 10, 14, 0, 0), utc(2025, 3, 10, 15, 0, 0), &events);
            assert_eq!(hit.map(|e| e.id.as_str()), Some("a"));
        }

        #[test]
        fn all_day_event_blocks_entire_day() {
            let events = vec![
                event("a", utc(2025, 3, 10, 12, 0, 0), utc(2025, 3, 10, 12, 0, 0)).with_all_day(true),
            ];
            let hit = find_conflict(utc(2025, 3, 10, 8, 0, 0), utc(2025, 3, 10, 9, 0, 0), &events);
            assert!(hit.is_some());
        }
    }

    mod slots {
        use super::*;

        #[test]
        fn empty_day_yields_nine_default_slots() {
            let slots = find_available_slots_default(date(2025, 3, 10), &[]);
            assert_eq!(slots.len(), 9);
            assert_eq!(slots[0].start, utc(2025, 3, 10, 9, 0, 0));
            assert_eq!(slots[8].end, utc(2025, 3, 10, 18, 0, 0));
        }

        #[test]
        fn busy_hours_are_excluded() {
            let events = vec![
                event("a", utc(2025, 3, 10, 10, 0, 0), utc(2025, 3, 10, 11, 0, 0)),
                event("b", utc(2025, 3, 10, 13, 30, 0), utc(2025, 3, 10, 14, 30, 0)),
            ];
            let slots = find_available_slots_default(date(2025, 3, 10), &events);
            // 10-11 fully busy; 13-14 and 14-15 partially overlapped.
            assert_eq!(slots.len(), 6);
            assert!(!slots.iter().any(|s| s.start == utc(2025, 3, 10, 10, 0, 0)));
            assert!(!slots.iter().any(|s| s.start == utc(2025, 3, 10, 13, 0, 0)));
            assert!(!slots.iter().any(|s| s.start == utc(2025, 3, 10, 14, 0, 0)));
        }

        #[test]
        fn event_ending_at_slot_start_leaves_slot_free() {
            let events = vec![event(
                "a",
                utc(2025, 3, 10, 8, 0, 0),
                utc(2025, 3, 10, 9, 0, 0),
            )];
            let slots = find_available_slots_default(date(2025, 3, 10), &events);
            assert_eq!(slots.len(), 9);
        }

        #[test]
        fn other_day_events_do_not_block() {
            let events = vec![event(
                "a",
                utc(2025, 3, 11, 10, 0, 0),
                utc(2025, 3, 11, 11, 0, 0),
            )];
            let slots = find_available_slots_default(date(2025, 3, 10), &events);
            assert_eq!(slots.len(), 9);
        }

        #[test]
        fn fully_booked_day_has_no_slots() {
            let events = vec![
                event("a", utc(2025, 3, 10, 9, 0, 0), utc(2025, 3, 10, 18, 0, 0)),
            ];
            let slots = find_available_slots_default(date(2025, 3, 10), &events);
            assert!(slots.is_empty());
        }
    }
}
