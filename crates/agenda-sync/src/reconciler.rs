//! Push/pull reconciliation between the local event list and a remote
//! calendar.
//!
//! [`reconcile`] pushes local events outward: events already bound to a
//! live remote id are updated in place, everything else is created and
//! bound to the id the server assigns. One failing event never aborts
//! the pass; its error is collected and the remaining events still sync.
//!
//! [`import_remote`] pulls remote events inward, skipping tombstoned ids
//! so that locally deleted events do not resurrect on the next pull.

use std::collections::HashSet;

use tracing::{debug, warn};

use agenda_core::{CalendarEvent, TimeWindow};

use crate::error::{RemoteResult, SyncError, SyncErrorCode};
use crate::provider::RemoteCalendar;
use crate::wire::{RemoteEvent, from_remote, to_remote};

/// Per-pass counters and collected per-event failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// Events created remotely during this pass.
    pub created: usize,
    /// Events updated remotely during this pass.
    pub updated: usize,
    /// Events deleted remotely during this pass.
    pub deleted: usize,
    /// One message per event that failed to sync.
    pub errors: Vec<String>,
}

impl SyncResult {
    /// Returns true when every event synced without error.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The outcome of a push pass: the event list with freshly bound remote
/// ids, plus the counters.
#[derive(Debug)]
pub struct SyncOutcome {
    /// The input events, in input order, with remote ids bound where a
    /// create succeeded.
    pub events: Vec<CalendarEvent>,
    /// Counters and collected errors for the pass.
    pub result: SyncResult,
}

/// Remote ids of events deleted locally.
///
/// Pulls consult this set so a deletion survives until the remote side
/// catches up; without it, the next [`import_remote`] would bring the
/// event straight back.
#[derive(Debug, Clone, Default)]
pub struct TombstoneSet {
    ids: HashSet<String>,
}

impl TombstoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a deleted remote id.
    pub fn insert(&mut self, remote_id: impl Into<String>) {
        self.ids.insert(remote_id.into());
    }

    /// Checks whether a remote id has been deleted locally.
    pub fn contains(&self, remote_id: &str) -> bool {
        self.ids.contains(remote_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Pushes the local event list to the remote calendar.
///
/// Events whose `remote_id` appears in the remote listing are updated;
/// all others (never synced, or synced to an id the remote no longer
/// knows) are created and bound to the returned id. A per-event failure
/// is recorded in the result and the pass continues.
///
/// # Errors
///
/// Only pass-level failures abort: an unauthenticated backend, or a
/// failure to list the remote events at all.
pub async fn reconcile(
    events: Vec<CalendarEvent>,
    remote: &dyn RemoteCalendar,
    calendar_id: &str,
) -> Result<SyncOutcome, SyncError> {
    if !remote.is_authenticated() {
        return Err(
            SyncError::authentication("remote calendar is not authenticated")
                .with_remote(remote.name()),
        );
    }

    let listing = remote.list_events(calendar_id, None).await?;
    let known: HashSet<&str> = listing.iter().filter_map(|r| r.id.as_deref()).collect();

    let mut result = SyncResult::default();
    let mut synced = Vec::with_capacity(events.len());

    for mut event in events {
        let wire = to_remote(&event);
        let live_id = event
            .remote_id
            .as_deref()
            .filter(|id| known.contains(id))
            .map(str::to_string);

        let outcome = match live_id {
            Some(id) => remote
                .update_event(calendar_id, &id, wire)
                .await
                .map(|_| false),
            None => remote.create_event(calendar_id, wire).await.map(|created| {
                // Binding the returned id is what makes the next pass
                // take the update path.
                event.remote_id = created.id;
                true
            }),
        };

        match outcome {
            Ok(true) => result.created += 1,
            Ok(false) => result.updated += 1,
            Err(e) => {
                warn!(title = %event.title, error = %e, "event failed to sync");
                result
                    .errors
                    .push(format!("sync failed for \"{}\": {}", event.title, e));
            }
        }
        synced.push(event);
    }

    debug!(
        created = result.created,
        updated = result.updated,
        errors = result.errors.len(),
        "push pass finished"
    );
    Ok(SyncOutcome {
        events: synced,
        result,
    })
}

/// Deletes an event remotely and records its tombstone.
///
/// A remote `not_found` counts as success; the event is gone either way
/// and the tombstone still needs recording.
pub async fn delete_remote(
    remote: &dyn RemoteCalendar,
    calendar_id: &str,
    remote_id: &str,
    tombstones: &mut TombstoneSet,
) -> RemoteResult<()> {
    match remote.delete_event(calendar_id, remote_id).await {
        Ok(()) => {}
        Err(e) if e.code() == SyncErrorCode::NotFound => {
            debug!(remote_id, "remote event already gone");
        }
        Err(e) => return Err(e),
    }
    tombstones.insert(remote_id);
    Ok(())
}

/// Translates a remote listing into local events.
///
/// Tombstoned ids and events outside `window` are skipped; a malformed
/// remote event is logged and skipped rather than failing the pull.
pub fn import_remote(
    listing: &[RemoteEvent],
    window: &TimeWindow,
    tombstones: &TombstoneSet,
) -> Vec<CalendarEvent> {
    listing
        .iter()
        .filter(|r| !r.id.as_deref().is_some_and(|id| tombstones.contains(id)))
        .filter_map(|r| match from_remote(r) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(summary = %r.summary, error = %e, "skipping malformed remote event");
                None
            }
        })
        .filter(|event| event.effective_window().overlaps(window))
        .collect()
}
