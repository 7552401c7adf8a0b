//! Remote calendar synchronization: wire mapping and reconciliation.

pub mod error;
pub mod provider;
pub mod reconciler;
pub mod wire;

pub use error::{RemoteResult, SyncError, SyncErrorCode};
pub use provider::{BoxFuture, RemoteCalendar, UnavailableRemote};
pub use reconciler::{
    SyncOutcome, SyncResult, TombstoneSet, delete_remote, import_remote, reconcile,
};
pub use wire::{
    RemoteAttendee, RemoteEvent, RemoteEventTime, RemoteReminder, RemoteReminders, from_remote,
    to_remote,
};
