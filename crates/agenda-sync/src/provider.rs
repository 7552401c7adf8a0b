//! RemoteCalendar trait definition.
//!
//! This module defines the [`RemoteCalendar`] trait, the abstraction over
//! remote calendar backends (Google Calendar and the like). Backends are
//! responsible for listing and mutating remote events and for managing
//! their own authentication state.

use std::future::Future;
use std::pin::Pin;

use agenda_core::TimeWindow;

use crate::error::{RemoteResult, SyncError};
use crate::wire::RemoteEvent;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe for dynamic dispatch.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core abstraction for remote calendar backends.
///
/// Implementations clone whatever they need from the borrowed arguments
/// before entering their async blocks; the returned future only borrows
/// `self`.
pub trait RemoteCalendar: Send + Sync {
    /// Returns the name/type of this backend (e.g., "google").
    fn name(&self) -> &str;

    /// Checks whether the backend currently holds valid credentials.
    fn is_authenticated(&self) -> bool;

    /// Lists remote events, optionally restricted to a time window.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` on network errors, authentication failures, etc.
    fn list_events(
        &self,
        calendar_id: &str,
        window: Option<&TimeWindow>,
    ) -> BoxFuture<'_, RemoteResult<Vec<RemoteEvent>>>;

    /// Creates an event remotely.
    ///
    /// Returns the server's copy, which carries the assigned remote id.
    fn create_event(
        &self,
        calendar_id: &str,
        event: RemoteEvent,
    ) -> BoxFuture<'_, RemoteResult<RemoteEvent>>;

    /// Replaces an existing remote event.
    ///
    /// Returns the server's updated copy.
    fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: RemoteEvent,
    ) -> BoxFuture<'_, RemoteResult<RemoteEvent>>;

    /// Deletes a remote event by id.
    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, RemoteResult<()>>;
}

/// A backend that always returns an error.
///
/// This is useful for testing or as a placeholder when a backend fails
/// to initialize.
#[derive(Debug)]
pub struct UnavailableRemote {
    name: String,
    error: SyncError,
}

impl UnavailableRemote {
    /// Creates a new unavailable backend.
    pub fn new(name: impl Into<String>, error: SyncError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }

    // SyncError is not Clone because of its boxed source; rebuild it
    // from the code and message instead.
    fn error(&self) -> SyncError {
        SyncError::new(self.error.code(), self.error.message()).with_remote(&self.name)
    }
}

impl RemoteCalendar for UnavailableRemote {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_authenticated(&self) -> bool {
        false
    }

    fn list_events(
        &self,
        _calendar_id: &str,
        _window: Option<&TimeWindow>,
    ) -> BoxFuture<'_, RemoteResult<Vec<RemoteEvent>>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }

    fn create_event(
        &self,
        _calendar_id: &str,
        _event: RemoteEvent,
    ) -> BoxFuture<'_, RemoteResult<RemoteEvent>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }

    fn update_event(
        &self,
        _calendar_id: &str,
        _event_id: &str,
        _event: RemoteEvent,
    ) -> BoxFuture<'_, RemoteResult<RemoteEvent>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }

    fn delete_event(&self, _calendar_id: &str, _event_id: &str) -> BoxFuture<'_, RemoteResult<()>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }
}
