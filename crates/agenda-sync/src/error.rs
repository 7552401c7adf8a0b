//! Failures raised while talking to a remote calendar backend.
//!
//! Reconciliation records these per event rather than aborting the pass,
//! so the code carries enough classification for a caller to decide
//! whether a retry on the next pass is worthwhile.

use std::fmt;
use thiserror::Error;

/// Classifies a remote calendar failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncErrorCode {
    /// Missing, expired, or rejected credentials.
    AuthenticationFailed,
    /// The backend could not be reached at all.
    NetworkError,
    /// The backend asked us to slow down.
    RateLimited,
    /// The backend accepted the request but failed to serve it.
    ServerError,
    /// The backend answered with a payload we could not interpret.
    InvalidResponse,
    /// The addressed remote event does not exist.
    NotFound,
}

impl SyncErrorCode {
    /// Whether a later pass may plausibly succeed without any
    /// intervention. Authentication and payload problems will not fix
    /// themselves, so those are excluded.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimited | Self::ServerError
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for SyncErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure from a remote calendar, optionally tagged with
/// the backend it came from and chained to its underlying cause.
#[derive(Debug, Error)]
pub struct SyncError {
    code: SyncErrorCode,
    message: String,
    remote: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SyncError {
    pub fn new(code: SyncErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            remote: None,
            source: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(SyncErrorCode::AuthenticationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SyncErrorCode::NetworkError, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SyncErrorCode::RateLimited, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(SyncErrorCode::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(SyncErrorCode::InvalidResponse, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SyncErrorCode::NotFound, message)
    }

    /// Tags the error with the backend it originated from.
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    /// Chains the underlying cause onto the error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> SyncErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(ref remote) = self.remote {
            write!(f, " ({remote})")?;
        }
        Ok(())
    }
}

pub type RemoteResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_codes_are_retryable() {
        for code in [
            SyncErrorCode::NetworkError,
            SyncErrorCode::RateLimited,
            SyncErrorCode::ServerError,
        ] {
            assert!(code.is_retryable(), "{code} should be retryable");
        }
        for code in [
            SyncErrorCode::AuthenticationFailed,
            SyncErrorCode::InvalidResponse,
            SyncErrorCode::NotFound,
        ] {
            assert!(!code.is_retryable(), "{code} should not be retryable");
        }
    }

    #[test]
    fn builders_set_code_and_message() {
        let err = SyncError::invalid_response("start is missing dateTime");
        assert_eq!(err.code(), SyncErrorCode::InvalidResponse);
        assert_eq!(err.message(), "start is missing dateTime");
        assert!(err.remote().is_none());

        let err = SyncError::not_found("remote event vanished");
        assert_eq!(err.code(), SyncErrorCode::NotFound);
    }

    #[test]
    fn display_includes_remote_tag_when_present() {
        let err = SyncError::rate_limited("quota exhausted");
        assert_eq!(err.to_string(), "rate_limited: quota exhausted");

        let tagged = SyncError::rate_limited("quota exhausted").with_remote("caldav");
        assert_eq!(tagged.to_string(), "rate_limited: quota exhausted (caldav)");
    }

    #[test]
    fn per_event_failure_message_composes_with_display() {
        let err = SyncError::server("backend unavailable");
        let line = format!("sync failed for \"Flight\": {err}");
        assert_eq!(
            line,
            "sync failed for \"Flight\": server_error: backend unavailable"
        );
    }

    #[test]
    fn source_chain_is_preserved() {
        use std::error::Error;
        let cause = std::io::Error::other("connection reset");
        let err = SyncError::network("backend unreachable").with_source(cause);
        assert!(err.is_retryable());
        assert_eq!(err.source().unwrap().to_string(), "connection reset");
    }
}
