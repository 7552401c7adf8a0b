//! Shared tracing setup.
//!
//! Every binary in the workspace installs its subscriber through
//! [`init_tracing`] so the filter conventions stay in one place: `RUST_LOG`
//! wins when set, otherwise the workspace crates log at the configured
//! default level.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Error)]
pub enum TracingError {
    /// A global subscriber was already installed in this process.
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Multi-line human-readable output.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// Structured output for log collectors.
    Json,
}

/// Subscriber settings, normally built from the default plus a couple of
/// `with_*` calls.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level applied to workspace crates when `RUST_LOG` is absent.
    pub default_level: Level,
    pub output_format: TracingOutputFormat,
    /// Include file and line number of the callsite.
    pub include_location: bool,
    /// Include the module path of the callsite.
    pub include_target: bool,
    /// Full filter directive. Takes precedence over `default_level`.
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Pretty,
            include_location: false,
            include_target: true,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Settings for interactive debugging sessions.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            output_format: TracingOutputFormat::Compact,
            include_location: true,
            include_target: true,
            env_filter: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Fails when `config.env_filter` does not parse, or when a subscriber is
/// already installed (a process gets exactly one).
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = match config.env_filter {
        Some(ref directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("agenda={}", config.default_level))),
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let base = fmt::layer()
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_target(config.include_target);

    match config.output_format {
        TracingOutputFormat::Pretty => {
            tracing::subscriber::set_global_default(registry.with(base.pretty()))?
        }
        TracingOutputFormat::Compact => {
            tracing::subscriber::set_global_default(registry.with(base.compact()))?
        }
        TracingOutputFormat::Json => {
            tracing::subscriber::set_global_default(registry.with(base.json()))?
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.default_level, Level::INFO);
        assert_eq!(config.output_format, TracingOutputFormat::Pretty);
        assert!(!config.include_location);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn debug_config() {
        let config = TracingConfig::debug();
        assert_eq!(config.default_level, Level::DEBUG);
        assert_eq!(config.output_format, TracingOutputFormat::Compact);
        assert!(config.include_location);
    }

    #[test]
    fn builder_methods() {
        let config = TracingConfig::default()
            .with_level(Level::WARN)
            .with_format(TracingOutputFormat::Json)
            .with_env_filter("agenda=trace");

        assert_eq!(config.default_level, Level::WARN);
        assert_eq!(config.output_format, TracingOutputFormat::Json);
        assert_eq!(config.env_filter, Some("agenda=trace".to_string()));
    }

    #[test]
    fn init_installs_the_global_subscriber_once() {
        let config = TracingConfig::default()
            .with_format(TracingOutputFormat::Compact)
            .with_env_filter("agenda=debug");

        assert!(init_tracing(config.clone()).is_ok());
        // A process gets exactly one global subscriber.
        assert!(matches!(
            init_tracing(config),
            Err(TracingError::SetGlobalSubscriber(_))
        ));
    }

    #[test]
    fn malformed_filter_directive_is_rejected() {
        let config = TracingConfig::default().with_env_filter("agenda=notalevel");
        assert!(matches!(
            init_tracing(config),
            Err(TracingError::EnvFilter(_))
        ));
    }
}
