//! Log subscriber setup for wc_rete.
//!
//! The library crates only emit [`tracing`] events; nothing is printed until
//! a binary installs a subscriber. [`TracingSetup`] builds one from a level,
//! an output format, and an optional target filter.
//!
//! # Example
//!
//! ```
//! use rete_tracing::{TracingFormat, TracingSetup};
//! use tracing::Level;
//!
//! TracingSetup::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .with_env_filter("rete_network=trace,rete_compiler=debug")
//!     .init();
//! ```
//!
//! # Filter Resolution
//!
//! 1. An explicit [`with_env_filter`](TracingSetup::with_env_filter) string.
//! 2. Otherwise `RUST_LOG`, when set and parseable.
//! 3. Otherwise the configured level for every target.

use std::str::FromStr;

use serde::Deserialize;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingFormat {
    /// Multi-line human-readable output (default).
    #[default]
    Pretty,
    /// Single-line output.
    Compact,
    /// One JSON object per event.
    Json,
}

/// An unrecognized format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log format '{0}' (expected pretty, compact or json)")]
pub struct UnknownFormat(pub String);

impl FromStr for TracingFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingSetup
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for the process-wide subscriber.
#[derive(Debug, Clone)]
pub struct TracingSetup {
    level: Level,
    format: TracingFormat,
    /// Target filter, e.g. `"rete_network=trace,rete_compiler=info"`.
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for TracingSetup {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingSetup {
    /// Creates a setup at `INFO` with pretty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum level used when no filter applies.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a target filter, overriding `RUST_LOG`.
    ///
    /// Format: `target=level,target=level,...`. An unparseable filter falls
    /// back to the configured level.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Emits span enter/exit events, e.g. one pair per compiled pattern.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the configured level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the configured format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// Resolves the filter to install.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.as_str());
        match &self.env_filter {
            Some(filter) => EnvFilter::try_new(filter).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }

    /// Installs the subscriber.
    ///
    /// Returns `false` if a global subscriber was already installed, in which
    /// case nothing changes. Calling this more than once is harmless.
    pub fn init(&self) -> bool {
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };
        let registry = tracing_subscriber::registry().with(self.filter());

        let installed = match self.format {
            TracingFormat::Pretty => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init(),
            TracingFormat::Compact => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init(),
            TracingFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init(),
        }
        .is_ok();

        if installed {
            tracing::debug!(level = %self.level, format = ?self.format, "log subscriber installed");
        }
        installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let setup = TracingSetup::default();
        assert_eq!(setup.level(), Level::INFO);
        assert_eq!(setup.format(), TracingFormat::Pretty);
        assert!(setup.env_filter.is_none());
        assert!(!setup.span_events);
    }

    #[test]
    fn builder_sets_fields() {
        let setup = TracingSetup::new()
            .with_level(Level::TRACE)
            .with_format(TracingFormat::Json)
            .with_env_filter("rete_network=trace")
            .with_span_events(true);

        assert_eq!(setup.level(), Level::TRACE);
        assert_eq!(setup.format(), TracingFormat::Json);
        assert_eq!(setup.env_filter.as_deref(), Some("rete_network=trace"));
        assert!(setup.span_events);
    }

    #[test]
    fn explicit_filter_is_used() {
        let filter = TracingSetup::new()
            .with_env_filter("rete_compiler=debug")
            .filter();
        assert_eq!(filter.to_string(), "rete_compiler=debug");
    }

    #[test]
    fn bad_filter_falls_back_to_level() {
        let filter = TracingSetup::new()
            .with_level(Level::WARN)
            .with_env_filter("rete_compiler=loud")
            .filter();
        assert!(filter.to_string().eq_ignore_ascii_case("warn"));
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<TracingFormat>(), Ok(TracingFormat::Json));
        assert_eq!("compact".parse::<TracingFormat>(), Ok(TracingFormat::Compact));
        let err = "xml".parse::<TracingFormat>().unwrap_err();
        assert_eq!(err, UnknownFormat("xml".into()));
    }

    #[test]
    fn format_deserializes_lowercase() {
        let format: TracingFormat = serde_json::from_str("\"compact\"").unwrap();
        assert_eq!(format, TracingFormat::Compact);
    }

    #[test]
    fn second_init_is_a_no_op() {
        let setup = TracingSetup::new().with_format(TracingFormat::Compact);
        setup.init();
        assert!(!setup.init());
    }
}
