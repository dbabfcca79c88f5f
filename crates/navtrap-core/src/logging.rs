#![forbid(unsafe_code)]

//! Subscriber installation for binaries and test runs.
//!
//! Library code only emits `tracing` events behind the `tracing` feature;
//! installing a subscriber is left to the application. This module provides
//! the one blessed way to do it so demos and integration runs agree on
//! filter syntax and output shape.
//!
//! The filter is read from [`LOG_ENV_VAR`] and falls back to the given
//! default directive when unset or invalid.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Environment variable consulted for the log filter.
pub const LOG_ENV_VAR: &str = "NAVTRAP_LOG";

/// Output shape for installed subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-oriented single-line output.
    #[default]
    Compact,
    /// One JSON object per line (requires the `tracing-json` feature).
    #[cfg(feature = "tracing-json")]
    Json,
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a global subscriber writing to stderr.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(format: LogFormat, default_directive: &str) -> bool {
    let filter = env_filter(default_directive);
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match format {
        LogFormat::Compact => builder.compact().with_target(false).try_init().is_ok(),
        #[cfg(feature = "tracing-json")]
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_compact() {
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }

    #[test]
    fn second_init_reports_existing_subscriber() {
        let _ = init(LogFormat::Compact, "warn");
        assert!(!init(LogFormat::Compact, "warn"));
    }
}
