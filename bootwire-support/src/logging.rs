//! Logging initialisation.
//!
//! Bootwire itself only emits `tracing` events. Hosts that do not already
//! install a subscriber can call [`init`] once at startup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

/// Error returned when the global subscriber cannot be installed.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The fallback directive could not be parsed.
    #[error("Invalid log filter directive {directive:?}: {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber was already installed.
    #[error("A global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

/// Builds the filter: `RUST_LOG` when set, otherwise `default_directive`.
pub fn filter(default_directive: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive).map_err(|source| {
            LoggingError::InvalidFilter {
                directive: default_directive.to_string(),
                source,
            }
        }),
    }
}

/// Installs a fmt subscriber as the global default.
///
/// ```rust,no_run
/// bootwire_support::logging::init("bootwire=debug").expect("logging");
/// ```
pub fn init(default_directive: &str) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive)?)
        .with_target(true)
        .finish()
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_directive_is_reported() {
        // only meaningful when RUST_LOG is not set for the test run
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = filter("bootwire=loud").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidFilter { .. }));
        assert!(err.to_string().contains("bootwire=loud"));
    }

    #[test]
    fn valid_directive_builds() {
        assert!(filter("bootwire=debug").is_ok());
    }
}
