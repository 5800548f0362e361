//! Logging setup for applications embedding the bridge.
//!
//! The bridge itself only emits `tracing` events; installing a subscriber is
//! left to the host, which can call [`setup_logging`] once at startup.

use crate::config::LoggingSettings;
use crate::error::BridgeError;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Parses the configured level. `RUST_LOG` directives still win over it.
pub fn bridge_filter(settings: &LoggingSettings) -> Result<EnvFilter, BridgeError> {
    let level: LevelFilter = settings.level.trim().parse().map_err(|_| {
        BridgeError::Logging(format!("unknown log level '{}'", settings.level))
    })?;

    Ok(EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy())
}

/// Installs the global tracing subscriber.
///
/// Fails when the level is not recognised or when a global subscriber is
/// already installed, e.g. by a second call.
pub fn setup_logging(settings: &LoggingSettings) -> Result<(), BridgeError> {
    let filter = bridge_filter(settings)?;
    let registry = tracing_subscriber::registry().with(filter);

    // Dispatch runs on the posting thread, so thread names identify the poster
    let installed = if settings.json_format {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_names(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_thread_names(true))
            .try_init()
    };
    installed.map_err(|e| BridgeError::Logging(e.to_string()))?;

    info!(
        "🔧 Bridge logging at {} ({})",
        settings.level,
        if settings.json_format { "json" } else { "text" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(level: &str) -> LoggingSettings {
        LoggingSettings {
            level: level.to_string(),
            json_format: false,
        }
    }

    #[test]
    fn test_accepts_known_levels() {
        for level in ["trace", "DEBUG", " info ", "warn", "error", "off"] {
            assert!(bridge_filter(&settings(level)).is_ok(), "{}", level);
        }
    }

    #[test]
    fn test_rejects_unknown_level() {
        match bridge_filter(&settings("chatty")) {
            Err(BridgeError::Logging(message)) => assert!(message.contains("chatty")),
            other => panic!("expected logging error, got {:?}", other),
        }
    }

    #[test]
    fn test_second_install_fails() {
        // Another test in this binary may already own the global subscriber
        let _ = setup_logging(&settings("debug"));

        assert!(matches!(
            setup_logging(&settings("debug")),
            Err(BridgeError::Logging(_))
        ));
    }
}
