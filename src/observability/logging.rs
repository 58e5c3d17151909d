//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` takes precedence; otherwise the configured level applies
//!   to this crate and tower_http

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directives derived from the configured log level.
pub fn default_directives(config: &ObservabilityConfig) -> String {
    format!(
        "country_letters={level},tower_http={level}",
        level = config.log_level
    )
}

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        let config = ObservabilityConfig {
            log_level: "debug".into(),
            ..ObservabilityConfig::default()
        };
        assert_eq!(
            default_directives(&config),
            "country_letters=debug,tower_http=debug"
        );
    }
}
