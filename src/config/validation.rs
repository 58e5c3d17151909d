//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, page size > 0)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.host must not be empty")]
    EmptyHost,

    #[error("registry.url '{0}' is not a valid URL")]
    InvalidRegistryUrl(String),

    #[error("registry.url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("registry.page_size must be greater than zero")]
    ZeroPageSize,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    match Url::parse(&config.registry.url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::UnsupportedScheme(config.registry.url.clone()));
        }
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::InvalidRegistryUrl(config.registry.url.clone())),
    }

    if config.registry.page_size == 0 {
        errors.push(ValidationError::ZeroPageSize);
    }

    if config.registry.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("registry.timeout_secs"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServiceConfig::default();
        config.registry.url = "ftp://example.com/records.json".into();
        config.registry.page_size = 0;
        config.registry.timeout_secs = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::UnsupportedScheme("ftp://example.com/records.json".into()),
                ValidationError::ZeroPageSize,
                ValidationError::ZeroTimeout("registry.timeout_secs"),
                ValidationError::InvalidMetricsAddress("nowhere".into()),
            ]
        );
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let mut config = ServiceConfig::default();
        config.registry.url = "records.json".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidRegistryUrl("records.json".into())]);
    }
}
