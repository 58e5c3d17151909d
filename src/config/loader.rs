//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that selects the listening port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT value '{0}'")]
    Port(String),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply the environment and validate.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `PORT` from the process environment, if set.
pub fn apply_env_overrides(config: &mut ServiceConfig) -> Result<(), ConfigError> {
    match std::env::var(PORT_ENV) {
        Ok(value) => apply_port(config, &value),
        Err(_) => Ok(()),
    }
}

/// Override the listener port with a raw environment value.
///
/// An empty value leaves the configured port untouched.
pub fn apply_port(config: &mut ServiceConfig, value: &str) -> Result<(), ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }

    config.listener.port = value
        .parse()
        .map_err(|_| ConfigError::Port(value.to_string()))?;
    Ok(())
}
