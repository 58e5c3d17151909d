//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, PORT override)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → handed to startup, then to each subsystem
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults, so the service runs with no file at all
//! - `PORT` from the environment wins over the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::RegistryConfig;
pub use schema::ServiceConfig;
pub use schema::TimeoutConfig;
