//! Country letters service library.
//!
//! Loads the country register once at startup and answers which countries
//! contain every letter of a query.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registry::{Country, Registry};
