//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; RUST_LOG overrides the config level
//! - Request ID flows into every request span
//! - Metrics are cheap (atomic increments) and off by default

pub mod logging;
pub mod metrics;
