//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Metrics → Load registry → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or trigger → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: registry first, listener last
//! - A failed registry load never reaches the bind step
//! - Shutdown is a broadcast so tests can stop a running server

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{StartupError, Started};
