//! Country registry subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (loader.rs):
//!     GET records.json → parse {key: {item: [..]}} → first item per record
//!     → Registry (immutable, shared via Arc)
//!
//! Per request (filter.rs):
//!     letters → narrow registry letter by letter → sort by name → render
//! ```
//!
//! # Design Decisions
//! - Loaded exactly once; any load failure aborts startup
//! - Registry is never mutated after load, so readers need no locking
//! - Names are case-folded once at load time, not per request

pub mod filter;
pub mod loader;
pub mod types;

pub use filter::{filter, sort_by_name};
pub use loader::{HttpRegistrySource, RegistrySource, StaticRegistrySource};
pub use types::{fold_case, Country, LoadError, LoadResult, Registry};
