//! Shared data model for studygate
//!
//! This crate defines the types that flow between the store, the core and
//! the rendering layer:
//! - Persisted records (session marker, active interval, daily records)
//! - Report and display snapshots
//! - Page signals (visibility, focus, unload)

mod events;
mod types;

pub use events::*;
pub use types::*;

/// Version tag written alongside JSON report output
pub const API_VERSION: u32 = 1;
