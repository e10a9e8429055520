//! Shared utilities for studygate
//!
//! This crate provides:
//! - ID types (Username)
//! - Time utilities (clock abstraction, mock time, millisecond timestamps)
//! - Human-readable duration formatting
//! - Error types
//! - Default paths for config and data directories

mod error;
mod format;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use format::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
