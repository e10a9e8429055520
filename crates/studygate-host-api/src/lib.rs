//! Host page trait interfaces for studygate
//!
//! This crate defines the interface between the core and whatever renders the
//! page (a browser shell, a terminal front end, a test double). It contains no
//! rendering code itself.

mod mock;
mod traits;

pub use mock::*;
pub use traits::*;
