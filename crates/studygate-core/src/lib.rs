//! Core of studygate
//!
//! This crate contains:
//! - The session gate (credential check, TTL expiry, login redirects)
//! - The study interval state machine (Idle -> Running <-> Paused -> Idle)
//! - Activity signal unification (visibility and focus)
//! - Pure aggregation into daily totals, weekly progress and statistics
//! - The page runtime tying the gate, the tracker and the host page together

mod activity;
mod credentials;
mod events;
mod gate;
mod page;
mod redirect;
mod report;
mod tracker;

pub use activity::*;
pub use credentials::*;
pub use events::*;
pub use gate::*;
pub use page::*;
pub use redirect::*;
pub use report::*;
pub use tracker::*;
