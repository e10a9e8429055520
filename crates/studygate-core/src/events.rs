//! Core events emitted by the gate, the tracker and the page runtime

use chrono::NaiveDate;
use serde::Serialize;
use studygate_api::StopOutcome;
use studygate_util::Username;
use std::time::Duration;

/// Events emitted by the core
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CoreEvent {
    /// Credentials accepted, marker written
    LoggedIn { username: Username },

    /// Credentials rejected, store untouched
    LoginRejected { username: String },

    /// Marker cleared on request
    LoggedOut { username: Option<Username> },

    /// Marker outlived the session TTL and was cleared
    SessionExpired { username: Username },

    /// Page left for the given URL
    Redirected { url: String },

    /// Tracking began
    IntervalStarted {
        date: NaiveDate,
        username: Option<Username>,
    },

    /// Accounting suspended
    IntervalPaused,

    /// Accounting resumed after the given pause
    IntervalResumed { paused_for: Duration },

    /// Interval finished; recorded or discarded per the outcome
    IntervalStopped(StopOutcome),

    /// The page's own initializer ran after a successful gate
    PageInitialized,
}
