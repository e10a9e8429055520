//! Unifies visibility and focus signals into one activity stream

use studygate_api::{Activity, PageSignal, TrackerState};

/// Collapses redundant page signals. A hidden tab usually also loses
/// focus; only the first of the pair is forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityMonitor {
    current: Activity,
}

impl ActivityMonitor {
    /// A monitor for a page that was just shown
    pub fn new() -> Self {
        Self {
            current: Activity::Active,
        }
    }

    /// A monitor whose starting level matches a persisted tracker state
    pub fn seeded(state: TrackerState) -> Self {
        Self {
            current: match state {
                TrackerState::Paused => Activity::Inactive,
                TrackerState::Idle | TrackerState::Running => Activity::Active,
            },
        }
    }

    pub fn current(&self) -> Activity {
        self.current
    }

    /// Feed a raw signal. Returns the new activity level only when it changed.
    pub fn observe(&mut self, signal: PageSignal) -> Option<Activity> {
        let next = signal.activity();
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }
}

impl Default for ActivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}
