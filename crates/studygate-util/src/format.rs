//! Human-readable formatting for study totals and countdowns

use std::time::Duration;

/// Format a minute total the way the tracker widget shows it:
/// `0 min`, `45 min`, `1h`, `1h 5m`.
pub fn format_study_time(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    if hours == 0 {
        format!("{} min", mins)
    } else if mins == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, mins)
    }
}

/// Format a running interval as `M:SS`
pub fn format_clock(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Format the time left in a login session
pub fn format_remaining(remaining: Duration) -> String {
    if remaining.is_zero() {
        return "Session expired".to_string();
    }

    let total_mins = remaining.as_secs() / 60;
    let hours = total_mins / 60;
    let minutes = total_mins % 60;

    if hours > 0 {
        format!("{}h {}m remaining", hours, minutes)
    } else {
        format!("{}m remaining", minutes)
    }
}
