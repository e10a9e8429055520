//! Time utilities for studygate
//!
//! All persisted timestamps are wall-clock milliseconds since the Unix epoch,
//! and every time-sensitive operation reads "now" through a [`Clock`] so that
//! session expiry and interval accounting can be driven deterministically in
//! tests.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `STUDYGATE_MOCK_TIME` environment variable can be set
//! to override the system time seen by [`SystemClock`]. Mock time advances at
//! the same rate as real time.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 14:30:00`)
//!
//! ```bash
//! STUDYGATE_MOCK_TIME="2025-12-25 14:30:00" studygate status
//! ```

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "STUDYGATE_MOCK_TIME";

/// Format accepted by [`MOCK_TIME_ENV_VAR`]
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of days covered by the weekly report (today included)
pub const WEEK_DAYS: usize = 7;

/// Cached mock time offset from the real time when the process started.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // This is the internal implementation that wraps Local::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match parse_local_datetime(&mock_time_str) {
                    Some(mock_dt) => {
                        let offset = mock_dt.signed_duration_since(chrono::Local::now());
                        tracing::info!(
                            mock_time = %mock_time_str,
                            offset_secs = offset.num_seconds(),
                            "Mock time enabled"
                        );
                        return Some(offset);
                    }
                    None => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = MOCK_TIME_FORMAT,
                            "Invalid mock time"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Parse a `YYYY-MM-DD HH:MM:SS` string as a local date-time.
pub fn parse_local_datetime(s: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(s, MOCK_TIME_FORMAT).ok()?;
    Local.from_local_datetime(&naive).single()
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // This is the wrapper that provides mock time support
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    if let Some(offset) = get_mock_time_offset() {
        real_now + offset
    } else {
        real_now
    }
}

/// Source of "now" for the gate and the tracker
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Current time as epoch milliseconds
    fn now_millis(&self) -> i64 {
        to_millis(&self.now())
    }

    /// Current local calendar date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Clock backed by the system time (and mock time in debug builds)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        now()
    }
}

/// Manually driven clock for tests and simulations
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Clock starting at a local date and time; panics on nonexistent local times
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        let start = Local
            .with_ymd_and_hms(year, month, day, hour, minute, second)
            .single()
            .expect("valid local time");
        Self::new(start)
    }

    pub fn advance(&self, by: Duration) {
        let delta = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += delta;
    }

    pub fn advance_minutes(&self, minutes: u64) {
        self.advance(Duration::from_secs(minutes * 60));
    }

    pub fn set(&self, to: DateTime<Local>) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Convert a date-time to epoch milliseconds
pub fn to_millis(dt: &DateTime<Local>) -> i64 {
    dt.timestamp_millis()
}

/// Non-negative span between two millisecond timestamps
pub fn millis_between(earlier: i64, later: i64) -> Duration {
    Duration::from_millis(later.saturating_sub(earlier).max(0) as u64)
}

/// Whole minutes in a duration (floored)
pub fn whole_minutes(d: Duration) -> u32 {
    u32::try_from(d.as_secs() / 60).unwrap_or(u32::MAX)
}

/// The seven calendar days ending on `today`, oldest first
pub fn week_ending(today: NaiveDate) -> Vec<NaiveDate> {
    (0..WEEK_DAYS as u64)
        .rev()
        .filter_map(|back| today.checked_sub_days(chrono::Days::new(back)))
        .collect()
}

/// Short English weekday label (`Mon`, `Tue`, ...)
pub fn weekday_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::at(2025, 12, 25, 14, 30, 0);
        let start = clock.now_millis();

        clock.advance_minutes(5);
        assert_eq!(clock.now_millis() - start, 5 * 60 * 1000);

        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now_millis() - start, 5 * 60 * 1000 + 1500);
    }

    #[test]
    fn test_manual_clock_today() {
        let clock = ManualClock::at(2025, 12, 25, 23, 59, 0);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 12, 25).unwrap());

        clock.advance_minutes(2);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 12, 26).unwrap());
    }

    #[test]
    fn test_to_millis_matches_timestamp() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 45).unwrap();
        assert_eq!(to_millis(&dt), dt.timestamp() * 1000);
    }

    #[test]
    fn test_mock_time_active_matches_offset() {
        assert_eq!(is_mock_time_active(), get_mock_time_offset().is_some());
    }

    #[test]
    fn test_millis_between_clamps_negative() {
        assert_eq!(millis_between(1_000, 4_000), Duration::from_secs(3));
        assert_eq!(millis_between(4_000, 1_000), Duration::ZERO);
    }

    #[test]
    fn test_whole_minutes_floors() {
        assert_eq!(whole_minutes(Duration::from_secs(299)), 4);
        assert_eq!(whole_minutes(Duration::from_secs(300)), 5);
        assert_eq!(whole_minutes(Duration::ZERO), 0);
    }

    #[test]
    fn test_week_ending() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let week = week_ending(today);

        assert_eq!(week.len(), WEEK_DAYS);
        assert_eq!(week[0], NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());
        assert_eq!(week[6], today);
        assert!(week.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_weekday_label() {
        // Christmas 2025 is a Thursday
        let date = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        assert_eq!(weekday_label(date), "Thu");
    }

    #[test]
    fn test_parse_local_datetime() {
        let dt = parse_local_datetime("2025-12-25 14:30:00").unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.day(), 25);

        for invalid in ["2025-12-25", "2025-12-25T14:30:00", "", "not a date"] {
            assert!(parse_local_datetime(invalid).is_none(), "{invalid} should not parse");
        }
    }

    #[test]
    fn test_system_clock_returns_reasonable_time() {
        let t = SystemClock.now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }

    #[test]
    fn test_mock_time_env_var_name() {
        assert_eq!(MOCK_TIME_ENV_VAR, "STUDYGATE_MOCK_TIME");
    }
}
