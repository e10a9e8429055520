//! Shared types for the studygate data model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use studygate_util::{Username, millis_between, whole_minutes};

/// Login marker as held in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMarker {
    pub authenticated: bool,
    /// Epoch milliseconds of the successful login
    pub login_time: i64,
    pub username: Username,
}

impl SessionMarker {
    /// Age of the marker at `now_millis`
    pub fn age(&self, now_millis: i64) -> Duration {
        millis_between(self.login_time, now_millis)
    }
}

/// Result of a read-only session check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStatus {
    Valid {
        username: Username,
        remaining: Duration,
    },
    /// No marker, or a marker that does not claim authentication
    Missing,
    /// Marker older than the TTL
    Expired { username: Username },
}

impl SessionStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, SessionStatus::Valid { .. })
    }
}

/// Outcome of gating a page load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    Allowed { username: Username },
    Redirect { url: String },
}

/// Suspension of an active interval's accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseMarker {
    /// Epoch milliseconds when the pause began
    pub pause_time: i64,
    /// Accumulated paused milliseconds before this pause began
    pub paused_before: i64,
}

/// Lifecycle state of the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerState {
    Idle,
    Running,
    Paused,
}

/// The in-progress study interval.
///
/// All interval accounting (start anchor, accumulated pause time and the
/// open pause, if any) lives in this one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInterval {
    /// Epoch milliseconds when tracking started
    pub start_time: i64,
    /// Local date the interval started on
    pub date: NaiveDate,
    pub username: Option<Username>,
    /// Milliseconds spent in completed pauses
    #[serde(default)]
    pub paused_millis: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause: Option<PauseMarker>,
}

impl ActiveInterval {
    pub fn new(start_time: i64, date: NaiveDate, username: Option<Username>) -> Self {
        Self {
            start_time,
            date,
            username,
            paused_millis: 0,
            pause: None,
        }
    }

    pub fn state(&self) -> TrackerState {
        if self.pause.is_some() {
            TrackerState::Paused
        } else {
            TrackerState::Running
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_some()
    }

    /// Open a pause at `now`. Returns false if already paused.
    pub fn pause(&mut self, now: i64) -> bool {
        if self.pause.is_some() {
            return false;
        }
        self.pause = Some(PauseMarker {
            pause_time: now,
            paused_before: self.paused_millis,
        });
        true
    }

    /// Close the open pause at `now`, returning its length.
    pub fn resume(&mut self, now: i64) -> Option<Duration> {
        let marker = self.pause.take()?;
        let span = millis_between(marker.pause_time, now);
        self.paused_millis = marker.paused_before.saturating_add(span.as_millis() as i64);
        Some(span)
    }

    /// Total paused time at `now`, including an open pause
    pub fn total_paused(&self, now: i64) -> Duration {
        let closed = Duration::from_millis(self.paused_millis.max(0) as u64);
        match &self.pause {
            Some(marker) => closed + millis_between(marker.pause_time, now),
            None => closed,
        }
    }

    /// Wall time since start minus paused time, clamped at zero
    pub fn net_elapsed(&self, now: i64) -> Duration {
        millis_between(self.start_time, now).saturating_sub(self.total_paused(now))
    }
}

/// A finished, recorded study interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedInterval {
    pub start_time: i64,
    pub end_time: i64,
    /// Net study minutes
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub username: Option<Username>,
}

/// Completed intervals grouped by calendar date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyRecords(BTreeMap<NaiveDate, Vec<CompletedInterval>>);

impl DailyRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interval to the end of a day's list
    pub fn append(&mut self, date: NaiveDate, interval: CompletedInterval) {
        self.0.entry(date).or_default().push(interval);
    }

    /// Intervals recorded on a date, in insertion order
    pub fn day(&self, date: NaiveDate) -> &[CompletedInterval] {
        self.0.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sum of recorded minutes on a date
    pub fn daily_total(&self, date: NaiveDate) -> u32 {
        self.day(date)
            .iter()
            .fold(0u32, |total, i| total.saturating_add(i.duration_minutes))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<CompletedInterval>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How far a day's total is toward the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    GoalMet,
    /// At least half of the goal
    Halfway,
    Behind,
}

impl ProgressBand {
    pub fn from_percent(percent: u32) -> Self {
        if percent >= 100 {
            ProgressBand::GoalMet
        } else if percent >= 50 {
            ProgressBand::Halfway
        } else {
            ProgressBand::Behind
        }
    }
}

/// Percentage of `goal` reached by `total`, capped at 100
pub fn percent_of_goal(total: u32, goal: u32) -> u32 {
    if goal == 0 {
        return 100;
    }
    ((u64::from(total) * 100 / u64::from(goal)).min(100)) as u32
}

/// One bar of the weekly report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    /// Short weekday label (`Mon`, `Tue`, ...)
    pub label: String,
    pub total_minutes: u32,
    pub goal_met: bool,
    /// Percentage of the daily goal, capped at 100
    pub percent_of_goal: u32,
}

impl DayProgress {
    pub fn band(&self) -> ProgressBand {
        if self.goal_met {
            ProgressBand::GoalMet
        } else {
            ProgressBand::from_percent(self.percent_of_goal)
        }
    }
}

/// Aggregate figures over the whole history and the current week
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_minutes: u32,
    pub total_sessions: usize,
    /// Distinct days with a nonzero total
    pub days_studied: usize,
    /// Rounded mean minutes per session (0 when there are none)
    pub average_session_minutes: u32,
    pub weekly_minutes: u32,
    /// Days in the 7-day window that met the goal
    pub days_goal_met: usize,
    pub today_minutes: u32,
}

/// Everything the report view renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub api_version: u32,
    pub username: Option<Username>,
    pub daily_goal_minutes: u32,
    /// Exactly seven days, oldest first, ending today
    pub days: Vec<DayProgress>,
    pub statistics: Statistics,
}

/// Result of stopping the active interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopOutcome {
    /// Date the interval was filed under
    pub date: NaiveDate,
    pub duration_minutes: u32,
    /// False when the interval was shorter than the minimum and discarded
    pub recorded: bool,
}

/// Snapshot for the tracker widget, refreshed every tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerStatus {
    pub state: TrackerState,
    pub today_minutes: u32,
    pub daily_goal_minutes: u32,
    /// Net elapsed seconds of the active interval
    pub elapsed_secs: Option<u64>,
}

impl TrackerStatus {
    pub fn is_paused(&self) -> bool {
        self.state == TrackerState::Paused
    }

    pub fn today_percent(&self) -> u32 {
        percent_of_goal(self.today_minutes, self.daily_goal_minutes)
    }

    pub fn band(&self) -> ProgressBand {
        ProgressBand::from_percent(self.today_percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn interval(minutes: u32) -> CompletedInterval {
        CompletedInterval {
            start_time: 0,
            end_time: i64::from(minutes) * 60_000,
            duration_minutes: minutes,
            username: Some(Username::new("student")),
        }
    }

    #[test]
    fn test_pause_and_resume_accumulate() {
        let mut active = ActiveInterval::new(0, date(2025, 1, 6), None);
        assert_eq!(active.state(), TrackerState::Running);

        assert!(active.pause(60_000));
        assert!(!active.pause(70_000));
        assert_eq!(active.state(), TrackerState::Paused);

        let span = active.resume(180_000).unwrap();
        assert_eq!(span, Duration::from_secs(120));
        assert_eq!(active.paused_millis, 120_000);
        assert!(active.resume(190_000).is_none());

        assert!(active.pause(300_000));
        active.resume(360_000);
        assert_eq!(active.paused_millis, 180_000);
    }

    #[test]
    fn test_net_elapsed_counts_open_pause() {
        let mut active = ActiveInterval::new(0, date(2025, 1, 6), None);
        active.pause(60_000);

        // 10 minutes in, paused for the last 9
        assert_eq!(active.net_elapsed(600_000), Duration::from_secs(60));
        assert_eq!(active.total_paused(600_000), Duration::from_secs(540));
    }

    #[test]
    fn test_net_elapsed_clamps_to_zero() {
        let mut active = ActiveInterval::new(1_000, date(2025, 1, 6), None);
        active.paused_millis = 10_000;
        assert_eq!(active.net_elapsed(5_000), Duration::ZERO);
    }

    #[test]
    fn test_active_interval_json_shape() {
        let active = ActiveInterval::new(1_700_000_000_000, date(2025, 1, 6), Some("ann".into()));
        let json = serde_json::to_value(&active).unwrap();

        assert_eq!(json["startTime"], 1_700_000_000_000_i64);
        assert_eq!(json["date"], "2025-01-06");
        assert_eq!(json["username"], "ann");
        assert!(json.get("pause").is_none());
    }

    #[test]
    fn test_daily_records_append_only_order() {
        let mut records = DailyRecords::new();
        let day = date(2025, 1, 6);

        records.append(day, interval(45));
        records.append(day, interval(20));

        assert_eq!(records.day(day).len(), 2);
        assert_eq!(records.day(day)[0].duration_minutes, 45);
        assert_eq!(records.daily_total(day), 65);
        assert_eq!(records.daily_total(date(2025, 1, 7)), 0);
    }

    #[test]
    fn test_daily_total_saturates_on_corrupt_durations() {
        let mut records = DailyRecords::new();
        let day = date(2025, 1, 6);

        records.append(day, interval(u32::MAX));
        records.append(day, interval(30));

        assert_eq!(records.daily_total(day), u32::MAX);
    }

    #[test]
    fn test_daily_records_json_keys_are_dates() {
        let mut records = DailyRecords::new();
        records.append(date(2025, 1, 6), interval(30));

        let json = serde_json::to_string(&records).unwrap();
        assert!(json.starts_with("{\"2025-01-06\":[{"));
        assert!(json.contains("\"duration\":30"));

        let parsed: DailyRecords = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_percent_of_goal() {
        assert_eq!(percent_of_goal(45, 60), 75);
        assert_eq!(percent_of_goal(65, 60), 100);
        assert_eq!(percent_of_goal(0, 60), 0);
    }

    #[test]
    fn test_progress_band() {
        assert_eq!(ProgressBand::from_percent(100), ProgressBand::GoalMet);
        assert_eq!(ProgressBand::from_percent(75), ProgressBand::Halfway);
        assert_eq!(ProgressBand::from_percent(49), ProgressBand::Behind);
    }
}
