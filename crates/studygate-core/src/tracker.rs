//! Study interval state machine
//!
//! Idle -> Running on start, Running <-> Paused on activity changes, and back
//! to Idle on stop. The persisted [`ActiveInterval`] is the only state; every
//! operation reads it from the store and writes it back, so separate
//! tracker instances over the same store agree.

use std::sync::Arc;
use std::time::Duration;
use studygate_api::{
    ActiveInterval, Activity, CompletedInterval, DailyRecords, DayProgress, Statistics,
    StopOutcome, TrackerState, TrackerStatus, WeeklyReport,
};
use studygate_config::TrackerSettings;
use studygate_store::{
    KEY_ACTIVE_INTERVAL, KEY_DAILY_GOAL, KEY_DAILY_RECORDS, Store, StoreResult, load_json,
    save_json,
};
use studygate_util::{Clock, Username, whole_minutes};
use tracing::{debug, info, warn};

use crate::report;

/// What an activity change did to the interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityOutcome {
    Paused,
    Resumed { paused_for: Duration },
    Unchanged,
}

pub struct TimeTracker {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    settings: TrackerSettings,
}

impl TimeTracker {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, settings: TrackerSettings) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// The in-progress interval, if any
    pub fn active(&self) -> StoreResult<Option<ActiveInterval>> {
        load_json(self.store.as_ref(), KEY_ACTIVE_INTERVAL)
    }

    pub fn state(&self) -> StoreResult<TrackerState> {
        Ok(self
            .active()?
            .map(|a| a.state())
            .unwrap_or(TrackerState::Idle))
    }

    /// Begin an interval now, returning it. No-op (returns None) unless Idle.
    pub fn start(&self, username: Option<Username>) -> StoreResult<Option<ActiveInterval>> {
        if self.active()?.is_some() {
            debug!("Start ignored, interval already active");
            return Ok(None);
        }

        let now = self.clock.now();
        let active = ActiveInterval::new(now.timestamp_millis(), now.date_naive(), username);
        save_json(self.store.as_ref(), KEY_ACTIVE_INTERVAL, &active)?;

        info!(
            date = %active.date,
            username = ?active.username,
            "Study interval started"
        );
        Ok(Some(active))
    }

    /// Suspend accounting. No-op (returns false) unless Running.
    pub fn pause(&self) -> StoreResult<bool> {
        let Some(mut active) = self.active()? else {
            return Ok(false);
        };

        if !active.pause(self.clock.now_millis()) {
            return Ok(false);
        }

        save_json(self.store.as_ref(), KEY_ACTIVE_INTERVAL, &active)?;
        info!("Study interval paused");
        Ok(true)
    }

    /// Resume accounting, returning the length of the pause just closed.
    /// No-op (returns None) unless Paused.
    pub fn resume(&self) -> StoreResult<Option<Duration>> {
        let Some(mut active) = self.active()? else {
            return Ok(None);
        };

        let Some(paused_for) = active.resume(self.clock.now_millis()) else {
            return Ok(None);
        };

        save_json(self.store.as_ref(), KEY_ACTIVE_INTERVAL, &active)?;
        info!(paused_secs = paused_for.as_secs(), "Study interval resumed");
        Ok(Some(paused_for))
    }

    /// Apply a unified activity notification
    pub fn apply_activity(&self, activity: Activity) -> StoreResult<ActivityOutcome> {
        match activity {
            Activity::Inactive => Ok(if self.pause()? {
                ActivityOutcome::Paused
            } else {
                ActivityOutcome::Unchanged
            }),
            Activity::Active => Ok(match self.resume()? {
                Some(paused_for) => ActivityOutcome::Resumed { paused_for },
                None => ActivityOutcome::Unchanged,
            }),
        }
    }

    /// End the interval. An open pause is closed first. Intervals shorter
    /// than the configured minimum are discarded. Returns None when Idle.
    pub fn stop(&self) -> StoreResult<Option<StopOutcome>> {
        let Some(active) = self.active()? else {
            return Ok(None);
        };

        let now = self.clock.now();
        let end_time = now.timestamp_millis();
        let duration_minutes = whole_minutes(active.net_elapsed(end_time));
        let date = now.date_naive();
        let recorded = duration_minutes >= self.settings.min_interval_minutes;

        if recorded {
            let mut records = self.records()?;
            records.append(
                date,
                CompletedInterval {
                    start_time: active.start_time,
                    end_time,
                    duration_minutes,
                    username: active.username.clone(),
                },
            );
            save_json(self.store.as_ref(), KEY_DAILY_RECORDS, &records)?;
            info!(%date, duration_minutes, "Study interval recorded");
        } else {
            info!(
                duration_minutes,
                min_minutes = self.settings.min_interval_minutes,
                "Study interval too short, discarded"
            );
        }

        self.store.remove_item(KEY_ACTIVE_INTERVAL)?;

        Ok(Some(StopOutcome {
            date,
            duration_minutes,
            recorded,
        }))
    }

    /// Net time in the active interval, None when Idle
    pub fn elapsed(&self) -> StoreResult<Option<Duration>> {
        let now = self.clock.now_millis();
        Ok(self.active()?.map(|a| a.net_elapsed(now)))
    }

    /// All completed intervals
    pub fn records(&self) -> StoreResult<DailyRecords> {
        Ok(load_json(self.store.as_ref(), KEY_DAILY_RECORDS)?.unwrap_or_default())
    }

    /// Recorded minutes today; the active interval is not included
    pub fn today_total(&self) -> StoreResult<u32> {
        Ok(report::daily_total(&self.records()?, self.clock.today()))
    }

    /// Effective daily goal: the stored override, else the configured goal
    pub fn daily_goal(&self) -> StoreResult<u32> {
        let Some(raw) = self.store.get_item(KEY_DAILY_GOAL)? else {
            return Ok(self.settings.daily_goal_minutes);
        };

        match raw.trim().parse::<u32>() {
            Ok(goal) if goal > 0 => Ok(goal),
            _ => {
                warn!(value = %raw, "Ignoring invalid daily goal override");
                Ok(self.settings.daily_goal_minutes)
            }
        }
    }

    /// Store a goal override, or clear it with None
    pub fn set_daily_goal(&self, minutes: Option<u32>) -> StoreResult<()> {
        match minutes {
            Some(goal) => {
                self.store.set_item(KEY_DAILY_GOAL, &goal.to_string())?;
                info!(goal, "Daily goal set");
            }
            None => {
                self.store.remove_item(KEY_DAILY_GOAL)?;
                info!(
                    goal = self.settings.daily_goal_minutes,
                    "Daily goal reset to default"
                );
            }
        }
        Ok(())
    }

    /// Snapshot for the tracker widget
    pub fn status(&self) -> StoreResult<TrackerStatus> {
        let now = self.clock.now_millis();
        let active = self.active()?;

        Ok(TrackerStatus {
            state: active
                .as_ref()
                .map(|a| a.state())
                .unwrap_or(TrackerState::Idle),
            today_minutes: self.today_total()?,
            daily_goal_minutes: self.daily_goal()?,
            elapsed_secs: active.map(|a| a.net_elapsed(now).as_secs()),
        })
    }

    pub fn weekly_progress(&self) -> StoreResult<Vec<DayProgress>> {
        Ok(report::weekly_progress(
            &self.records()?,
            self.clock.today(),
            self.daily_goal()?,
        ))
    }

    pub fn statistics(&self) -> StoreResult<Statistics> {
        Ok(report::statistics(
            &self.records()?,
            self.clock.today(),
            self.daily_goal()?,
        ))
    }

    pub fn weekly_report(&self, username: Option<Username>) -> StoreResult<WeeklyReport> {
        Ok(report::weekly_report(
            &self.records()?,
            self.clock.today(),
            self.daily_goal()?,
            username,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use studygate_store::MemoryStore;
    use studygate_util::ManualClock;

    fn setup() -> (TimeTracker, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::at(2025, 1, 6, 9, 0, 0));
        let tracker = TimeTracker::new(store.clone(), clock.clone(), TrackerSettings::default());
        (tracker, store, clock)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_is_idempotent() {
        let (tracker, _store, clock) = setup();
        assert_eq!(tracker.state().unwrap(), TrackerState::Idle);

        let first = tracker.start(Some(Username::new("ann"))).unwrap().unwrap();
        assert_eq!(first.date, date(2025, 1, 6));

        clock.advance_minutes(3);
        assert!(tracker.start(Some(Username::new("ann"))).unwrap().is_none());
        assert_eq!(tracker.active().unwrap().unwrap(), first);
        assert_eq!(tracker.state().unwrap(), TrackerState::Running);
    }

    #[test]
    fn test_uninterrupted_interval_is_recorded() {
        let (tracker, _store, clock) = setup();
        tracker.start(Some(Username::new("ann"))).unwrap();

        clock.advance_minutes(45);
        let outcome = tracker.stop().unwrap().unwrap();

        assert_eq!(
            outcome,
            StopOutcome {
                date: date(2025, 1, 6),
                duration_minutes: 45,
                recorded: true,
            }
        );
        assert_eq!(tracker.state().unwrap(), TrackerState::Idle);

        let records = tracker.records().unwrap();
        let day = records.day(date(2025, 1, 6));
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].duration_minutes, 45);
        assert_eq!(day[0].username, Some(Username::new("ann")));
        assert_eq!(day[0].end_time - day[0].start_time, 45 * 60_000);
    }

    #[test]
    fn test_paused_time_is_excluded() {
        let (tracker, _store, clock) = setup();
        tracker.start(None).unwrap();

        clock.advance_minutes(10);
        assert!(tracker.pause().unwrap());
        clock.advance_minutes(20);
        assert_eq!(tracker.resume().unwrap(), Some(Duration::from_secs(20 * 60)));
        clock.advance_minutes(15);

        let outcome = tracker.stop().unwrap().unwrap();
        assert_eq!(outcome.duration_minutes, 25);
        assert!(outcome.recorded);
    }

    #[test]
    fn test_stop_while_paused_closes_pause() {
        let (tracker, _store, clock) = setup();
        tracker.start(None).unwrap();

        clock.advance_minutes(12);
        tracker.pause().unwrap();
        clock.advance_minutes(30);

        let outcome = tracker.stop().unwrap().unwrap();
        assert_eq!(outcome.duration_minutes, 12);
        assert_eq!(tracker.state().unwrap(), TrackerState::Idle);
    }

    #[test]
    fn test_short_interval_is_discarded() {
        let (tracker, store, clock) = setup();
        tracker.start(None).unwrap();

        clock.advance(Duration::from_secs(4 * 60 + 59));
        let outcome = tracker.stop().unwrap().unwrap();

        assert_eq!(outcome.duration_minutes, 4);
        assert!(!outcome.recorded);
        assert!(tracker.records().unwrap().is_empty());
        assert!(!store.contains(KEY_DAILY_RECORDS).unwrap());
        assert!(!store.contains(KEY_ACTIVE_INTERVAL).unwrap());
    }

    #[test]
    fn test_minimum_is_inclusive() {
        let (tracker, _store, clock) = setup();
        tracker.start(None).unwrap();

        clock.advance_minutes(5);
        assert!(tracker.stop().unwrap().unwrap().recorded);
    }

    #[test]
    fn test_transitions_outside_their_state_are_noops() {
        let (tracker, store, _clock) = setup();

        assert!(!tracker.pause().unwrap());
        assert_eq!(tracker.resume().unwrap(), None);
        assert_eq!(tracker.stop().unwrap(), None);
        assert!(store.snapshot().unwrap().is_empty());

        tracker.start(None).unwrap();
        assert_eq!(tracker.resume().unwrap(), None);
        assert!(tracker.pause().unwrap());
        assert!(!tracker.pause().unwrap());
        assert_eq!(tracker.state().unwrap(), TrackerState::Paused);
    }

    #[test]
    fn test_apply_activity() {
        let (tracker, _store, clock) = setup();

        assert_eq!(
            tracker.apply_activity(Activity::Inactive).unwrap(),
            ActivityOutcome::Unchanged
        );

        tracker.start(None).unwrap();
        assert_eq!(
            tracker.apply_activity(Activity::Active).unwrap(),
            ActivityOutcome::Unchanged
        );
        assert_eq!(
            tracker.apply_activity(Activity::Inactive).unwrap(),
            ActivityOutcome::Paused
        );
        clock.advance_minutes(2);
        assert_eq!(
            tracker.apply_activity(Activity::Active).unwrap(),
            ActivityOutcome::Resumed {
                paused_for: Duration::from_secs(120)
            }
        );
    }

    #[test]
    fn test_appends_keep_prior_intervals() {
        let (tracker, _store, clock) = setup();

        for minutes in [45, 20] {
            tracker.start(None).unwrap();
            clock.advance_minutes(minutes);
            tracker.stop().unwrap();
        }

        let records = tracker.records().unwrap();
        let day = records.day(date(2025, 1, 6));
        assert_eq!(
            day.iter().map(|i| i.duration_minutes).collect::<Vec<_>>(),
            vec![45, 20]
        );
        assert_eq!(tracker.today_total().unwrap(), 65);
    }

    #[test]
    fn test_interval_crossing_midnight_is_filed_under_stop_date() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::at(2025, 1, 6, 23, 50, 0));
        let tracker = TimeTracker::new(store, clock.clone(), TrackerSettings::default());

        tracker.start(None).unwrap();
        clock.advance_minutes(20);

        let outcome = tracker.stop().unwrap().unwrap();
        assert_eq!(outcome.date, date(2025, 1, 7));
        assert_eq!(outcome.duration_minutes, 20);
    }

    #[test]
    fn test_state_survives_new_tracker_instance() {
        let (tracker, store, clock) = setup();
        tracker.start(None).unwrap();
        clock.advance_minutes(10);
        tracker.pause().unwrap();

        let other = TimeTracker::new(store, clock.clone(), TrackerSettings::default());
        assert_eq!(other.state().unwrap(), TrackerState::Paused);

        clock.advance_minutes(5);
        other.resume().unwrap();
        clock.advance_minutes(5);
        assert_eq!(tracker.elapsed().unwrap(), Some(Duration::from_secs(15 * 60)));
    }

    #[test]
    fn test_daily_goal_override() {
        let (tracker, store, _clock) = setup();
        assert_eq!(tracker.daily_goal().unwrap(), 60);

        tracker.set_daily_goal(Some(90)).unwrap();
        assert_eq!(tracker.daily_goal().unwrap(), 90);

        store.set_item(KEY_DAILY_GOAL, "lots").unwrap();
        assert_eq!(tracker.daily_goal().unwrap(), 60);

        tracker.set_daily_goal(None).unwrap();
        assert!(!store.contains(KEY_DAILY_GOAL).unwrap());
        assert_eq!(tracker.daily_goal().unwrap(), 60);
    }

    #[test]
    fn test_status_snapshot() {
        let (tracker, _store, clock) = setup();
        tracker.start(None).unwrap();
        clock.advance_minutes(30);
        tracker.stop().unwrap();

        tracker.start(None).unwrap();
        clock.advance(Duration::from_secs(90));
        tracker.pause().unwrap();

        let status = tracker.status().unwrap();
        assert_eq!(status.state, TrackerState::Paused);
        assert!(status.is_paused());
        assert_eq!(status.today_minutes, 30);
        assert_eq!(status.daily_goal_minutes, 60);
        assert_eq!(status.elapsed_secs, Some(90));
        assert_eq!(status.today_percent(), 50);
    }

    #[test]
    fn test_corrupt_active_record_is_an_error() {
        let (tracker, store, _clock) = setup();
        store.set_item(KEY_ACTIVE_INTERVAL, "{not json").unwrap();
        assert!(tracker.state().is_err());
    }
}
