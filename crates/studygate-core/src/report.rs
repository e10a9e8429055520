//! Pure aggregation over recorded intervals

use chrono::NaiveDate;
use studygate_api::{API_VERSION, DailyRecords, DayProgress, Statistics, WeeklyReport, percent_of_goal};
use studygate_util::{Username, week_ending, weekday_label};

/// Sum of recorded minutes on `date`
pub fn daily_total(records: &DailyRecords, date: NaiveDate) -> u32 {
    records.daily_total(date)
}

/// Seven entries ending on `today`, oldest first
pub fn weekly_progress(records: &DailyRecords, today: NaiveDate, goal: u32) -> Vec<DayProgress> {
    week_ending(today)
        .into_iter()
        .map(|date| {
            let total_minutes = records.daily_total(date);
            DayProgress {
                date,
                label: weekday_label(date),
                total_minutes,
                goal_met: total_minutes >= goal,
                percent_of_goal: percent_of_goal(total_minutes, goal),
            }
        })
        .collect()
}

pub fn statistics(records: &DailyRecords, today: NaiveDate, goal: u32) -> Statistics {
    let mut stats = Statistics::default();

    for (_, intervals) in records.iter() {
        let day_total: u32 = intervals.iter().map(|i| i.duration_minutes).sum();
        stats.total_minutes = stats.total_minutes.saturating_add(day_total);
        stats.total_sessions += intervals.len();
        if day_total > 0 {
            stats.days_studied += 1;
        }
    }

    if stats.total_sessions > 0 {
        let sessions = stats.total_sessions as u64;
        let total = u64::from(stats.total_minutes);
        stats.average_session_minutes = ((total + sessions / 2) / sessions) as u32;
    }

    let week = weekly_progress(records, today, goal);
    stats.weekly_minutes = week.iter().map(|d| d.total_minutes).sum();
    stats.days_goal_met = week.iter().filter(|d| d.goal_met).count();
    stats.today_minutes = records.daily_total(today);

    stats
}

/// Everything the report view needs in one value
pub fn weekly_report(
    records: &DailyRecords,
    today: NaiveDate,
    goal: u32,
    username: Option<Username>,
) -> WeeklyReport {
    WeeklyReport {
        api_version: API_VERSION,
        username,
        daily_goal_minutes: goal,
        days: weekly_progress(records, today, goal),
        statistics: statistics(records, today, goal),
    }
}
