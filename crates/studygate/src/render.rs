//! Plain-text rendering of core output

use studygate_api::{ProgressBand, Statistics, TrackerState, TrackerStatus, WeeklyReport};
use studygate_core::CoreEvent;
use studygate_util::{format_clock, format_study_time};
use std::time::Duration;

const BAR_WIDTH: usize = 20;

pub fn event_line(event: &CoreEvent) -> String {
    match event {
        CoreEvent::LoggedIn { username } => format!("Logged in as {}", username),
        CoreEvent::LoginRejected { .. } => "Invalid username or password".to_string(),
        CoreEvent::LoggedOut { username: Some(u) } => format!("Logged out {}", u),
        CoreEvent::LoggedOut { username: None } => "Logged out".to_string(),
        CoreEvent::SessionExpired { username } => format!("Session for {} expired", username),
        CoreEvent::Redirected { url } => format!("Redirected to {}", url),
        CoreEvent::IntervalStarted { date, .. } => format!("Study session started ({})", date),
        CoreEvent::IntervalPaused => "Study session paused".to_string(),
        CoreEvent::IntervalResumed { paused_for } => {
            format!("Study session resumed after {}", format_clock(*paused_for))
        }
        CoreEvent::IntervalStopped(outcome) if outcome.recorded => format!(
            "Study session recorded: {} on {}",
            format_study_time(outcome.duration_minutes),
            outcome.date
        ),
        CoreEvent::IntervalStopped(outcome) => format!(
            "Study session discarded: {} is below the minimum",
            format_study_time(outcome.duration_minutes)
        ),
        CoreEvent::PageInitialized => "Page initialized".to_string(),
    }
}

pub fn print_events(events: &[CoreEvent]) {
    for event in events {
        println!("{}", event_line(event));
    }
}

/// One-line widget: today's total, goal progress and the running clock
pub fn status_line(status: &TrackerStatus) -> String {
    let mut line = format!(
        "Today: {} / {} ({}%)",
        format_study_time(status.today_minutes),
        format_study_time(status.daily_goal_minutes),
        status.today_percent()
    );

    if let Some(secs) = status.elapsed_secs {
        let clock = format_clock(Duration::from_secs(secs));
        match status.state {
            TrackerState::Paused => line.push_str(&format!("  [{} paused]", clock)),
            _ => line.push_str(&format!("  [{}]", clock)),
        }
    }
    line
}

fn bar(percent: u32, band: ProgressBand) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    let fill = match band {
        ProgressBand::GoalMet => '#',
        ProgressBand::Halfway => '=',
        ProgressBand::Behind => '-',
    };
    format!(
        "{}{}",
        fill.to_string().repeat(filled),
        " ".repeat(BAR_WIDTH - filled)
    )
}

pub fn print_report(report: &WeeklyReport) {
    println!(
        "Last 7 days (goal {} per day)",
        format_study_time(report.daily_goal_minutes)
    );
    for day in &report.days {
        println!(
            "{} {} |{}| {:>8}{}",
            day.label,
            day.date.format("%m-%d"),
            bar(day.percent_of_goal, day.band()),
            format_study_time(day.total_minutes),
            if day.goal_met { "  *" } else { "" }
        );
    }
    println!();
    print_statistics(&report.statistics);
}

pub fn print_statistics(stats: &Statistics) {
    println!("Total study time:  {}", format_study_time(stats.total_minutes));
    println!("Sessions:          {}", stats.total_sessions);
    println!("Days studied:      {}", stats.days_studied);
    println!(
        "Average session:   {}",
        format_study_time(stats.average_session_minutes)
    );
    println!("This week:         {}", format_study_time(stats.weekly_minutes));
    println!("Goal met (7 days): {}", stats.days_goal_met);
    println!("Today:             {}", format_study_time(stats.today_minutes));
}
