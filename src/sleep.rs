//! Sleep debt, trend classification, and goal tracking.
//!
//! All statistics are computed over whatever entry slice the caller passes
//! in; an empty history yields defined zero defaults rather than errors,
//! since "no data yet" is the normal starting state of a personal tracker.
//!
//! Sleep debt is deliberately one-sided: a long night does not repay a short
//! one. Within the rolling window the deficit only accumulates.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::SleepEntry;

/// Goal clamp range and adjustment step, in minutes
pub const SLEEP_GOAL_MIN: u32 = 300;
pub const SLEEP_GOAL_MAX: u32 = 600;
pub const SLEEP_GOAL_STEP: u32 = 15;

/// Default nightly goal: 8 hours
pub const DEFAULT_SLEEP_GOAL: u32 = 480;

/// Number of most recent nights the debt window covers
const DEBT_WINDOW_NIGHTS: usize = 7;

/// Minimum mean shift, in minutes, before the trend leaves `Stable`
const TREND_NOISE_MINUTES: f64 = 15.0;

/// Nightly sleep duration target, always within the sane clamp range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepGoal {
    minutes: u32,
}

impl SleepGoal {
    /// Build a goal, clamping into 300..=600 minutes.
    pub fn new(minutes: u32) -> Self {
        SleepGoal {
            minutes: minutes.clamp(SLEEP_GOAL_MIN, SLEEP_GOAL_MAX),
        }
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Move the goal by whole 15-minute steps, clamped at the range edges.
    pub fn adjusted(&self, steps: i32) -> Self {
        let delta = steps.saturating_mul(SLEEP_GOAL_STEP as i32);
        let minutes = (self.minutes as i64 + delta as i64)
            .clamp(SLEEP_GOAL_MIN as i64, SLEEP_GOAL_MAX as i64) as u32;
        SleepGoal { minutes }
    }
}

impl Default for SleepGoal {
    fn default() -> Self {
        SleepGoal {
            minutes: DEFAULT_SLEEP_GOAL,
        }
    }
}

/// Three-state sleep duration trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepTrend {
    Improving,
    Stable,
    Declining,
}

impl fmt::Display for SleepTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SleepTrend::Improving => "improving",
            SleepTrend::Stable => "stable",
            SleepTrend::Declining => "declining",
        };
        write!(f, "{}", name)
    }
}

/// Aggregated sleep statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepStats {
    /// Mean nightly duration in minutes over all supplied entries
    pub average_duration: f64,

    /// Mean quality (1-5) over all supplied entries
    pub average_quality: f64,

    /// One-sided deficit against the goal over the last 7 nights, in hours
    pub sleep_debt_hours: f64,

    /// Duration trend over the most recent nights
    pub trend: SleepTrend,
}

/// Severity bucket for the debt-based advice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepSeverity {
    Good,
    Warning,
    Danger,
}

/// Advice derived from accumulated sleep debt
#[derive(Debug, Clone, PartialEq)]
pub struct SleepAdvice {
    pub severity: SleepSeverity,
    pub message: String,
}

/// Compute sleep statistics for a history against a goal.
///
/// Averages run over every entry supplied; the debt window is the 7 most
/// recent nights; the trend compares the latest 3 nights against the 3
/// before them and stays `Stable` below 6 entries.
pub fn sleep_stats(entries: &[SleepEntry], goal: SleepGoal) -> SleepStats {
    if entries.is_empty() {
        return SleepStats {
            average_duration: 0.0,
            average_quality: 0.0,
            sleep_debt_hours: 0.0,
            trend: SleepTrend::Stable,
        };
    }

    let count = entries.len() as f64;
    let average_duration =
        entries.iter().map(|e| e.duration_minutes as f64).sum::<f64>() / count;
    let average_quality = entries.iter().map(|e| e.quality as f64).sum::<f64>() / count;

    let mut recent: Vec<&SleepEntry> = entries.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));

    let debt_minutes: u32 = recent
        .iter()
        .take(DEBT_WINDOW_NIGHTS)
        .map(|e| goal.minutes().saturating_sub(e.duration_minutes))
        .sum();
    let sleep_debt_hours = (debt_minutes as f64 / 60.0 * 10.0).round() / 10.0;

    SleepStats {
        average_duration,
        average_quality: (average_quality * 10.0).round() / 10.0,
        sleep_debt_hours,
        trend: duration_trend(&recent),
    }
}

/// Trend over date-descending entries: latest 3 vs the 3 preceding them.
fn duration_trend(recent: &[&SleepEntry]) -> SleepTrend {
    if recent.len() < 6 {
        return SleepTrend::Stable;
    }

    let mean = |slice: &[&SleepEntry]| {
        slice.iter().map(|e| e.duration_minutes as f64).sum::<f64>() / slice.len() as f64
    };
    let latest = mean(&recent[0..3]);
    let prior = mean(&recent[3..6]);

    if latest > prior + TREND_NOISE_MINUTES {
        SleepTrend::Improving
    } else if latest < prior - TREND_NOISE_MINUTES {
        SleepTrend::Declining
    } else {
        SleepTrend::Stable
    }
}

/// Advice for an accumulated debt: good below 2h, warning to 6h, danger above.
pub fn sleep_advice(debt_hours: f64) -> SleepAdvice {
    if debt_hours < 2.0 {
        SleepAdvice {
            severity: SleepSeverity::Good,
            message: "Sleep is on track. You're well recovered.".to_string(),
        }
    } else if debt_hours <= 6.0 {
        SleepAdvice {
            severity: SleepSeverity::Warning,
            message: format!(
                "{:.1}h of sleep debt this week. Aim for an earlier night.",
                debt_hours
            ),
        }
    } else {
        SleepAdvice {
            severity: SleepSeverity::Danger,
            message: format!(
                "Critical sleep debt: {:.1}h. Prioritize recovery.",
                debt_hours
            ),
        }
    }
}

/// Consecutive nights meeting the goal, counted back from `today`.
///
/// A missing night or a night under the goal breaks the run.
pub fn current_goal_streak(entries: &[SleepEntry], goal: SleepGoal, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    loop {
        match entries.iter().find(|e| e.date == day) {
            Some(entry) if entry.duration_minutes >= goal.minutes() => streak += 1,
            _ => break,
        }
        day = match day.checked_sub_days(Days::new(1)) {
            Some(prev) => prev,
            None => break,
        };
    }
    streak
}

/// Longest run of calendar-consecutive nights meeting the goal.
pub fn longest_goal_streak(entries: &[SleepEntry], goal: SleepGoal) -> u32 {
    let mut sorted: Vec<&SleepEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev_date: Option<NaiveDate> = None;

    for entry in sorted {
        if entry.duration_minutes >= goal.minutes() {
            let consecutive = prev_date
                .and_then(|p| p.checked_add_days(Days::new(1)))
                .map_or(false, |next| next == entry.date);
            run = if consecutive { run + 1 } else { 1 };
            longest = longest.max(run);
        } else {
            run = 0;
        }
        prev_date = Some(entry.date);
    }

    longest
}

/// Goal-met and logged-night counts over a trailing window (default 30 days).
pub fn goal_window_counts(
    entries: &[SleepEntry],
    goal: SleepGoal,
    today: NaiveDate,
    window_days: u32,
) -> (u32, u32) {
    let start = today
        .checked_sub_days(Days::new(window_days.saturating_sub(1) as u64))
        .unwrap_or(today);

    let mut reached = 0;
    let mut logged = 0;
    for entry in entries.iter().filter(|e| e.date >= start && e.date <= today) {
        logged += 1;
        if entry.duration_minutes >= goal.minutes() {
            reached += 1;
        }
    }
    (reached, logged)
}

/// Format minutes of sleep as `7h30` / `8h`.
pub fn format_sleep_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h{:02}", hours, mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn nights(durations: &[u32]) -> Vec<SleepEntry> {
        // Most recent night first, walking back one day per element
        let today = date(2025, 6, 30);
        durations
            .iter()
            .enumerate()
            .map(|(i, &minutes)| {
                SleepEntry::new(today - Days::new(i as u64), minutes, 3)
            })
            .collect()
    }

    #[test]
    fn test_goal_clamps() {
        assert_eq!(SleepGoal::new(480).minutes(), 480);
        assert_eq!(SleepGoal::new(100).minutes(), 300);
        assert_eq!(SleepGoal::new(900).minutes(), 600);
    }

    #[test]
    fn test_goal_adjusts_in_steps() {
        let goal = SleepGoal::new(480);
        assert_eq!(goal.adjusted(1).minutes(), 495);
        assert_eq!(goal.adjusted(-2).minutes(), 450);
        // Clamped at the edges
        assert_eq!(SleepGoal::new(590).adjusted(3).minutes(), 600);
        assert_eq!(SleepGoal::new(310).adjusted(-5).minutes(), 300);
    }

    #[test]
    fn test_stats_empty_history_defaults() {
        let stats = sleep_stats(&[], SleepGoal::default());
        assert_eq!(stats.average_duration, 0.0);
        assert_eq!(stats.average_quality, 0.0);
        assert_eq!(stats.sleep_debt_hours, 0.0);
        assert_eq!(stats.trend, SleepTrend::Stable);
    }

    #[test]
    fn test_sleep_debt_one_sided() {
        // Goal 8h; nights [420,450,480,500,460,430,440]
        // Deficits: 60+30+0+0+20+50+40 = 200 min = 3.3h
        let goal = SleepGoal::new(480);
        let entries = nights(&[420, 450, 480, 500, 460, 430, 440]);
        let stats = sleep_stats(&entries, goal);
        assert_eq!(stats.sleep_debt_hours, 3.3);

        let advice = sleep_advice(stats.sleep_debt_hours);
        assert_eq!(advice.severity, SleepSeverity::Warning);
    }

    #[test]
    fn test_sleep_debt_never_negative() {
        // Every night over the goal: surplus never nets out to negative debt
        let entries = nights(&[600, 590, 580, 610, 620, 570, 560]);
        let stats = sleep_stats(&entries, SleepGoal::new(480));
        assert_eq!(stats.sleep_debt_hours, 0.0);
    }

    #[test]
    fn test_sleep_debt_window_is_seven_most_recent() {
        // The eighth night is a disaster but falls outside the debt window
        let entries = nights(&[480, 480, 480, 480, 480, 480, 480, 60]);
        let stats = sleep_stats(&entries, SleepGoal::new(480));
        assert_eq!(stats.sleep_debt_hours, 0.0);
    }

    #[test]
    fn test_trend_stable_below_six_entries() {
        let entries = nights(&[300, 600, 300, 600, 300]);
        let stats = sleep_stats(&entries, SleepGoal::default());
        assert_eq!(stats.trend, SleepTrend::Stable);
    }

    #[test]
    fn test_trend_improving_and_declining() {
        // Latest 3 nights average 480, prior 3 average 420
        let entries = nights(&[480, 480, 480, 420, 420, 420]);
        assert_eq!(
            sleep_stats(&entries, SleepGoal::default()).trend,
            SleepTrend::Improving
        );

        let entries = nights(&[420, 420, 420, 480, 480, 480]);
        assert_eq!(
            sleep_stats(&entries, SleepGoal::default()).trend,
            SleepTrend::Declining
        );
    }

    #[test]
    fn test_trend_within_noise_band_is_stable() {
        // 10-minute shift sits inside the 15-minute noise threshold
        let entries = nights(&[470, 470, 470, 460, 460, 460]);
        assert_eq!(
            sleep_stats(&entries, SleepGoal::default()).trend,
            SleepTrend::Stable
        );
    }

    #[test]
    fn test_averages_cover_all_entries() {
        let entries = nights(&[400, 500]);
        let stats = sleep_stats(&entries, SleepGoal::default());
        assert_eq!(stats.average_duration, 450.0);
        assert_eq!(stats.average_quality, 3.0);
    }

    #[test]
    fn test_advice_severity_buckets() {
        assert_eq!(sleep_advice(0.0).severity, SleepSeverity::Good);
        assert_eq!(sleep_advice(1.9).severity, SleepSeverity::Good);
        assert_eq!(sleep_advice(2.0).severity, SleepSeverity::Warning);
        assert_eq!(sleep_advice(6.0).severity, SleepSeverity::Warning);
        assert_eq!(sleep_advice(6.1).severity, SleepSeverity::Danger);
    }

    #[test]
    fn test_current_goal_streak() {
        let today = date(2025, 6, 30);
        let goal = SleepGoal::new(480);
        let entries = vec![
            SleepEntry::new(today, 490, 4),
            SleepEntry::new(today - Days::new(1), 500, 4),
            SleepEntry::new(today - Days::new(2), 400, 2), // breaks the run
            SleepEntry::new(today - Days::new(3), 510, 5),
        ];
        assert_eq!(current_goal_streak(&entries, goal, today), 2);

        // No entry for today means no active streak
        let entries = vec![SleepEntry::new(today - Days::new(1), 500, 4)];
        assert_eq!(current_goal_streak(&entries, goal, today), 0);
    }

    #[test]
    fn test_longest_goal_streak_requires_consecutive_days() {
        let today = date(2025, 6, 30);
        let goal = SleepGoal::new(480);
        let entries = vec![
            SleepEntry::new(today, 490, 4),
            SleepEntry::new(today - Days::new(1), 500, 4),
            SleepEntry::new(today - Days::new(2), 490, 4),
            // gap: no night logged for today-3
            SleepEntry::new(today - Days::new(4), 520, 5),
            SleepEntry::new(today - Days::new(5), 530, 5),
        ];
        assert_eq!(longest_goal_streak(&entries, goal), 3);
    }

    #[test]
    fn test_goal_window_counts() {
        let today = date(2025, 6, 30);
        let goal = SleepGoal::new(480);
        let entries = vec![
            SleepEntry::new(today, 490, 4),
            SleepEntry::new(today - Days::new(1), 400, 2),
            SleepEntry::new(today - Days::new(40), 600, 5), // outside window
        ];
        assert_eq!(goal_window_counts(&entries, goal, today, 30), (1, 2));
    }

    #[test]
    fn test_format_sleep_duration() {
        assert_eq!(format_sleep_duration(480), "8h");
        assert_eq!(format_sleep_duration(450), "7h30");
        assert_eq!(format_sleep_duration(425), "7h05");
    }
}
