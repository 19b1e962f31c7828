//! Adaptive reminder heuristic.
//!
//! A pure pass over a rolling window of training history that yields zero or
//! more recommendation signals. The engine only decides *what* is worth
//! surfacing; scheduling and delivery belong to the host notification layer.
//!
//! Sparse history never raises an error here: a check that cannot be
//! supported by the data on hand simply stays silent.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::load::session_load;
use crate::models::TrainingSession;

/// Tuning knobs for the reminder heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Length of the rolling activity window in days
    pub window_days: u32,

    /// Fractional session-count drop that counts as a decline
    pub decline_threshold: f64,

    /// Minimum sessions in the prior period before a decline can fire
    pub min_prior_sessions: usize,

    /// Weekly cumulative load above which rest is suggested
    pub high_load_threshold: Decimal,

    /// Hour of day after which a missed usual training day is called
    pub cutoff_hour: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            window_days: 60,
            decline_threshold: 0.30,
            min_prior_sessions: 3,
            high_load_threshold: dec!(2500),
            cutoff_hour: 18,
        }
    }
}

/// Recommendation signals the heuristic can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderSignal {
    /// Today is the user's usual training weekday and nothing is logged yet
    MissedUsualTrainingDay,
    /// Session count dropped sharply against the preceding two weeks
    FrequencyDeclining,
    /// A heavily loaded week with no rest day in it
    RestDaySuggestion,
}

impl fmt::Display for ReminderSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReminderSignal::MissedUsualTrainingDay => "missed_usual_training_day",
            ReminderSignal::FrequencyDeclining => "frequency_declining",
            ReminderSignal::RestDaySuggestion => "rest_day_suggestion",
        };
        write!(f, "{}", name)
    }
}

/// Read-only, time-bounded view over the session history.
///
/// Derived on demand, never persisted.
#[derive(Debug, Clone)]
pub struct ActivityWindow<'a> {
    today: NaiveDate,
    sessions: Vec<&'a TrainingSession>,
}

impl<'a> ActivityWindow<'a> {
    /// Restrict `sessions` to the `window_days` ending at `today` inclusive.
    pub fn new(today: NaiveDate, sessions: &'a [TrainingSession], window_days: u32) -> Self {
        let start = today
            .checked_sub_days(Days::new(window_days.saturating_sub(1) as u64))
            .unwrap_or(today);
        let sessions = sessions
            .iter()
            .filter(|s| s.date >= start && s.date <= today)
            .collect();
        ActivityWindow { today, sessions }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn sessions(&self) -> &[&'a TrainingSession] {
        &self.sessions
    }

    fn count_between(&self, from: NaiveDate, to: NaiveDate) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.date >= from && s.date <= to)
            .count()
    }

    fn has_session_on(&self, date: NaiveDate) -> bool {
        self.sessions.iter().any(|s| s.date == date)
    }
}

/// The most frequent training weekday in the window.
///
/// Ties resolve to the earliest weekday, Monday first. `None` on an empty
/// window.
pub fn modal_training_weekday(window: &ActivityWindow) -> Option<Weekday> {
    let counts = weekday_counts(window);
    let max = *counts.iter().max()?;
    if max == 0 {
        return None;
    }
    counts
        .iter()
        .position(|&c| c == max)
        .map(|idx| weekday_from_monday_index(idx as u32))
}

/// Every weekday trained often enough to count as a habit.
///
/// A weekday qualifies when its session count reaches 30% of the modal
/// weekday's count, with an absolute floor of 2 occurrences.
pub fn usual_training_days(window: &ActivityWindow) -> Vec<Weekday> {
    let counts = weekday_counts(window);
    let max = match counts.iter().max() {
        Some(&m) if m > 0 => m,
        _ => return Vec::new(),
    };
    let required = ((max as f64 * 0.3).floor() as usize).max(2);

    counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count >= required)
        .map(|(idx, _)| weekday_from_monday_index(idx as u32))
        .collect()
}

fn weekday_counts(window: &ActivityWindow) -> [usize; 7] {
    let mut counts = [0usize; 7];
    for session in window.sessions() {
        counts[session.date.weekday().num_days_from_monday() as usize] += 1;
    }
    counts
}

fn weekday_from_monday_index(index: u32) -> Weekday {
    match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// Evaluate all reminder checks over the window.
///
/// The checks are independent and may co-occur; the returned order is fixed.
pub fn evaluate(
    window: &ActivityWindow,
    config: &ReminderConfig,
    now: NaiveTime,
) -> Vec<ReminderSignal> {
    let mut signals = Vec::new();

    if missed_usual_training_day(window, config, now) {
        signals.push(ReminderSignal::MissedUsualTrainingDay);
    }
    if frequency_declining(window, config) {
        signals.push(ReminderSignal::FrequencyDeclining);
    }
    if rest_day_suggestion(window, config) {
        signals.push(ReminderSignal::RestDaySuggestion);
    }

    signals
}

/// Today is the modal training weekday, the cutoff has passed, and no
/// session has been logged yet.
fn missed_usual_training_day(
    window: &ActivityWindow,
    config: &ReminderConfig,
    now: NaiveTime,
) -> bool {
    let Some(modal) = modal_training_weekday(window) else {
        return false;
    };
    window.today().weekday() == modal
        && now.hour() >= config.cutoff_hour
        && !window.has_session_on(window.today())
}

/// Session count in the last 14 days dropped more than the threshold below
/// the preceding 14 days. The prior-period floor keeps sparse histories
/// from producing false positives; it also guarantees at least two weeks of
/// data exist before the signal can fire.
fn frequency_declining(window: &ActivityWindow, config: &ReminderConfig) -> bool {
    let today = window.today();
    let recent_start = today - Days::new(13);
    let prior_start = today - Days::new(27);
    let prior_end = today - Days::new(14);

    let recent = window.count_between(recent_start, today);
    let prior = window.count_between(prior_start, prior_end);

    if prior < config.min_prior_sessions || recent >= prior {
        return false;
    }

    let decrease = (prior - recent) as f64 / prior as f64;
    decrease > config.decline_threshold
}

/// Trailing 7 days exceeded the high-load threshold without a single
/// zero-session day. A history shorter than a week always contains empty
/// days, so the check is implicitly silent there.
fn rest_day_suggestion(window: &ActivityWindow, config: &ReminderConfig) -> bool {
    let today = window.today();
    let mut total = Decimal::ZERO;

    for offset in 0..7u64 {
        let day = today - Days::new(offset);
        let mut day_sessions = 0usize;
        for session in window.sessions().iter().filter(|s| s.date == day) {
            total += session_load(session.duration_minutes, session.rpe);
            day_sessions += 1;
        }
        if day_sessions == 0 {
            return false;
        }
    }

    total > config.high_load_threshold
}
