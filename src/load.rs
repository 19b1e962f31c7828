//! Session training load and energy expenditure.
//!
//! Load is the Foster session-RPE score: duration in minutes times the 1-10
//! perceived exertion. Energy expenditure uses the standard MET formula with
//! per-category coefficients. Both take their inputs as plain values so the
//! caller decides where they come from; body weight in particular is owned
//! by an external profile store.

use chrono::{Days, NaiveDate};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Category, TrainingSession};

/// Session-RPE training load: duration × RPE.
///
/// Inputs are clamped rather than rejected (negative durations floor at 0,
/// RPE snaps into 1..=10): duration often comes from free-text entry and the
/// metric favors resilience over strictness.
pub fn session_load(duration_minutes: Decimal, rpe: u8) -> Decimal {
    let duration = duration_minutes.max(Decimal::ZERO);
    let rpe = rpe.clamp(1, 10);
    duration * Decimal::from(rpe)
}

/// Estimated energy expenditure for a session.
///
/// `kcal = MET × 3.5 × weight_kg / 200 × minutes`, rounded to a whole
/// number and floored at 0. Returns `None` when body weight is unknown or
/// non-positive; callers must treat that as "unknown", not zero expenditure.
pub fn session_calories(
    duration_minutes: Decimal,
    body_weight_kg: Option<Decimal>,
    category: Category,
) -> Option<u32> {
    let weight = body_weight_kg?;
    if weight <= Decimal::ZERO {
        return None;
    }

    let duration = duration_minutes.max(Decimal::ZERO);
    let kcal = category.met() * dec!(3.5) * weight / dec!(200) * duration;
    Some(kcal.round().to_u32().unwrap_or(0))
}

/// Canonical RPE scale buckets: 1-3 easy, 4-6 moderate, 7-9 hard, 10 maximal.
pub fn rpe_label(rpe: u8) -> &'static str {
    match rpe.clamp(1, 10) {
        1..=3 => "Easy",
        4..=6 => "Moderate",
        7..=9 => "Hard",
        _ => "Maximal",
    }
}

/// Display color (hex) for an RPE value, matching the scale buckets.
pub fn rpe_color(rpe: u8) -> &'static str {
    match rpe.clamp(1, 10) {
        1..=3 => "#10B981",
        4..=6 => "#3B82F6",
        7..=9 => "#F59E0B",
        _ => "#EF4444",
    }
}

/// Whether a session at this RPE counts as intense (hard or maximal).
pub fn is_intense(rpe: u8) -> bool {
    rpe.clamp(1, 10) >= 7
}

/// Weekly cumulative load thresholds separating risk bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadThresholds {
    /// Upper bound of the comfortable band
    pub moderate: Decimal,
    /// Upper bound of the moderate band
    pub high: Decimal,
    /// Upper bound of the high band; beyond lies injury territory
    pub danger: Decimal,
}

impl Default for LoadThresholds {
    fn default() -> Self {
        LoadThresholds {
            moderate: dec!(2000),
            high: dec!(2500),
            danger: dec!(3000),
        }
    }
}

/// Risk classification of a week's cumulative load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Moderate,
    High,
    Danger,
}

impl RiskLevel {
    pub fn from_total(total: Decimal, thresholds: &LoadThresholds) -> Self {
        if total > thresholds.danger {
            RiskLevel::Danger
        } else if total > thresholds.high {
            RiskLevel::High
        } else if total > thresholds.moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::Safe
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "#10B981",
            RiskLevel::Moderate => "#F59E0B",
            RiskLevel::High => "#F97316",
            RiskLevel::Danger => "#EF4444",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "Load is in the comfortable range. Keep it up.",
            RiskLevel::Moderate => "Solid week. Be careful about adding more.",
            RiskLevel::High => "High load. Plan an easy session or a rest day.",
            RiskLevel::Danger => "Critical load, elevated injury risk. Rest is required.",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Danger => "danger",
        };
        write!(f, "{}", name)
    }
}

/// Week-over-week load movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadTrend {
    Increasing,
    Stable,
    Decreasing,
}

/// Aggregated load statistics over the trailing seven days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyLoadSummary {
    /// Sum of session loads over the window
    pub total_load: Decimal,

    /// Mean RPE across sessions, one decimal
    pub average_rpe: Decimal,

    /// Total training minutes
    pub total_duration: Decimal,

    /// Number of sessions in the window
    pub session_count: usize,

    /// Per-day load, oldest day first
    pub daily_loads: Vec<(NaiveDate, Decimal)>,

    /// Movement against the preceding seven days
    pub trend: LoadTrend,

    /// Risk classification of the total
    pub risk: RiskLevel,
}

/// Summarize the trailing 7 days of sessions ending at `today`.
///
/// The trend compares against the preceding 7-day block with a ±15% band.
pub fn weekly_summary(
    sessions: &[TrainingSession],
    today: NaiveDate,
    thresholds: &LoadThresholds,
) -> WeeklyLoadSummary {
    let week_start = today - Days::new(6);
    let prev_start = today - Days::new(13);

    let mut daily_loads = Vec::with_capacity(7);
    let mut total_load = Decimal::ZERO;
    let mut total_duration = Decimal::ZERO;
    let mut rpe_sum = Decimal::ZERO;
    let mut session_count = 0usize;

    let mut day = week_start;
    while day <= today {
        let mut day_load = Decimal::ZERO;
        for session in sessions.iter().filter(|s| s.date == day) {
            let load = session_load(session.duration_minutes, session.rpe);
            day_load += load;
            total_duration += session.duration_minutes.max(Decimal::ZERO);
            rpe_sum += Decimal::from(session.rpe.clamp(1, 10));
            session_count += 1;
        }
        total_load += day_load;
        daily_loads.push((day, day_load));
        day = day + Days::new(1);
    }

    let prev_total: Decimal = sessions
        .iter()
        .filter(|s| s.date >= prev_start && s.date < week_start)
        .map(|s| session_load(s.duration_minutes, s.rpe))
        .sum();

    let trend = if total_load > prev_total * dec!(1.15) {
        LoadTrend::Increasing
    } else if total_load < prev_total * dec!(0.85) {
        LoadTrend::Decreasing
    } else {
        LoadTrend::Stable
    };

    let average_rpe = if session_count > 0 {
        (rpe_sum / Decimal::from(session_count)).round_dp(1)
    } else {
        Decimal::ZERO
    };

    WeeklyLoadSummary {
        total_load,
        average_rpe,
        total_duration,
        session_count,
        daily_loads,
        trend,
        risk: RiskLevel::from_total(total_load, thresholds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_session_load_is_exact_product() {
        assert_eq!(session_load(dec!(60), 7), dec!(420));
        assert_eq!(session_load(dec!(45), 10), dec!(450));
        assert_eq!(session_load(dec!(90), 1), dec!(90));
    }

    #[test]
    fn test_session_load_clamps_out_of_range_inputs() {
        // RPE snaps into 1..=10, duration floors at zero
        assert_eq!(session_load(dec!(60), 15), dec!(600));
        assert_eq!(session_load(dec!(60), 0), dec!(60));
        assert_eq!(session_load(dec!(-30), 5), dec!(0));
    }

    #[test]
    fn test_session_calories_met_formula() {
        // 45 min run at 80 kg, MET 8: 8 * 3.5 * 80 / 200 * 45 = 504
        assert_eq!(
            session_calories(dec!(45), Some(dec!(80)), Category::Running),
            Some(504)
        );
    }

    #[test]
    fn test_session_calories_default_met() {
        // 60 min strength at 80 kg, fallback MET 5: 5 * 3.5 * 80 / 200 * 60 = 420
        assert_eq!(
            session_calories(dec!(60), Some(dec!(80)), Category::Force),
            Some(420)
        );
    }

    #[test]
    fn test_session_calories_unknown_weight_is_none() {
        assert_eq!(session_calories(dec!(45), None, Category::Running), None);
        assert_eq!(
            session_calories(dec!(45), Some(dec!(0)), Category::Running),
            None
        );
        assert_eq!(
            session_calories(dec!(45), Some(dec!(-70)), Category::Running),
            None
        );
    }

    #[test]
    fn test_session_calories_degenerate_duration_floors_at_zero() {
        assert_eq!(
            session_calories(dec!(-45), Some(dec!(80)), Category::Running),
            Some(0)
        );
    }

    #[test]
    fn test_rpe_scale_buckets() {
        assert_eq!(rpe_label(1), "Easy");
        assert_eq!(rpe_label(3), "Easy");
        assert_eq!(rpe_label(4), "Moderate");
        assert_eq!(rpe_label(6), "Moderate");
        assert_eq!(rpe_label(7), "Hard");
        assert_eq!(rpe_label(9), "Hard");
        assert_eq!(rpe_label(10), "Maximal");
        // Out of range clamps rather than panics
        assert_eq!(rpe_label(0), "Easy");
        assert_eq!(rpe_label(14), "Maximal");
    }

    #[test]
    fn test_rpe_colors_follow_buckets() {
        assert_eq!(rpe_color(2), "#10B981");
        assert_eq!(rpe_color(5), "#3B82F6");
        assert_eq!(rpe_color(8), "#F59E0B");
        assert_eq!(rpe_color(10), "#EF4444");
    }

    #[test]
    fn test_is_intense() {
        assert!(!is_intense(6));
        assert!(is_intense(7));
        assert!(is_intense(10));
    }

    #[test]
    fn test_risk_levels_against_thresholds() {
        let thresholds = LoadThresholds::default();
        assert_eq!(RiskLevel::from_total(dec!(1200), &thresholds), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_total(dec!(2000), &thresholds), RiskLevel::Safe);
        assert_eq!(
            RiskLevel::from_total(dec!(2200), &thresholds),
            RiskLevel::Moderate
        );
        assert_eq!(RiskLevel::from_total(dec!(2800), &thresholds), RiskLevel::High);
        assert_eq!(
            RiskLevel::from_total(dec!(3500), &thresholds),
            RiskLevel::Danger
        );
    }

    #[test]
    fn test_weekly_summary_totals_and_window() {
        let today = date(2025, 5, 14);
        let sessions = vec![
            TrainingSession::new(today, dec!(60), 7, Category::Force),
            TrainingSession::new(today - Days::new(2), dec!(45), 6, Category::Running),
            // Outside the 7-day window
            TrainingSession::new(today - Days::new(10), dec!(90), 8, Category::Hyrox),
        ];

        let summary = weekly_summary(&sessions, today, &LoadThresholds::default());
        assert_eq!(summary.session_count, 2);
        assert_eq!(summary.total_load, dec!(690)); // 420 + 270
        assert_eq!(summary.total_duration, dec!(105));
        assert_eq!(summary.average_rpe, dec!(6.5));
        assert_eq!(summary.daily_loads.len(), 7);
        assert_eq!(summary.risk, RiskLevel::Safe);
    }

    #[test]
    fn test_weekly_summary_trend() {
        let today = date(2025, 5, 14);
        // Previous week: 2 hard sessions; this week: almost nothing
        let sessions = vec![
            TrainingSession::new(today - Days::new(8), dec!(60), 8, Category::Force),
            TrainingSession::new(today - Days::new(10), dec!(60), 8, Category::Force),
            TrainingSession::new(today, dec!(30), 3, Category::Cardio),
        ];
        let summary = weekly_summary(&sessions, today, &LoadThresholds::default());
        assert_eq!(summary.trend, LoadTrend::Decreasing);

        // Flip the weeks around
        let sessions = vec![
            TrainingSession::new(today, dec!(60), 8, Category::Force),
            TrainingSession::new(today - Days::new(1), dec!(60), 8, Category::Force),
            TrainingSession::new(today - Days::new(8), dec!(30), 3, Category::Cardio),
        ];
        let summary = weekly_summary(&sessions, today, &LoadThresholds::default());
        assert_eq!(summary.trend, LoadTrend::Increasing);
    }

    #[test]
    fn test_weekly_summary_empty() {
        let summary = weekly_summary(&[], date(2025, 5, 14), &LoadThresholds::default());
        assert_eq!(summary.total_load, Decimal::ZERO);
        assert_eq!(summary.average_rpe, Decimal::ZERO);
        assert_eq!(summary.session_count, 0);
        assert_eq!(summary.trend, LoadTrend::Stable);
        assert_eq!(summary.risk, RiskLevel::Safe);
    }
}
