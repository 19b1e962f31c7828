//! Unit-aware value model.
//!
//! Every tracked performance is a plain magnitude tagged with a [`Unit`].
//! Units belong to a closed set of families (mass, elapsed time, repetitions,
//! distance); two magnitudes are only comparable when their units share a
//! family, and only the mass family supports conversion (kg↔lbs). Elapsed
//! time is always carried as whole seconds regardless of how it was entered.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fixed kilograms→pounds conversion ratio.
pub const KG_PER_LB_RATIO: f64 = 2.20462;

/// Unit conversion and comparison errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("incompatible units: cannot convert {from} to {to}")]
    Incompatible { from: Unit, to: Unit },
}

/// Measurement units supported by benchmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Mass in kilograms
    #[serde(rename = "kg")]
    Kilograms,
    /// Mass in pounds
    #[serde(rename = "lbs")]
    Pounds,
    /// Elapsed time in seconds
    #[serde(rename = "time")]
    Seconds,
    /// Repetition count
    #[serde(rename = "reps")]
    Reps,
    /// Distance in kilometers
    #[serde(rename = "km")]
    Kilometers,
}

/// Unit families; conversion is only defined within a family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFamily {
    Mass,
    Time,
    Repetitions,
    Distance,
}

/// Which end of the scale counts as a better performance.
///
/// Fixed per family: a record time goes down, everything else goes up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Unit {
    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::Kilograms | Unit::Pounds => UnitFamily::Mass,
            Unit::Seconds => UnitFamily::Time,
            Unit::Reps => UnitFamily::Repetitions,
            Unit::Kilometers => UnitFamily::Distance,
        }
    }

    pub fn direction(&self) -> Direction {
        match self.family() {
            UnitFamily::Time => Direction::LowerIsBetter,
            _ => Direction::HigherIsBetter,
        }
    }

    /// Display suffix appended to formatted magnitudes
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Kilograms => "kg",
            Unit::Pounds => "lbs",
            Unit::Seconds => "time",
            Unit::Reps => "reps",
            Unit::Kilometers => "km",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// Render a magnitude with unit-appropriate precision and suffix.
///
/// Mass keeps at most one decimal (a trailing `.0` is trimmed, so a 110 kg
/// lift renders as `110 kg`), time renders as `H:MM:SS` or `M:SS`, distance
/// to two decimals, repetitions as a whole count.
pub fn format_value(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Kilograms | Unit::Pounds => {
            let rounded = (value * 10.0).round() / 10.0;
            if (rounded - rounded.trunc()).abs() < f64::EPSILON {
                format!("{:.0} {}", rounded, unit.suffix())
            } else {
                format!("{:.1} {}", rounded, unit.suffix())
            }
        }
        Unit::Seconds => format_time(value.round().max(0.0) as u32),
        Unit::Reps => format!("{:.0} reps", value),
        Unit::Kilometers => format!("{:.2} km", value),
    }
}

/// Format elapsed seconds as `H:MM:SS`, or `M:SS` under an hour.
pub fn format_time(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Parse `H:MM:SS` or `MM:SS` (or a bare seconds count) into seconds.
pub fn parse_time(input: &str) -> Option<u32> {
    let parts: Vec<&str> = input.trim().split(':').collect();
    let nums: Option<Vec<u32>> = parts.iter().map(|p| p.trim().parse().ok()).collect();
    match nums?.as_slice() {
        [h, m, s] => Some(h * 3600 + m * 60 + s),
        [m, s] => Some(m * 60 + s),
        [s] => Some(*s),
        _ => None,
    }
}

/// Pick the better of two same-unit magnitudes under the family direction.
///
/// Ties resolve to the first argument.
pub fn compare_better(a: f64, b: f64, unit: Unit) -> f64 {
    match unit.direction() {
        Direction::HigherIsBetter => {
            if b > a {
                b
            } else {
                a
            }
        }
        Direction::LowerIsBetter => {
            if b < a {
                b
            } else {
                a
            }
        }
    }
}

/// Convert a magnitude between units.
///
/// Identity within the same unit; kg↔lbs via the fixed ratio. Every other
/// pairing crosses a family boundary and fails.
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, UnitError> {
    match (from, to) {
        (a, b) if a == b => Ok(value),
        (Unit::Kilograms, Unit::Pounds) => Ok(value * KG_PER_LB_RATIO),
        (Unit::Pounds, Unit::Kilograms) => Ok(value / KG_PER_LB_RATIO),
        (from, to) => Err(UnitError::Incompatible { from, to }),
    }
}

/// Format a duration given in minutes as `1h 23min` / `55min 20s`.
pub fn format_minutes(minutes: f64) -> String {
    if minutes < 60.0 {
        let mins = minutes.floor() as u32;
        let secs = ((minutes - mins as f64) * 60.0).round() as u32;
        if secs > 0 {
            format!("{}min {}s", mins, secs)
        } else {
            format!("{}min", mins)
        }
    } else {
        let hours = (minutes / 60.0).floor() as u32;
        let mins = (minutes % 60.0).round() as u32;
        if mins > 0 {
            format!("{}h {}min", hours, mins)
        } else {
            format!("{}h", hours)
        }
    }
}

/// Running pace in min/km from elapsed seconds and distance.
///
/// Degenerate inputs render as `--:--` rather than a division error.
pub fn format_pace(time_seconds: u32, distance_km: f64) -> String {
    if distance_km <= 0.0 || time_seconds == 0 {
        return "--:--".to_string();
    }

    let pace_seconds_per_km = time_seconds as f64 / distance_km;
    let pace_minutes = (pace_seconds_per_km / 60.0).floor() as u32;
    let pace_seconds = (pace_seconds_per_km % 60.0).floor() as u32;

    format!("{}:{:02}", pace_minutes, pace_seconds)
}
