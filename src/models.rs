use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::units::Unit;

/// Activity categories shared by benchmarks and training sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Force,
    Running,
    Trail,
    Cardio,
    Hyrox,
    Musculation,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Force,
        Category::Running,
        Category::Trail,
        Category::Cardio,
        Category::Hyrox,
        Category::Musculation,
        Category::Other,
    ];

    /// Unit implied by the category when none is given at creation.
    ///
    /// Kept as a single mapping table so the inference is testable in one
    /// place instead of scattered across call sites.
    pub fn implied_unit(&self) -> Option<Unit> {
        match self {
            Category::Running | Category::Trail => Some(Unit::Seconds),
            Category::Force | Category::Musculation => Some(Unit::Kilograms),
            Category::Cardio | Category::Hyrox | Category::Other => None,
        }
    }

    /// Strength categories are the only ones where a reps secondary
    /// magnitude is meaningful alongside a weight.
    pub fn is_strength(&self) -> bool {
        matches!(self, Category::Force | Category::Musculation)
    }

    /// MET intensity coefficient used for energy expenditure.
    ///
    /// Categories without a specific entry fall back to a moderate generic
    /// exercise value of 5.
    pub fn met(&self) -> Decimal {
        match self {
            Category::Running | Category::Trail | Category::Hyrox => dec!(8),
            Category::Cardio => dec!(7),
            Category::Force | Category::Musculation | Category::Other => dec!(5),
        }
    }

    /// Default display color (hex) for benchmarks of this category.
    pub fn default_color(&self) -> &'static str {
        match self {
            Category::Force | Category::Musculation => "#EF4444",
            Category::Running => "#3B82F6",
            Category::Trail => "#10B981",
            Category::Cardio => "#06B6D4",
            Category::Hyrox => "#F59E0B",
            Category::Other => "#6B7280",
        }
    }

    /// Default display icon name for benchmarks of this category.
    pub fn default_icon(&self) -> &'static str {
        match self {
            Category::Force | Category::Musculation => "dumbbell",
            Category::Running => "timer",
            Category::Trail => "mountain",
            Category::Cardio => "heart-pulse",
            Category::Hyrox => "flame",
            Category::Other => "target",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Force => "force",
            Category::Running => "running",
            Category::Trail => "trail",
            Category::Cardio => "cardio",
            Category::Hyrox => "hyrox",
            Category::Musculation => "musculation",
            Category::Other => "other",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "force" => Ok(Category::Force),
            "running" => Ok(Category::Running),
            "trail" => Ok(Category::Trail),
            "cardio" => Ok(Category::Cardio),
            "hyrox" => Ok(Category::Hyrox),
            "musculation" => Ok(Category::Musculation),
            "other" => Ok(Category::Other),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

/// One dated performance record belonging to a benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    /// Unique entry identifier
    pub id: Uuid,

    /// Calendar day the performance was achieved
    pub date: NaiveDate,

    /// Primary magnitude, expressed in the owning benchmark's unit
    pub value: f64,

    /// Repetitions at the recorded weight; strength benchmarks only
    pub reps: Option<u32>,

    /// Optional free-text note
    pub note: Option<String>,
}

/// A tracked exercise or metric with its dated entry history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    /// Stable identifier
    pub id: Uuid,

    /// Display name, unique (case-insensitive) within a category
    pub name: String,

    /// Activity category
    pub category: Category,

    /// Unit every entry value is expressed in
    pub unit: Unit,

    /// Display color (hex); presentation only
    pub color: String,

    /// Display icon name; presentation only
    pub icon: String,

    /// Entry history; insertion order, sorted by date on read
    pub entries: Vec<BenchmarkEntry>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Benchmark {
    pub fn new(name: impl Into<String>, category: Category, unit: Unit) -> Self {
        Benchmark {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            unit,
            color: category.default_color().to_string(),
            icon: category.default_icon().to_string(),
            entries: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A logged training session, the input to load and energy estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    /// Unique session identifier
    pub id: Uuid,

    /// Calendar day of the session
    pub date: NaiveDate,

    /// Session duration in minutes
    pub duration_minutes: Decimal,

    /// Rate of Perceived Exertion, 1-10
    pub rpe: u8,

    /// Activity category
    pub category: Category,

    /// Optional free-text note
    pub note: Option<String>,
}

impl TrainingSession {
    pub fn new(date: NaiveDate, duration_minutes: Decimal, rpe: u8, category: Category) -> Self {
        TrainingSession {
            id: Uuid::new_v4(),
            date,
            duration_minutes,
            rpe,
            category,
            note: None,
        }
    }
}

/// One night of sleep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepEntry {
    /// Unique entry identifier
    pub id: Uuid,

    /// Calendar day the night is attributed to
    pub date: NaiveDate,

    /// Time asleep in minutes
    pub duration_minutes: u32,

    /// Subjective quality, 1-5
    pub quality: u8,

    /// Clock time the user went to bed
    pub bed_time: Option<NaiveTime>,

    /// Clock time the user woke up
    pub wake_time: Option<NaiveTime>,

    /// Optional free-text note
    pub note: Option<String>,
}

impl SleepEntry {
    pub fn new(date: NaiveDate, duration_minutes: u32, quality: u8) -> Self {
        SleepEntry {
            id: Uuid::new_v4(),
            date,
            duration_minutes,
            quality,
            bed_time: None,
            wake_time: None,
            note: None,
        }
    }

    /// Build an entry from bed and wake clock times.
    ///
    /// A wake time earlier than the bed time is taken to cross midnight.
    pub fn from_times(
        date: NaiveDate,
        bed_time: NaiveTime,
        wake_time: NaiveTime,
        quality: u8,
    ) -> Self {
        let bed = minutes_of_day(bed_time);
        let wake = minutes_of_day(wake_time);
        let duration = if wake >= bed {
            wake - bed
        } else {
            wake + 24 * 60 - bed
        };

        SleepEntry {
            id: Uuid::new_v4(),
            date,
            duration_minutes: duration,
            quality,
            bed_time: Some(bed_time),
            wake_time: Some(wake_time),
            note: None,
        }
    }
}

fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
