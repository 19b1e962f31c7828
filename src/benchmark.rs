//! Benchmark registry and personal-record computation.
//!
//! A [`BenchmarkTracker`] owns the full benchmark collection for the single
//! local user. It is built from whatever the persistence collaborator loaded
//! and handed back in full for saving; every derived value (the PR, sorted
//! histories) is recomputed from the entry set on each read rather than
//! cached.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Benchmark, BenchmarkEntry, Category};
use crate::units::{format_value, Direction, Unit, UnitFamily};

/// Benchmark mutation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BenchmarkError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("unknown benchmark: {id}")]
    UnknownBenchmark { id: Uuid },
}

/// In-memory registry of all tracked benchmarks
#[derive(Debug, Default, Clone)]
pub struct BenchmarkTracker {
    benchmarks: Vec<Benchmark>,
}

impl BenchmarkTracker {
    pub fn new() -> Self {
        BenchmarkTracker {
            benchmarks: Vec::new(),
        }
    }

    /// Wrap a collection loaded by the persistence collaborator.
    pub fn from_benchmarks(benchmarks: Vec<Benchmark>) -> Self {
        BenchmarkTracker { benchmarks }
    }

    pub fn benchmarks(&self) -> &[Benchmark] {
        &self.benchmarks
    }

    /// Hand the collection back for a whole-collection save.
    pub fn into_benchmarks(self) -> Vec<Benchmark> {
        self.benchmarks
    }

    pub fn get(&self, id: Uuid) -> Option<&Benchmark> {
        self.benchmarks.iter().find(|b| b.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Benchmark> {
        let wanted = name.trim().to_lowercase();
        self.benchmarks
            .iter()
            .find(|b| b.name.to_lowercase() == wanted)
    }

    /// Create a new benchmark.
    ///
    /// The unit may be omitted only when the category implies one (running
    /// and trail are timed, strength work is weighed). Names are trimmed and
    /// must be unique within their category, case-insensitively.
    pub fn create_benchmark(
        &mut self,
        name: &str,
        category: Category,
        unit: Option<Unit>,
    ) -> Result<&Benchmark, BenchmarkError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BenchmarkError::Validation(
                "benchmark name cannot be empty".to_string(),
            ));
        }

        let lowered = name.to_lowercase();
        if self
            .benchmarks
            .iter()
            .any(|b| b.category == category && b.name.to_lowercase() == lowered)
        {
            return Err(BenchmarkError::Validation(format!(
                "a {} benchmark named '{}' already exists",
                category, name
            )));
        }

        let unit = unit.or_else(|| category.implied_unit()).ok_or_else(|| {
            BenchmarkError::Validation(format!("a unit is required for category {}", category))
        })?;

        tracing::debug!(name, %category, %unit, "creating benchmark");
        self.benchmarks.push(Benchmark::new(name, category, unit));
        Ok(self.benchmarks.last().expect("just pushed"))
    }

    /// Record a dated performance against a benchmark.
    ///
    /// Values must be finite; a reps count is only accepted on strength
    /// benchmarks. Zero and negative values are stored (they mark corrections
    /// or "no effort" days) but never rank as PRs.
    pub fn add_entry(
        &mut self,
        benchmark_id: Uuid,
        date: NaiveDate,
        value: f64,
        reps: Option<u32>,
        note: Option<String>,
    ) -> Result<&BenchmarkEntry, BenchmarkError> {
        let benchmark = self
            .benchmarks
            .iter_mut()
            .find(|b| b.id == benchmark_id)
            .ok_or(BenchmarkError::UnknownBenchmark { id: benchmark_id })?;

        if !value.is_finite() {
            return Err(BenchmarkError::Validation(
                "entry value must be a finite number".to_string(),
            ));
        }
        if reps.is_some() && !benchmark.category.is_strength() {
            return Err(BenchmarkError::Validation(format!(
                "reps are only valid on strength benchmarks, not {}",
                benchmark.category
            )));
        }

        benchmark.entries.push(BenchmarkEntry {
            id: Uuid::new_v4(),
            date,
            value,
            reps,
            note,
        });
        Ok(benchmark.entries.last().expect("just pushed"))
    }

    /// Delete a benchmark and, with it, its whole entry history.
    ///
    /// Deleting an absent id is a no-op.
    pub fn delete_benchmark(&mut self, id: Uuid) {
        self.benchmarks.retain(|b| b.id != id);
    }

    /// Delete one entry from a benchmark; absent ids are a no-op.
    pub fn delete_entry(&mut self, benchmark_id: Uuid, entry_id: Uuid) {
        if let Some(benchmark) = self.benchmarks.iter_mut().find(|b| b.id == benchmark_id) {
            benchmark.entries.retain(|e| e.id != entry_id);
        }
    }
}

impl Benchmark {
    /// The best entry in this benchmark's history, if any.
    ///
    /// Comparison follows the unit family's fixed direction. Only finite,
    /// strictly positive values are candidates: under lower-is-better a zero
    /// would otherwise beat every real time. For strength benchmarks the
    /// ranking key is the weight alone; reps are informational, so a heavier
    /// single beats more reps at lower weight.
    ///
    /// Equal best values resolve to the earliest date (first to achieve
    /// wins); equal dates resolve to insertion order.
    pub fn personal_record(&self) -> Option<&BenchmarkEntry> {
        let direction = self.unit.direction();
        let mut best: Option<&BenchmarkEntry> = None;

        for entry in &self.entries {
            if !entry.value.is_finite() || entry.value <= 0.0 {
                continue;
            }
            best = match best {
                None => Some(entry),
                Some(current) => {
                    let better = match direction {
                        Direction::HigherIsBetter => entry.value > current.value,
                        Direction::LowerIsBetter => entry.value < current.value,
                    };
                    let earlier_tie = entry.value == current.value && entry.date < current.date;
                    if better || earlier_tie {
                        Some(entry)
                    } else {
                        Some(current)
                    }
                }
            };
        }

        best
    }

    /// Entries sorted by date descending; insertion order is preserved
    /// between entries sharing a date.
    pub fn entries_sorted_desc(&self) -> Vec<&BenchmarkEntry> {
        let mut sorted: Vec<&BenchmarkEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    /// The most recently dated entry, if any.
    pub fn latest_entry(&self) -> Option<&BenchmarkEntry> {
        self.entries_sorted_desc().first().copied()
    }

    /// Render an entry for display, e.g. `110 kg × 3` for a weighted lift.
    pub fn format_entry(&self, entry: &BenchmarkEntry) -> String {
        let value = format_value(entry.value, self.unit);
        match entry.reps {
            Some(reps) if reps > 0 && self.unit.family() == UnitFamily::Mass => {
                format!("{} × {}", value, reps)
            }
            _ => value,
        }
    }
}

/// Canonical starter exercises per category, as shipped on first run.
pub fn preset_benchmarks(category: Category) -> Vec<(&'static str, Unit)> {
    match category {
        Category::Force | Category::Musculation => vec![
            ("Squat", Unit::Kilograms),
            ("Bench Press", Unit::Kilograms),
            ("Deadlift", Unit::Kilograms),
            ("Overhead Press", Unit::Kilograms),
            ("Pull-ups", Unit::Reps),
            ("Dips", Unit::Reps),
        ],
        Category::Running => vec![
            ("5km", Unit::Seconds),
            ("10km", Unit::Seconds),
            ("Half Marathon", Unit::Seconds),
            ("Marathon", Unit::Seconds),
        ],
        Category::Trail => vec![
            ("Long Run", Unit::Kilometers),
            ("Short Trail", Unit::Seconds),
            ("Ultra Trail", Unit::Seconds),
        ],
        Category::Hyrox => vec![
            ("Sled Push", Unit::Seconds),
            ("Sled Pull", Unit::Seconds),
            ("Wall Balls", Unit::Reps),
            ("Burpees", Unit::Reps),
            ("SkiErg 1000m", Unit::Seconds),
            ("Row 1000m", Unit::Seconds),
        ],
        Category::Cardio | Category::Other => vec![],
    }
}
