//! Persistence collaborator boundary.
//!
//! The engine itself never touches disk; it consumes and produces whole
//! collections through the [`Store`] contract. Saves replace the entire
//! collection. There is no partial update or transaction surface; the data
//! sets involved are small and locally resident.
//!
//! [`JsonStore`] is the shipped implementation: one JSON document per
//! collection under a data directory. A missing file reads as the empty
//! collection, since an unopened tracker simply has no history yet.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{Benchmark, SleepEntry, TrainingSession};
use crate::sleep::SleepGoal;

/// Storage operation errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Load/save contract the engine expects from its host.
///
/// Implementations are assumed durable and crash-consistent; atomicity
/// beyond whole-collection replacement is not the engine's concern.
pub trait Store {
    fn load_benchmarks(&self) -> Result<Vec<Benchmark>, StorageError>;
    fn save_benchmarks(&self, benchmarks: &[Benchmark]) -> Result<(), StorageError>;

    fn load_sessions(&self) -> Result<Vec<TrainingSession>, StorageError>;
    fn save_sessions(&self, sessions: &[TrainingSession]) -> Result<(), StorageError>;

    fn load_sleep_entries(&self) -> Result<Vec<SleepEntry>, StorageError>;
    fn save_sleep_entries(&self, entries: &[SleepEntry]) -> Result<(), StorageError>;

    fn load_sleep_goal(&self) -> Result<SleepGoal, StorageError>;
    fn save_sleep_goal(&self, goal: SleepGoal) -> Result<(), StorageError>;
}

const BENCHMARKS_FILE: &str = "benchmarks.json";
const SESSIONS_FILE: &str = "sessions.json";
const SLEEP_ENTRIES_FILE: &str = "sleep_entries.json";
const SLEEP_GOAL_FILE: &str = "sleep_goal.json";

/// File-per-collection JSON store
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonStore { dir: dir.into() }
    }

    /// Platform data directory for the application.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("carnet"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T, StorageError> {
        let path = self.dir.join(file);
        if !path.exists() {
            tracing::debug!(?path, "store file absent, using default");
            return Ok(T::default());
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)?;
        tracing::debug!(?path, "store file written");
        Ok(())
    }
}

impl Store for JsonStore {
    fn load_benchmarks(&self) -> Result<Vec<Benchmark>, StorageError> {
        self.read_or_default(BENCHMARKS_FILE)
    }

    fn save_benchmarks(&self, benchmarks: &[Benchmark]) -> Result<(), StorageError> {
        self.write(BENCHMARKS_FILE, &benchmarks)
    }

    fn load_sessions(&self) -> Result<Vec<TrainingSession>, StorageError> {
        self.read_or_default(SESSIONS_FILE)
    }

    fn save_sessions(&self, sessions: &[TrainingSession]) -> Result<(), StorageError> {
        self.write(SESSIONS_FILE, &sessions)
    }

    fn load_sleep_entries(&self) -> Result<Vec<SleepEntry>, StorageError> {
        self.read_or_default(SLEEP_ENTRIES_FILE)
    }

    fn save_sleep_entries(&self, entries: &[SleepEntry]) -> Result<(), StorageError> {
        self.write(SLEEP_ENTRIES_FILE, &entries)
    }

    fn load_sleep_goal(&self) -> Result<SleepGoal, StorageError> {
        let path = self.dir.join(SLEEP_GOAL_FILE);
        if !path.exists() {
            return Ok(SleepGoal::default());
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save_sleep_goal(&self, goal: SleepGoal) -> Result<(), StorageError> {
        self.write(SLEEP_GOAL_FILE, &goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::units::Unit;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_absent_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        assert!(store.load_benchmarks().unwrap().is_empty());
        assert!(store.load_sessions().unwrap().is_empty());
        assert!(store.load_sleep_entries().unwrap().is_empty());
        assert_eq!(store.load_sleep_goal().unwrap(), SleepGoal::default());
    }

    #[test]
    fn test_benchmark_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let mut benchmark = Benchmark::new("Squat", Category::Force, Unit::Kilograms);
        benchmark.entries.push(crate::models::BenchmarkEntry {
            id: uuid::Uuid::new_v4(),
            date: date(2025, 1, 1),
            value: 110.0,
            reps: Some(3),
            note: None,
        });

        store.save_benchmarks(std::slice::from_ref(&benchmark)).unwrap();
        let loaded = store.load_benchmarks().unwrap();
        assert_eq!(loaded, vec![benchmark]);
    }

    #[test]
    fn test_save_replaces_whole_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let first = TrainingSession::new(date(2025, 1, 1), dec!(60), 6, Category::Force);
        let second = TrainingSession::new(date(2025, 1, 2), dec!(45), 7, Category::Running);

        store.save_sessions(&[first.clone(), second.clone()]).unwrap();
        store.save_sessions(std::slice::from_ref(&second)).unwrap();

        assert_eq!(store.load_sessions().unwrap(), vec![second]);
    }

    #[test]
    fn test_sleep_goal_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store.save_sleep_goal(SleepGoal::new(450)).unwrap();
        assert_eq!(store.load_sleep_goal().unwrap(), SleepGoal::new(450));
    }

    #[test]
    fn test_sleep_entries_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let entries = vec![
            SleepEntry::new(date(2025, 1, 1), 465, 4),
            SleepEntry::new(date(2025, 1, 2), 420, 3),
        ];
        store.save_sleep_entries(&entries).unwrap();
        assert_eq!(store.load_sleep_entries().unwrap(), entries);
    }
}
