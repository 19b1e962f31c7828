// Library interface for the carnet analytics engine
// Allows integration tests and the CLI to access the core functionality

pub mod benchmark;
pub mod config;
pub mod error;
pub mod export;
pub mod load;
pub mod logging;
pub mod models;
pub mod reminders;
pub mod sleep;
pub mod storage;
pub mod units;

// Re-export commonly used types for convenience
pub use benchmark::{preset_benchmarks, BenchmarkError, BenchmarkTracker};
pub use config::{AppConfig, ConfigError};
pub use error::{CarnetError, Result};
pub use export::{export_benchmark_csv, export_sleep_csv, ExportError};
pub use load::{
    is_intense, rpe_color, rpe_label, session_calories, session_load, weekly_summary,
    LoadThresholds, LoadTrend, RiskLevel, WeeklyLoadSummary,
};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use models::{Benchmark, BenchmarkEntry, Category, SleepEntry, TrainingSession};
pub use reminders::{
    evaluate, modal_training_weekday, usual_training_days, ActivityWindow, ReminderConfig,
    ReminderSignal,
};
pub use sleep::{
    current_goal_streak, format_sleep_duration, longest_goal_streak, sleep_advice, sleep_stats,
    SleepGoal, SleepSeverity, SleepStats, SleepTrend,
};
pub use storage::{JsonStore, StorageError, Store};
pub use units::{compare_better, convert, format_value, Direction, Unit, UnitError, UnitFamily};
