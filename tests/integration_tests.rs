use chrono::{Days, NaiveDate, NaiveTime};
use rust_decimal_macros::dec;

use carnet::models::{Category, SleepEntry, TrainingSession};
use carnet::reminders::{ActivityWindow, ReminderConfig, ReminderSignal};
use carnet::sleep::SleepGoal;
use carnet::storage::{JsonStore, Store};
use carnet::{BenchmarkTracker, SleepSeverity};

/// Integration tests covering complete engine workflows

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A force benchmark ranks by weight alone; the heavier triple beats the
/// higher-rep sets and formats with its rep count.
#[test]
fn test_squat_pr_workflow() {
    let mut tracker = BenchmarkTracker::new();
    let id = tracker
        .create_benchmark("Squat", Category::Force, None)
        .unwrap()
        .id;

    tracker
        .add_entry(id, date(2025, 1, 6), 100.0, Some(5), None)
        .unwrap();
    tracker
        .add_entry(id, date(2025, 1, 13), 110.0, Some(3), None)
        .unwrap();
    tracker
        .add_entry(id, date(2025, 1, 20), 105.0, Some(8), None)
        .unwrap();

    let benchmark = tracker.get(id).unwrap();
    let pr = benchmark.personal_record().unwrap();
    assert_eq!(pr.date, date(2025, 1, 13));
    assert_eq!(pr.value, 110.0);
    assert_eq!(pr.reps, Some(3));
    assert_eq!(benchmark.format_entry(pr), "110 kg × 3");
}

/// Sleep debt accumulates one-sided over the last seven nights and lands in
/// the warning band.
#[test]
fn test_sleep_debt_scenario() {
    let goal = SleepGoal::new(480);
    let today = date(2025, 2, 10);
    let durations = [420u32, 450, 480, 500, 460, 430, 440];
    let entries: Vec<SleepEntry> = durations
        .iter()
        .enumerate()
        .map(|(i, &minutes)| SleepEntry::new(today - Days::new(i as u64), minutes, 3))
        .collect();

    let stats = carnet::sleep_stats(&entries, goal);
    assert_eq!(stats.sleep_debt_hours, 3.3);

    let advice = carnet::sleep_advice(stats.sleep_debt_hours);
    assert_eq!(advice.severity, SleepSeverity::Warning);
}

/// MET-based calorie estimation: 45 minutes of running at 80 kg is 504 kcal.
#[test]
fn test_running_calories_scenario() {
    assert_eq!(
        carnet::session_calories(dec!(45), Some(dec!(80)), Category::Running),
        Some(504)
    );
}

/// Session counts of 10 then 6 across consecutive fortnights is a 40% drop,
/// past the 30% threshold with sufficient prior volume.
#[test]
fn test_frequency_decline_scenario() {
    let today = date(2025, 3, 15);
    let mut sessions = Vec::new();
    for i in 0..10u64 {
        sessions.push(TrainingSession::new(
            today - Days::new(14 + i),
            dec!(60),
            6,
            Category::Force,
        ));
    }
    for i in 0..6u64 {
        sessions.push(TrainingSession::new(
            today - Days::new(i),
            dec!(60),
            6,
            Category::Force,
        ));
    }

    let window = ActivityWindow::new(today, &sessions, 60);
    let signals = carnet::evaluate(
        &window,
        &ReminderConfig::default(),
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    );
    assert!(signals.contains(&ReminderSignal::FrequencyDeclining));
}

/// Full persistence round trip: benchmark history survives a save/load cycle
/// and the PR recomputes identically from the reloaded collection.
#[test]
fn test_store_round_trip_preserves_pr() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path());

    let mut tracker = BenchmarkTracker::from_benchmarks(store.load_benchmarks().unwrap());
    let id = tracker
        .create_benchmark("10km", Category::Running, None)
        .unwrap()
        .id;
    tracker
        .add_entry(id, date(2025, 4, 1), 3300.0, None, None)
        .unwrap();
    tracker
        .add_entry(id, date(2025, 4, 20), 3150.0, None, Some("race day".into()))
        .unwrap();
    store.save_benchmarks(tracker.benchmarks()).unwrap();

    let reloaded = BenchmarkTracker::from_benchmarks(store.load_benchmarks().unwrap());
    let benchmark = reloaded.find_by_name("10km").unwrap();
    let pr = benchmark.personal_record().unwrap();
    assert_eq!(pr.value, 3150.0);
    assert_eq!(benchmark.format_entry(pr), "52:30");
}

/// A week of heavy daily sessions produces both the load-risk classification
/// and the rest-day reminder signal from the same history.
#[test]
fn test_heavy_week_load_and_rest_signal() {
    let today = date(2025, 5, 20);
    let sessions: Vec<TrainingSession> = (0..7u64)
        .map(|i| TrainingSession::new(today - Days::new(i), dec!(75), 6, Category::Hyrox))
        .collect();

    // 7 × 450 = 3150: danger territory
    let summary = carnet::weekly_summary(&sessions, today, &carnet::LoadThresholds::default());
    assert_eq!(summary.total_load, dec!(3150));
    assert_eq!(summary.risk, carnet::RiskLevel::Danger);

    let window = ActivityWindow::new(today, &sessions, 60);
    let signals = carnet::evaluate(
        &window,
        &ReminderConfig::default(),
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    );
    assert!(signals.contains(&ReminderSignal::RestDaySuggestion));
}

/// A brand-new tracker with no history answers every query with its
/// documented default instead of erroring.
#[test]
fn test_day_one_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path());

    let tracker = BenchmarkTracker::from_benchmarks(store.load_benchmarks().unwrap());
    assert!(tracker.benchmarks().is_empty());

    let goal = store.load_sleep_goal().unwrap();
    let stats = carnet::sleep_stats(&store.load_sleep_entries().unwrap(), goal);
    assert_eq!(stats.average_duration, 0.0);
    assert_eq!(stats.sleep_debt_hours, 0.0);
    assert_eq!(stats.trend, carnet::SleepTrend::Stable);

    let sessions = store.load_sessions().unwrap();
    let today = date(2025, 1, 1);
    let summary = carnet::weekly_summary(&sessions, today, &carnet::LoadThresholds::default());
    assert_eq!(summary.session_count, 0);

    let window = ActivityWindow::new(today, &sessions, 60);
    let signals = carnet::evaluate(
        &window,
        &ReminderConfig::default(),
        NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
    );
    assert!(signals.is_empty());
}

/// Deleting a benchmark cascades to its entries in the persisted collection.
#[test]
fn test_delete_cascade_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path());

    let mut tracker = BenchmarkTracker::new();
    let id = tracker
        .create_benchmark("Deadlift", Category::Force, None)
        .unwrap()
        .id;
    tracker
        .add_entry(id, date(2025, 6, 1), 180.0, Some(1), None)
        .unwrap();
    store.save_benchmarks(tracker.benchmarks()).unwrap();

    let mut tracker = BenchmarkTracker::from_benchmarks(store.load_benchmarks().unwrap());
    tracker.delete_benchmark(id);
    store.save_benchmarks(tracker.benchmarks()).unwrap();

    assert!(store.load_benchmarks().unwrap().is_empty());
}
