use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::Decimal;
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use tabled::{Table, Tabled};

use carnet::config::AppConfig;
use carnet::logging::{init_logging, LogConfig, LogLevel};
use carnet::models::{Category, SleepEntry, TrainingSession};
use carnet::reminders::ActivityWindow;
use carnet::sleep::SleepGoal;
use carnet::storage::{JsonStore, Store};
use carnet::units::{parse_time, Unit, UnitFamily};
use carnet::BenchmarkTracker;

/// carnet - Personal Performance Analytics CLI
///
/// Tracks benchmarks and personal records, session training load, sleep
/// debt, and adaptive training reminders, all from local JSON data.
#[derive(Parser)]
#[command(name = "carnet")]
#[command(version = "0.1.0")]
#[command(about = "Personal performance analytics", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage tracked benchmarks and their entries
    Benchmark {
        #[command(subcommand)]
        command: BenchmarkCommands,
    },

    /// Log training sessions and inspect weekly load
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Log sleep and inspect sleep statistics
    Sleep {
        #[command(subcommand)]
        command: SleepCommands,
    },

    /// Evaluate adaptive reminder signals for today
    Advise,
}

#[derive(Subcommand)]
enum BenchmarkCommands {
    /// Create a new benchmark
    Create {
        /// Benchmark name, unique within its category
        name: String,

        /// Category (force, running, trail, cardio, hyrox, musculation, other)
        #[arg(short = 'c', long)]
        category: Category,

        /// Unit (kg, lbs, time, reps, km); inferred from category if omitted
        #[arg(short, long)]
        unit: Option<String>,
    },

    /// Record a performance entry against a benchmark
    Entry {
        /// Benchmark name
        name: String,

        /// Value in the benchmark's unit; times accept H:MM:SS or MM:SS
        #[arg(short, long)]
        value: String,

        /// Repetitions at this weight (strength benchmarks only)
        #[arg(short, long)]
        reps: Option<u32>,

        /// Entry date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List all benchmarks with their current PR
    List,

    /// Show a benchmark's entry history
    Show {
        /// Benchmark name
        name: String,
    },

    /// Delete a benchmark and its entire history
    Delete {
        /// Benchmark name
        name: String,
    },

    /// Export a benchmark's history to CSV
    Export {
        /// Benchmark name
        name: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Log a training session
    Log {
        /// Duration in minutes
        #[arg(short = 'm', long)]
        duration: Decimal,

        /// Rate of perceived exertion, 1-10
        #[arg(short, long)]
        rpe: u8,

        /// Category (force, running, trail, cardio, hyrox, musculation, other)
        #[arg(short, long)]
        category: Category,

        /// Session date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show the trailing week's load summary
    Week,
}

#[derive(Subcommand)]
enum SleepCommands {
    /// Log a night of sleep
    Log {
        /// Duration, e.g. 7:30 or minutes
        #[arg(short = 'm', long)]
        duration: Option<String>,

        /// Bed time (HH:MM), with --wake an alternative to --duration
        #[arg(short, long)]
        bed: Option<NaiveTime>,

        /// Wake time (HH:MM)
        #[arg(short, long)]
        wake: Option<NaiveTime>,

        /// Quality, 1-5
        #[arg(short, long)]
        quality: u8,

        /// Night date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show sleep statistics and advice
    Stats,

    /// Show or set the sleep goal in minutes
    Goal {
        /// New goal in minutes (clamped to 300-600)
        minutes: Option<u32>,
    },

    /// Export the sleep history to CSV
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Tabled)]
struct BenchmarkRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Entries")]
    entries: usize,
    #[tabled(rename = "PR")]
    pr: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        ..LogConfig::default()
    };
    let _guard = init_logging(&log_config)?;

    let config_path = cli
        .config
        .or_else(AppConfig::default_path)
        .ok_or_else(|| anyhow!("could not determine a config file location"))?;
    let config = AppConfig::load_or_default(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let store = JsonStore::new(config.settings.data_dir.clone());

    match cli.command {
        Commands::Benchmark { command } => run_benchmark(command, &store),
        Commands::Session { command } => run_session(command, &store, &config),
        Commands::Sleep { command } => run_sleep(command, &store),
        Commands::Advise => run_advise(&store, &config),
    }
}

fn run_benchmark(command: BenchmarkCommands, store: &JsonStore) -> Result<()> {
    let mut tracker = BenchmarkTracker::from_benchmarks(store.load_benchmarks()?);

    match command {
        BenchmarkCommands::Create { name, category, unit } => {
            let unit = unit.map(|u| parse_unit(&u)).transpose()?;
            let benchmark = tracker.create_benchmark(&name, category, unit)?;
            println!(
                "{} {} ({}, {})",
                "✓ Created benchmark".green().bold(),
                benchmark.name,
                benchmark.category,
                benchmark.unit
            );
            store.save_benchmarks(tracker.benchmarks())?;
        }

        BenchmarkCommands::Entry { name, value, reps, date, note } => {
            let benchmark = tracker
                .find_by_name(&name)
                .ok_or_else(|| anyhow!("no benchmark named '{}'", name))?;
            let id = benchmark.id;
            let value = parse_value(&value, benchmark.unit)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());

            tracker.add_entry(id, date, value, reps, note)?;
            let benchmark = tracker.get(id).expect("entry just added");
            let entry = benchmark.entries.last().expect("entry just added");
            println!(
                "{} {} on {}",
                "✓ Recorded".green().bold(),
                benchmark.format_entry(entry),
                date
            );

            if benchmark.personal_record().map(|pr| pr.id) == Some(entry.id) {
                println!("{}", "  New personal record!".yellow().bold());
            }
            store.save_benchmarks(tracker.benchmarks())?;
        }

        BenchmarkCommands::List => {
            let rows: Vec<BenchmarkRow> = tracker
                .benchmarks()
                .iter()
                .map(|b| BenchmarkRow {
                    name: b.name.clone(),
                    category: b.category.to_string(),
                    unit: b.unit.to_string(),
                    entries: b.entries.len(),
                    pr: b
                        .personal_record()
                        .map_or("-".to_string(), |pr| b.format_entry(pr)),
                })
                .collect();

            if rows.is_empty() {
                println!("No benchmarks yet. Create one with `carnet benchmark create`.");
            } else {
                println!("{}", Table::new(rows));
            }
        }

        BenchmarkCommands::Show { name } => {
            let benchmark = tracker
                .find_by_name(&name)
                .ok_or_else(|| anyhow!("no benchmark named '{}'", name))?;

            println!(
                "{} ({}, {})",
                benchmark.name.bold(),
                benchmark.category,
                benchmark.unit
            );
            match benchmark.personal_record() {
                Some(pr) => println!(
                    "  PR: {} on {}",
                    benchmark.format_entry(pr).yellow().bold(),
                    pr.date
                ),
                None => println!("  PR: none yet"),
            }
            for entry in benchmark.entries_sorted_desc() {
                let note = entry
                    .note
                    .as_deref()
                    .map_or(String::new(), |n| format!("  ({})", n));
                println!("  {}  {}{}", entry.date, benchmark.format_entry(entry), note);
            }
        }

        BenchmarkCommands::Delete { name } => {
            if let Some(benchmark) = tracker.find_by_name(&name) {
                let id = benchmark.id;
                tracker.delete_benchmark(id);
                store.save_benchmarks(tracker.benchmarks())?;
                println!("{} {}", "✓ Deleted".green().bold(), name);
            } else {
                println!("No benchmark named '{}'; nothing to delete.", name);
            }
        }

        BenchmarkCommands::Export { name, output } => {
            let benchmark = tracker
                .find_by_name(&name)
                .ok_or_else(|| anyhow!("no benchmark named '{}'", name))?;
            let file = File::create(&output)?;
            carnet::export_benchmark_csv(benchmark, file)?;
            println!(
                "{} {} entries to {}",
                "✓ Exported".green().bold(),
                benchmark.entries.len(),
                output.display()
            );
        }
    }

    Ok(())
}

fn run_session(command: SessionCommands, store: &JsonStore, config: &AppConfig) -> Result<()> {
    match command {
        SessionCommands::Log { duration, rpe, category, date } => {
            if !(1..=10).contains(&rpe) {
                bail!("RPE must be between 1 and 10");
            }
            let date = date.unwrap_or_else(|| Local::now().date_naive());

            let mut sessions = store.load_sessions()?;
            let session = TrainingSession::new(date, duration, rpe, category);
            let load = carnet::session_load(duration, rpe);
            let calories =
                carnet::session_calories(duration, config.settings.body_weight_kg, category);

            sessions.push(session);
            store.save_sessions(&sessions)?;

            println!(
                "{} {} session, RPE {} ({}), load {}",
                "✓ Logged".green().bold(),
                category,
                rpe,
                carnet::rpe_label(rpe),
                load
            );
            match calories {
                Some(kcal) => println!("  Estimated {} kcal", kcal),
                None => println!("  Calories unknown (set body_weight_kg in the config)"),
            }
        }

        SessionCommands::Week => {
            let sessions = store.load_sessions()?;
            let today = Local::now().date_naive();
            let summary = carnet::weekly_summary(&sessions, today, &config.load);

            println!("{}", "Weekly training load".bold());
            println!(
                "  Total load: {}  ({} sessions, {} min)",
                summary.total_load, summary.session_count, summary.total_duration
            );
            println!("  Average RPE: {}", summary.average_rpe);
            println!("  Trend: {:?}", summary.trend);
            println!(
                "  Risk: {}",
                format!("{}", summary.risk).color(risk_terminal_color(summary.risk))
            );
            println!("  {}", summary.risk.advice());
        }
    }

    Ok(())
}

fn run_sleep(command: SleepCommands, store: &JsonStore) -> Result<()> {
    match command {
        SleepCommands::Log { duration, bed, wake, quality, date } => {
            if !(1..=5).contains(&quality) {
                bail!("sleep quality must be between 1 and 5");
            }
            let date = date.unwrap_or_else(|| Local::now().date_naive());

            let entry = match (duration, bed, wake) {
                (Some(text), _, _) => {
                    let minutes = parse_sleep_duration(&text)?;
                    SleepEntry::new(date, minutes, quality)
                }
                (None, Some(bed), Some(wake)) => SleepEntry::from_times(date, bed, wake, quality),
                _ => bail!("provide either --duration or both --bed and --wake"),
            };

            let mut entries = store.load_sleep_entries()?;
            // One entry per night: a relog replaces the previous one
            entries.retain(|e| e.date != date);
            let formatted = carnet::format_sleep_duration(entry.duration_minutes);
            entries.push(entry);
            store.save_sleep_entries(&entries)?;

            println!(
                "{} {} of sleep on {}, quality {}/5",
                "✓ Logged".green().bold(),
                formatted,
                date,
                quality
            );
        }

        SleepCommands::Stats => {
            let entries = store.load_sleep_entries()?;
            let goal = store.load_sleep_goal()?;
            let stats = carnet::sleep_stats(&entries, goal);
            let advice = carnet::sleep_advice(stats.sleep_debt_hours);
            let today = Local::now().date_naive();

            println!("{}", "Sleep".bold());
            println!(
                "  Goal: {}",
                carnet::format_sleep_duration(goal.minutes())
            );
            println!(
                "  Average: {} (quality {}/5)",
                carnet::format_sleep_duration(stats.average_duration.round() as u32),
                stats.average_quality
            );
            println!("  Debt (7 nights): {}h", stats.sleep_debt_hours);
            println!("  Trend: {}", stats.trend);
            println!(
                "  Streak: {} nights (best {})",
                carnet::current_goal_streak(&entries, goal, today),
                carnet::longest_goal_streak(&entries, goal)
            );

            let message = match advice.severity {
                carnet::SleepSeverity::Good => advice.message.green(),
                carnet::SleepSeverity::Warning => advice.message.yellow(),
                carnet::SleepSeverity::Danger => advice.message.red().bold(),
            };
            println!("  {}", message);
        }

        SleepCommands::Goal { minutes } => match minutes {
            Some(minutes) => {
                let goal = SleepGoal::new(minutes);
                store.save_sleep_goal(goal)?;
                println!(
                    "{} sleep goal set to {}",
                    "✓".green().bold(),
                    carnet::format_sleep_duration(goal.minutes())
                );
            }
            None => {
                let goal = store.load_sleep_goal()?;
                println!(
                    "Sleep goal: {}",
                    carnet::format_sleep_duration(goal.minutes())
                );
            }
        },

        SleepCommands::Export { output } => {
            let entries = store.load_sleep_entries()?;
            let file = File::create(&output)?;
            carnet::export_sleep_csv(&entries, file)?;
            println!(
                "{} {} nights to {}",
                "✓ Exported".green().bold(),
                entries.len(),
                output.display()
            );
        }
    }

    Ok(())
}

fn run_advise(store: &JsonStore, config: &AppConfig) -> Result<()> {
    let sessions = store.load_sessions()?;
    let now = Local::now();
    let window = ActivityWindow::new(
        now.date_naive(),
        &sessions,
        config.reminders.window_days,
    );
    let signals = carnet::evaluate(&window, &config.reminders, now.time());

    if signals.is_empty() {
        println!("{}", "Nothing to flag today. Keep going.".green());
        return Ok(());
    }

    for signal in signals {
        let text = match signal {
            carnet::ReminderSignal::MissedUsualTrainingDay => {
                "Today is usually a training day and nothing is logged yet."
            }
            carnet::ReminderSignal::FrequencyDeclining => {
                "Training frequency is dropping compared to the previous weeks."
            }
            carnet::ReminderSignal::RestDaySuggestion => {
                "Heavy week with no rest day. Consider taking one."
            }
        };
        println!("{} {}", "!".yellow().bold(), text);
    }

    Ok(())
}

fn parse_unit(input: &str) -> Result<Unit> {
    match input.to_lowercase().as_str() {
        "kg" => Ok(Unit::Kilograms),
        "lbs" => Ok(Unit::Pounds),
        "time" => Ok(Unit::Seconds),
        "reps" => Ok(Unit::Reps),
        "km" => Ok(Unit::Kilometers),
        other => bail!("unknown unit '{}' (expected kg, lbs, time, reps, km)", other),
    }
}

/// Parse an entry value; time-unit benchmarks accept clock formats.
fn parse_value(input: &str, unit: Unit) -> Result<f64> {
    if unit.family() == UnitFamily::Time {
        if let Some(seconds) = parse_time(input) {
            return Ok(seconds as f64);
        }
        bail!("could not parse '{}' as a time (use H:MM:SS or MM:SS)", input);
    }
    f64::from_str(input.trim())
        .map_err(|_| anyhow!("could not parse '{}' as a value in {}", input, unit))
}

/// Parse a sleep duration: `7:30` style or plain minutes.
fn parse_sleep_duration(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    if trimmed.contains(':') {
        let parts: Vec<&str> = trimmed.split(':').collect();
        if let [hours, minutes] = parts.as_slice() {
            let hours: u32 = hours.parse().context("invalid hours")?;
            let minutes: u32 = minutes.parse().context("invalid minutes")?;
            return Ok(hours * 60 + minutes);
        }
        bail!("could not parse '{}' as a sleep duration (use H:MM)", input);
    }
    trimmed
        .parse()
        .with_context(|| format!("could not parse '{}' as minutes", input))
}

fn risk_terminal_color(risk: carnet::RiskLevel) -> &'static str {
    match risk {
        carnet::RiskLevel::Safe => "green",
        carnet::RiskLevel::Moderate => "yellow",
        carnet::RiskLevel::High => "yellow",
        carnet::RiskLevel::Danger => "red",
    }
}
