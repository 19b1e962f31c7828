//! CSV export of tracked histories.

use std::io::Write;
use thiserror::Error;

use crate::models::{Benchmark, SleepEntry};
use crate::units::format_value;

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the sleep history as CSV, most recent night first.
pub fn export_sleep_csv<W: Write>(entries: &[SleepEntry], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record([
        "date",
        "bed_time",
        "wake_time",
        "duration_hours",
        "quality",
        "note",
    ])?;

    let mut sorted: Vec<&SleepEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    for entry in sorted {
        csv_writer.write_record([
            entry.date.format("%Y-%m-%d").to_string(),
            entry
                .bed_time
                .map_or(String::new(), |t| t.format("%H:%M").to_string()),
            entry
                .wake_time
                .map_or(String::new(), |t| t.format("%H:%M").to_string()),
            format!("{:.1}", entry.duration_minutes as f64 / 60.0),
            entry.quality.to_string(),
            entry.note.clone().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write one benchmark's entry history as CSV, most recent entry first.
pub fn export_benchmark_csv<W: Write>(
    benchmark: &Benchmark,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(["date", "value", "formatted", "reps", "note"])?;

    for entry in benchmark.entries_sorted_desc() {
        csv_writer.write_record([
            entry.date.format("%Y-%m-%d").to_string(),
            entry.value.to_string(),
            format_value(entry.value, benchmark.unit),
            entry.reps.map_or(String::new(), |r| r.to_string()),
            entry.note.clone().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
