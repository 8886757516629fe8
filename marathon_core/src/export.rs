//! CSV export of the plan and the training log.
//!
//! Rows are serde-derived structs written with the `csv` crate; the header
//! row comes from the field names.

use crate::format::day_name;
use crate::pace::log_entry_pace;
use crate::{LogsByDate, Plan, PlanDay, Result, TrainingLogEntry};
use std::fs::File;
use std::io;
use std::path::Path;

/// A row in the plan export
#[derive(Debug, serde::Serialize)]
struct PlanRow<'a> {
    week: u32,
    date: String,
    day: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    planned_km: f64,
    pace_hint: &'a str,
}

impl<'a> PlanRow<'a> {
    fn new(week: u32, day: &'a PlanDay) -> Self {
        PlanRow {
            week,
            date: day.date.to_string(),
            day: day_name(day.day_index),
            kind: day.kind.as_str(),
            planned_km: day.planned_km,
            pace_hint: &day.pace_hint,
        }
    }
}

/// A row in the log export
#[derive(Debug, serde::Serialize)]
struct LogRow<'a> {
    date: String,
    distance_km: f64,
    time_seconds: u32,
    pace: String,
    note: Option<&'a str>,
}

impl<'a> From<&'a TrainingLogEntry> for LogRow<'a> {
    fn from(entry: &'a TrainingLogEntry) -> Self {
        LogRow {
            date: entry.date.to_string(),
            distance_km: entry.distance_km,
            time_seconds: entry.time_seconds,
            pace: log_entry_pace(entry),
            note: entry.note.as_deref(),
        }
    }
}

/// Write one row per plan day; returns the number of rows written
pub fn write_plan_csv<W: io::Write>(plan: &Plan, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut count = 0;

    for week in &plan.weeks {
        for day in &week.days {
            csv_writer.serialize(PlanRow::new(week.week_number, day))?;
            count += 1;
        }
    }

    csv_writer.flush()?;
    Ok(count)
}

/// Write one row per log entry, oldest first; returns the number of rows written
pub fn write_logs_csv<W: io::Write>(logs: &LogsByDate, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for entry in logs.values() {
        csv_writer.serialize(LogRow::from(entry))?;
    }

    csv_writer.flush()?;
    Ok(logs.len())
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// Export the plan to a CSV file, creating parent directories
pub fn export_plan_csv(plan: &Plan, path: &Path) -> Result<usize> {
    let count = write_plan_csv(plan, create_file(path)?)?;
    tracing::info!("Exported {} plan days to {:?}", count, path);
    Ok(count)
}

/// Export the log to a CSV file, creating parent directories
pub fn export_logs_csv(logs: &LogsByDate, path: &Path) -> Result<usize> {
    let count = write_logs_csv(logs, create_file(path)?)?;
    tracing::info!("Exported {} log entries to {:?}", count, path);
    Ok(count)
}
