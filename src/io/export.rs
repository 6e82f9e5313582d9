//! CSV and JSON export of simulation daily records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::runner::ComparisonResult;
use crate::sim::types::DailyRecord;

/// Column header for CSV daily-record export.
const HEADER: &str = "date,water_level_end_of_day_l,rainfall_mm,consumption_l,\
                      rain_collected_l,pumped_in_l,overflow_lost_l";

/// Exports daily records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per simulated day.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[DailyRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes daily records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[DailyRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.date.to_string(),
            format!("{:.2}", r.water_level_end_of_day),
            format!("{:.2}", r.rainfall_mm),
            format!("{:.2}", r.consumption),
            format!("{:.2}", r.rain_collected),
            format!("{:.2}", r.pumped_in),
            format!("{:.2}", r.overflow_lost),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes daily records as pretty JSON, keyed for idempotent upsert by date
/// downstream.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_json(records: &[DailyRecord], writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, records).map_err(io::Error::from)
}

/// Writes a PI-vs-fuzzy comparison as pretty JSON.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_comparison_json(comparison: &ComparisonResult, writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, comparison).map_err(io::Error::from)
}

/// Exports daily records to a JSON file at the given path.
pub fn export_json(records: &[DailyRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_json(records, io::BufWriter::new(file))
}

/// Exports a comparison to a JSON file at the given path.
pub fn export_comparison_json(comparison: &ComparisonResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_comparison_json(comparison, io::BufWriter::new(file))
}
