//! Post-hoc KPI computation from a completed run.

use std::fmt;

use serde::Serialize;

use super::types::DailyRecord;

/// Aggregate indicators derived from a run's daily records.
///
/// Computed post-hoc from the record sequence so the report can never
/// disagree with the per-day data it summarizes.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    /// Total potential roof collection (L).
    pub total_rain_collected_l: f64,
    /// Total municipal water pumped in (L).
    pub total_pumped_l: f64,
    /// Total water lost over the safety maximum (L).
    pub total_overflow_l: f64,
    /// Total configured household draw (L).
    pub total_consumption_l: f64,
    /// Days on which the pump ran.
    pub pump_day_count: usize,
    /// Lowest end-of-day level seen (L).
    pub min_level_l: f64,
    /// Level at the end of the final day (L).
    pub final_level_l: f64,
}

impl KpiReport {
    /// Computes all KPIs from the complete daily record sequence.
    pub fn from_records(records: &[DailyRecord]) -> Self {
        let mut total_collected = 0.0;
        let mut total_pumped = 0.0;
        let mut total_overflow = 0.0;
        let mut total_consumption = 0.0;
        let mut pump_days = 0_usize;
        let mut min_level = f64::INFINITY;

        for r in records {
            total_collected += r.rain_collected;
            total_pumped += r.pumped_in;
            total_overflow += r.overflow_lost;
            total_consumption += r.consumption;
            if r.pumped_in > 0.0 {
                pump_days += 1;
            }
            min_level = min_level.min(r.water_level_end_of_day);
        }

        Self {
            total_rain_collected_l: total_collected,
            total_pumped_l: total_pumped,
            total_overflow_l: total_overflow,
            total_consumption_l: total_consumption,
            pump_day_count: pump_days,
            min_level_l: if records.is_empty() { 0.0 } else { min_level },
            final_level_l: records.last().map_or(0.0, |r| r.water_level_end_of_day),
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Water Balance ---")?;
        writeln!(f, "Rain collected:   {:>10.2} L", self.total_rain_collected_l)?;
        writeln!(f, "Municipal pumped: {:>10.2} L", self.total_pumped_l)?;
        writeln!(f, "Overflow lost:    {:>10.2} L", self.total_overflow_l)?;
        writeln!(f, "Consumed:         {:>10.2} L", self.total_consumption_l)?;
        writeln!(f, "Pump days:        {:>10}", self.pump_day_count)?;
        writeln!(f, "Lowest level:     {:>10.2} L", self.min_level_l)?;
        write!(f, "Final level:      {:>10.2} L", self.final_level_l)
    }
}
