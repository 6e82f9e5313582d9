//! Core simulation types: tank configuration and the per-day record.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Hard cap on the number of simulated days, whatever the forecast length.
pub const MAX_SIMULATION_DAYS: usize = 30;

/// Fraction of nominal capacity usable before the safety overflow engages.
pub const SAFE_FILL_FRACTION: f64 = 0.95;

/// Validated physical description of one tank installation.
///
/// Immutable once constructed; a simulation run never mutates it. The safe
/// maximum level is always derived from capacity, never stored, so the two
/// cannot drift apart.
///
/// # Examples
///
/// ```
/// use raintank_sim::sim::types::TankConfig;
///
/// let cfg = TankConfig::new(3000.0, 500.0, 150.0, 100.0, None).unwrap();
/// assert_eq!(cfg.max_level(), 2850.0);
/// assert_eq!(cfg.starting_level(), 500.0);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct TankConfig {
    /// Nominal tank capacity (L).
    pub capacity_liters: f64,
    /// Target floor the controller defends (L).
    pub min_level_liters: f64,
    /// Household draw per simulated day (L).
    pub daily_consumption_liters: f64,
    /// Rain-collecting roof area (m²); 1 mm over 1 m² yields 1 L.
    pub roof_area_m2: f64,
    /// Level at the start of day one (L); defaults to the minimum level.
    pub initial_level_liters: Option<f64>,
}

impl TankConfig {
    /// Builds a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending field when a value is
    /// non-finite or out of range, including a minimum level above the safe
    /// maximum (contradictory input, never silently clipped).
    pub fn new(
        capacity_liters: f64,
        min_level_liters: f64,
        daily_consumption_liters: f64,
        roof_area_m2: f64,
        initial_level_liters: Option<f64>,
    ) -> Result<Self, ConfigError> {
        if !capacity_liters.is_finite() || capacity_liters <= 0.0 {
            return Err(ConfigError::new(
                "tank.capacity_liters",
                "must be a finite number > 0",
            ));
        }
        let max_level = capacity_liters * SAFE_FILL_FRACTION;
        if !min_level_liters.is_finite() || min_level_liters < 0.0 || min_level_liters > max_level {
            return Err(ConfigError::new(
                "tank.min_level_liters",
                format!("must be within [0, {max_level}] (95% of capacity)"),
            ));
        }
        if !daily_consumption_liters.is_finite() || daily_consumption_liters < 0.0 {
            return Err(ConfigError::new(
                "tank.daily_consumption_liters",
                "must be a finite number >= 0",
            ));
        }
        if !roof_area_m2.is_finite() || roof_area_m2 < 0.0 {
            return Err(ConfigError::new(
                "tank.roof_area_m2",
                "must be a finite number >= 0",
            ));
        }
        if let Some(initial) = initial_level_liters {
            if !initial.is_finite() {
                return Err(ConfigError::new(
                    "tank.initial_level_liters",
                    "must be a finite number",
                ));
            }
        }

        Ok(Self {
            capacity_liters,
            min_level_liters,
            daily_consumption_liters,
            roof_area_m2,
            initial_level_liters,
        })
    }

    /// Safe maximum level: 95% of nominal capacity, recomputed on demand.
    pub fn max_level(&self) -> f64 {
        self.capacity_liters * SAFE_FILL_FRACTION
    }

    /// Day-one level, clamped into `[0, max_level]`.
    pub fn starting_level(&self) -> f64 {
        self.initial_level_liters
            .unwrap_or(self.min_level_liters)
            .clamp(0.0, self.max_level())
    }
}

/// Complete report of one simulated day.
///
/// All volume fields are liters rounded to two decimal places at record
/// construction; internal simulation state keeps full precision.
/// `rain_collected` reports the full potential roof collection even when
/// overflow immediately discards part of it, matching what downstream
/// consumers historically charted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar day this record describes.
    pub date: NaiveDate,
    /// Tank level at end of day (L), always within `[0, max_level]`.
    pub water_level_end_of_day: f64,
    /// Forecast rainfall for the day (mm).
    pub rainfall_mm: f64,
    /// Configured household draw (L); unmet draw on an empty tank is not
    /// reported separately.
    pub consumption: f64,
    /// Potential roof collection for the day (L).
    pub rain_collected: f64,
    /// Municipal water actually pumped in (L).
    pub pumped_in: f64,
    /// Water lost over the safety maximum (L).
    pub overflow_lost: f64,
}

impl fmt::Display for DailyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | level={:>9.2} L | rain={:>5.1} mm | collected={:>8.2} L | \
             pumped={:>8.2} L | overflow={:>8.2} L",
            self.date,
            self.water_level_end_of_day,
            self.rainfall_mm,
            self.rain_collected,
            self.pumped_in,
            self.overflow_lost,
        )
    }
}

/// Rounds a reported volume to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_derives_max_level() {
        let cfg = TankConfig::new(3000.0, 500.0, 150.0, 100.0, None).unwrap();
        assert_eq!(cfg.max_level(), 2850.0);
    }

    #[test]
    fn rejects_non_positive_capacity() {
        let err = TankConfig::new(0.0, 0.0, 0.0, 0.0, None).unwrap_err();
        assert_eq!(err.field, "tank.capacity_liters");
    }

    #[test]
    fn rejects_nan_capacity() {
        let err = TankConfig::new(f64::NAN, 0.0, 0.0, 0.0, None).unwrap_err();
        assert_eq!(err.field, "tank.capacity_liters");
    }

    #[test]
    fn rejects_min_level_above_safe_maximum() {
        // 2900 L > 95% of 3000 L: contradictory input, not a clipping case.
        let err = TankConfig::new(3000.0, 2900.0, 150.0, 100.0, None).unwrap_err();
        assert_eq!(err.field, "tank.min_level_liters");
    }

    #[test]
    fn rejects_negative_consumption_and_roof() {
        let err = TankConfig::new(3000.0, 500.0, -1.0, 100.0, None).unwrap_err();
        assert_eq!(err.field, "tank.daily_consumption_liters");
        let err = TankConfig::new(3000.0, 500.0, 150.0, -1.0, None).unwrap_err();
        assert_eq!(err.field, "tank.roof_area_m2");
    }

    #[test]
    fn min_level_equal_to_max_level_is_allowed() {
        let cfg = TankConfig::new(1000.0, 950.0, 100.0, 50.0, None);
        assert!(cfg.is_ok());
    }

    #[test]
    fn starting_level_defaults_to_minimum() {
        let cfg = TankConfig::new(3000.0, 500.0, 150.0, 100.0, None).unwrap();
        assert_eq!(cfg.starting_level(), 500.0);
    }

    #[test]
    fn starting_level_clamps_into_physical_range() {
        let over = TankConfig::new(3000.0, 500.0, 150.0, 100.0, Some(9000.0)).unwrap();
        assert_eq!(over.starting_level(), 2850.0);
        let under = TankConfig::new(3000.0, 500.0, 150.0, 100.0, Some(-25.0)).unwrap();
        assert_eq!(under.starting_level(), 0.0);
    }

    #[test]
    fn round2_reporting_precision() {
        assert_eq!(round2(484.9999), 485.0);
        assert_eq!(round2(163.5), 163.5);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn record_display_does_not_panic() {
        let r = DailyRecord {
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            water_level_end_of_day: 485.0,
            rainfall_mm: 0.0,
            consumption: 150.0,
            rain_collected: 0.0,
            pumped_in: 135.0,
            overflow_lost: 0.0,
        };
        let s = format!("{r}");
        assert!(s.contains("2026-03-01"));
    }
}
