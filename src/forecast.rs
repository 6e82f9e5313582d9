//! Rainfall forecast inputs: validated sequences, CSV ingestion, and a
//! seeded synthetic generator for runs without a weather provider.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Days, NaiveDate};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One forecast day: a calendar date and the expected rainfall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    /// Calendar day the rainfall applies to.
    pub date: NaiveDate,
    /// Expected rainfall (mm, >= 0).
    pub rainfall_mm: f64,
}

/// Forecast input that could not be accepted.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The sequence contained no days at all.
    #[error("forecast is empty; at least one day is required")]
    Empty,
    /// A rainfall amount was negative or not a number.
    #[error("day {index}: rainfall {value} mm is not a valid amount")]
    InvalidRainfall { index: usize, value: f64 },
    /// The forecast file could not be read.
    #[error("failed to read forecast: {0}")]
    Io(#[from] std::io::Error),
    /// A CSV row could not be parsed into a forecast day.
    #[error("failed to parse forecast CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Ordered, validated rainfall forecast.
///
/// Day index equals sequence position; the constructor rejects empty input
/// and any negative or non-finite rainfall, so the simulation never has to
/// re-check the data day by day.
#[derive(Debug, Clone, PartialEq)]
pub struct RainfallForecast {
    days: Vec<DayForecast>,
}

impl RainfallForecast {
    /// Validates and wraps an ordered day sequence.
    ///
    /// # Errors
    ///
    /// [`ForecastError::Empty`] for a zero-length sequence,
    /// [`ForecastError::InvalidRainfall`] for the first offending value.
    pub fn new(days: Vec<DayForecast>) -> Result<Self, ForecastError> {
        if days.is_empty() {
            return Err(ForecastError::Empty);
        }
        for (index, day) in days.iter().enumerate() {
            if !day.rainfall_mm.is_finite() || day.rainfall_mm < 0.0 {
                return Err(ForecastError::InvalidRainfall {
                    index,
                    value: day.rainfall_mm,
                });
            }
        }
        Ok(Self { days })
    }

    /// The ordered day sequence.
    pub fn days(&self) -> &[DayForecast] {
        &self.days
    }

    /// Number of forecast days (not yet clamped to the simulation horizon).
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always false: construction rejects empty sequences.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Parses a forecast from CSV with `date,rainfall_mm` columns.
    ///
    /// # Errors
    ///
    /// I/O and parse failures map to [`ForecastError`]; the parsed sequence
    /// then goes through the same validation as [`RainfallForecast::new`].
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, ForecastError> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
        let mut days = Vec::new();
        for row in rdr.deserialize::<DayForecast>() {
            days.push(row?);
        }
        Self::new(days)
    }

    /// Reads and parses a forecast CSV file.
    pub fn from_csv_path(path: &Path) -> Result<Self, ForecastError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }
}

/// Seeded synthetic rainfall generator.
///
/// Stands in for the external weather provider in presets, demos, and
/// tests: each day is wet with the configured probability, and wet-day
/// amounts are skewed toward light rain. Identical seeds produce identical
/// forecasts.
#[derive(Debug, Clone)]
pub struct SyntheticRainfall {
    wet_day_probability: f64,
    max_rain_mm: f64,
    rng: StdRng,
}

impl SyntheticRainfall {
    /// Creates a generator.
    ///
    /// # Arguments
    ///
    /// * `wet_day_probability` - Chance in `[0, 1]` that a day sees rain
    /// * `max_rain_mm` - Upper bound on a single day's rainfall
    /// * `seed` - RNG seed for reproducible forecasts
    pub fn new(wet_day_probability: f64, max_rain_mm: f64, seed: u64) -> Self {
        Self {
            wet_day_probability,
            max_rain_mm,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates `days` consecutive forecast days starting at `start`.
    ///
    /// `days` must be at least 1; the result always passes forecast
    /// validation since generated amounts are non-negative and finite.
    pub fn generate(&mut self, start: NaiveDate, days: usize) -> Result<RainfallForecast, ForecastError> {
        let mut sequence = Vec::with_capacity(days);
        for i in 0..days {
            let wet = self.rng.random::<f64>() < self.wet_day_probability;
            let rainfall_mm = if wet {
                // Squaring skews toward drizzle; downpours stay rare.
                self.rng.random::<f64>().powi(2) * self.max_rain_mm
            } else {
                0.0
            };
            sequence.push(DayForecast {
                date: start + Days::new(i as u64),
                rainfall_mm,
            });
        }
        RainfallForecast::new(sequence)
    }
}
