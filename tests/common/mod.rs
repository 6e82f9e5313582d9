//! Shared test fixtures for integration tests.

use chrono::{Days, NaiveDate};

use raintank_sim::forecast::{DayForecast, RainfallForecast};
use raintank_sim::sim::types::TankConfig;

/// First forecast date used across the integration suites.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

/// Default tank (3000 L, 500 L minimum, 150 L/day draw, 100 m² roof),
/// starting exactly at the minimum level.
pub fn default_tank() -> TankConfig {
    TankConfig::new(3000.0, 500.0, 150.0, 100.0, Some(500.0)).unwrap()
}

/// Forecast of consecutive days with the given rainfall amounts.
pub fn forecast_from(amounts: &[f64]) -> RainfallForecast {
    let days: Vec<DayForecast> = amounts
        .iter()
        .enumerate()
        .map(|(i, &rainfall_mm)| DayForecast {
            date: start_date() + Days::new(i as u64),
            rainfall_mm,
        })
        .collect();
    RainfallForecast::new(days).unwrap()
}

/// Forecast of `days` consecutive completely dry days.
pub fn dry_forecast(days: usize) -> RainfallForecast {
    forecast_from(&vec![0.0; days])
}
