//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::sim::types::{SAFE_FILL_FRACTION, TankConfig};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Controller selection and run parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Physical tank parameters.
    #[serde(default)]
    pub tank: TankSettings,
    /// Forecast source parameters.
    #[serde(default)]
    pub forecast: ForecastConfig,
}

/// Controller selection and run parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Controller: `"pi"`, `"fuzzy"`, or `"both"` for a side-by-side run.
    pub controller: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            controller: "pi".to_string(),
        }
    }
}

/// Physical tank parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TankSettings {
    /// Nominal tank capacity (L).
    pub capacity_liters: f64,
    /// Minimum level the pump defends (L).
    pub min_level_liters: f64,
    /// Household draw per day (L).
    pub daily_consumption_liters: f64,
    /// Rain-collecting roof area (m²).
    pub roof_area_m2: f64,
    /// Starting level (L); omitted means "start at the minimum level".
    pub initial_level_liters: Option<f64>,
}

impl Default for TankSettings {
    fn default() -> Self {
        Self {
            capacity_liters: 3000.0,
            min_level_liters: 500.0,
            daily_consumption_liters: 150.0,
            roof_area_m2: 100.0,
            initial_level_liters: None,
        }
    }
}

impl TankSettings {
    /// Builds the validated runtime configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] from [`TankConfig::new`].
    pub fn to_tank_config(&self) -> Result<TankConfig, ConfigError> {
        TankConfig::new(
            self.capacity_liters,
            self.min_level_liters,
            self.daily_consumption_liters,
            self.roof_area_m2,
            self.initial_level_liters,
        )
    }
}

/// Forecast source parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Forecast source: `"synthetic"` (seeded generator) or `"csv"`.
    pub source: String,
    /// CSV file with `date,rainfall_mm` columns; required for `"csv"`.
    pub csv_path: Option<String>,
    /// Number of days to generate for the synthetic source.
    pub days: usize,
    /// Seed for the synthetic generator.
    pub seed: u64,
    /// Chance in `[0, 1]` that a synthetic day sees rain.
    pub wet_day_probability: f64,
    /// Upper bound on a synthetic day's rainfall (mm).
    pub max_rain_mm: f64,
    /// First synthetic forecast date (`"YYYY-MM-DD"`); defaults to today.
    pub start_date: Option<NaiveDate>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            source: "synthetic".to_string(),
            csv_path: None,
            days: 30,
            seed: 42,
            wet_day_probability: 0.35,
            max_rain_mm: 24.0,
            start_date: None,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, Error)]
#[error("config error: {field} — {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tank.capacity_liters"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a family-sized tank in a temperate
    /// climate.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            tank: TankSettings::default(),
            forecast: ForecastConfig::default(),
        }
    }

    /// Returns the drought preset: barely any rain, pump carries the load.
    pub fn drought() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            tank: TankSettings {
                min_level_liters: 600.0,
                daily_consumption_liters: 200.0,
                roof_area_m2: 80.0,
                ..TankSettings::default()
            },
            forecast: ForecastConfig {
                wet_day_probability: 0.04,
                max_rain_mm: 8.0,
                ..ForecastConfig::default()
            },
        }
    }

    /// Returns the monsoon preset: frequent heavy rain, overflow stress.
    pub fn monsoon() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            tank: TankSettings {
                min_level_liters: 400.0,
                initial_level_liters: Some(2500.0),
                ..TankSettings::default()
            },
            forecast: ForecastConfig {
                wet_day_probability: 0.85,
                max_rain_mm: 48.0,
                ..ForecastConfig::default()
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "drought", "monsoon"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "drought" => Ok(Self::drought()),
            "monsoon" => Ok(Self::monsoon()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.controller != "pi" && s.controller != "fuzzy" && s.controller != "both" {
            errors.push(ConfigError::new(
                "simulation.controller",
                format!(
                    "must be \"pi\", \"fuzzy\" or \"both\", got \"{}\"",
                    s.controller
                ),
            ));
        }

        let t = &self.tank;
        if !t.capacity_liters.is_finite() || t.capacity_liters <= 0.0 {
            errors.push(ConfigError::new("tank.capacity_liters", "must be > 0"));
        } else {
            let max_level = t.capacity_liters * SAFE_FILL_FRACTION;
            if !t.min_level_liters.is_finite()
                || t.min_level_liters < 0.0
                || t.min_level_liters > max_level
            {
                errors.push(ConfigError::new(
                    "tank.min_level_liters",
                    "must be within [0, 95% of capacity]",
                ));
            }
        }
        if !t.daily_consumption_liters.is_finite() || t.daily_consumption_liters < 0.0 {
            errors.push(ConfigError::new(
                "tank.daily_consumption_liters",
                "must be >= 0",
            ));
        }
        if !t.roof_area_m2.is_finite() || t.roof_area_m2 < 0.0 {
            errors.push(ConfigError::new("tank.roof_area_m2", "must be >= 0"));
        }
        if let Some(initial) = t.initial_level_liters {
            if !initial.is_finite() {
                errors.push(ConfigError::new(
                    "tank.initial_level_liters",
                    "must be a finite number",
                ));
            }
        }

        let fc = &self.forecast;
        match fc.source.as_str() {
            "synthetic" => {
                if fc.days == 0 {
                    errors.push(ConfigError::new("forecast.days", "must be > 0"));
                }
                if !(0.0..=1.0).contains(&fc.wet_day_probability) {
                    errors.push(ConfigError::new(
                        "forecast.wet_day_probability",
                        "must be in [0.0, 1.0]",
                    ));
                }
                if !fc.max_rain_mm.is_finite() || fc.max_rain_mm < 0.0 {
                    errors.push(ConfigError::new("forecast.max_rain_mm", "must be >= 0"));
                }
            }
            "csv" => {
                if fc.csv_path.is_none() {
                    errors.push(ConfigError::new(
                        "forecast.csv_path",
                        "required when forecast.source is \"csv\"",
                    ));
                }
            }
            other => {
                errors.push(ConfigError::new(
                    "forecast.source",
                    format!("must be \"synthetic\" or \"csv\", got \"{other}\""),
                ));
            }
        }

        errors
    }
}
