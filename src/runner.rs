//! Top-level run entry points: one controller, or both side by side.

use serde::Serialize;
use tracing::info;

use crate::forecast::RainfallForecast;
use crate::sim::controller::PiController;
use crate::sim::engine::Engine;
use crate::sim::fuzzy::FuzzyController;
use crate::sim::types::{DailyRecord, TankConfig};

/// Concrete controller selection for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerKind {
    Pi,
    Fuzzy,
}

impl ControllerKind {
    /// Parses a controller name as used in scenario files and the CLI.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Self::Pi),
            "fuzzy" => Some(Self::Fuzzy),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::Fuzzy => "fuzzy",
        }
    }
}

/// Output of a side-by-side PI vs fuzzy comparison over identical inputs.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub pi_results: Vec<DailyRecord>,
    pub fuzzy_results: Vec<DailyRecord>,
}

/// Runs one simulation with the chosen controller.
///
/// Controller state lives and dies inside this call, so repeated runs over
/// the same config and forecast always produce the same record sequence.
pub fn run_simulation(
    config: &TankConfig,
    forecast: &RainfallForecast,
    kind: ControllerKind,
) -> Vec<DailyRecord> {
    let records = match kind {
        ControllerKind::Pi => Engine::new(config.clone(), PiController::new()).run(forecast),
        ControllerKind::Fuzzy => {
            Engine::new(config.clone(), FuzzyController::new(config.capacity_liters)).run(forecast)
        }
    };
    info!(
        controller = kind.name(),
        days = records.len(),
        "simulation run complete"
    );
    records
}

/// Runs both controllers independently over the same config and forecast.
pub fn run_comparison(config: &TankConfig, forecast: &RainfallForecast) -> ComparisonResult {
    ComparisonResult {
        pi_results: run_simulation(config, forecast, ControllerKind::Pi),
        fuzzy_results: run_simulation(config, forecast, ControllerKind::Fuzzy),
    }
}
