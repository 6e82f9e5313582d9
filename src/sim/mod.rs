//! Tank simulation core: step engine, controllers, and daily records.

/// Pump controller seam and the PI implementation.
pub mod controller;
pub mod engine;
/// Fuzzy-logic pump controller.
pub mod fuzzy;
pub mod kpi;
/// Physical tank state.
pub mod tank;
pub mod types;
