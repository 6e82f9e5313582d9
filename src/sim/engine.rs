//! Daily step engine applying consumption, collection, overflow, and pumping.

use crate::forecast::{DayForecast, RainfallForecast};

use super::controller::ControllerStrategy;
use super::tank::Tank;
use super::types::{DailyRecord, MAX_SIMULATION_DAYS, TankConfig, round2};

/// Simulation engine owning the tank state and the pump controller.
///
/// Generic over `C: ControllerStrategy` for static dispatch. The engine
/// enforces physical limits and the fixed per-day causality; it never
/// decides how much to pump, only how much of a request the tank can take.
pub struct Engine<C: ControllerStrategy> {
    config: TankConfig,
    tank: Tank,
    controller: C,
}

impl<C: ControllerStrategy> Engine<C> {
    /// Creates an engine with the tank at the configured starting level.
    pub fn new(config: TankConfig, controller: C) -> Self {
        let tank = Tank::new(config.starting_level(), config.max_level());
        Self {
            config,
            tank,
            controller,
        }
    }

    /// Executes one simulated day and returns its record.
    ///
    /// The order is the physical causality the model asserts: the household
    /// draws first, rain lands on the roof, the tank sheds anything above
    /// the safe maximum, and only then may the pump top the level back up
    /// to the configured minimum.
    pub fn step(&mut self, day: &DayForecast) -> DailyRecord {
        // 1. Household draw; the tank clamps at empty and unmet draw is
        //    absorbed without a separate shortage report.
        let consumed = self.config.daily_consumption_liters;
        self.tank.draw(consumed);

        // 2. Roof collection: 1 mm over 1 m² is 1 L.
        let collected = day.rainfall_mm * self.config.roof_area_m2;
        self.tank.fill(collected);

        // 3. Shed anything above the safe maximum before the pump decision.
        let overflow = self.tank.clip_overflow();

        // 4. Consult the controller only when the tank is short; a satisfied
        //    day still reaches the controller so stateful strategies can
        //    unwind.
        let mut pumped = 0.0;
        if self.tank.level() < self.config.min_level_liters {
            let deficit = self.config.min_level_liters - self.tank.level();
            let requested = self.controller.pump_request(deficit, day.rainfall_mm);

            // 5. The tank clamps the request to its headspace, so pumping can
            //    never cause new overflow; the shortfall goes back to the
            //    controller.
            pumped = self.tank.pump_in(requested);
            if pumped < requested {
                self.controller.absorb_unfulfilled(requested - pumped);
            }
        } else {
            self.controller.tank_satisfied();
        }

        // 6. Report in liters at two decimals; internal state keeps full
        //    precision.
        DailyRecord {
            date: day.date,
            water_level_end_of_day: round2(self.tank.level()),
            rainfall_mm: round2(day.rainfall_mm),
            consumption: round2(consumed),
            rain_collected: round2(collected),
            pumped_in: round2(pumped),
            overflow_lost: round2(overflow),
        }
    }

    /// Runs the bounded horizon and returns one record per simulated day.
    pub fn run(&mut self, forecast: &RainfallForecast) -> Vec<DailyRecord> {
        let horizon = forecast.len().min(MAX_SIMULATION_DAYS);
        let mut records = Vec::with_capacity(horizon);
        for day in &forecast.days()[..horizon] {
            records.push(self.step(day));
        }
        records
    }

    /// Returns the tank configuration this engine runs against.
    pub fn config(&self) -> &TankConfig {
        &self.config
    }
}
