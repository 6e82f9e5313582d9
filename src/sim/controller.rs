//! Pump controllers deciding how much municipal water to request.

/// Proportional gain for the PI pump controller.
const KP: f64 = 0.8;

/// Integral gain for the PI pump controller.
const KI: f64 = 0.1;

/// Strategy seam between the daily step engine and a pump controller.
///
/// The engine consults the controller once per day: [`pump_request`] on a
/// deficit day, [`tank_satisfied`] otherwise. When the tank could not store
/// the full request, the shortfall comes back through
/// [`absorb_unfulfilled`]. Controllers that carry no state across days keep
/// the default no-op callbacks.
///
/// [`pump_request`]: ControllerStrategy::pump_request
/// [`tank_satisfied`]: ControllerStrategy::tank_satisfied
/// [`absorb_unfulfilled`]: ControllerStrategy::absorb_unfulfilled
pub trait ControllerStrategy {
    /// Volume to pump today (L, >= 0) given the deficit below the minimum
    /// level and the day's forecast rainfall.
    fn pump_request(&mut self, deficit_l: f64, rainfall_mm: f64) -> f64;

    /// The tank ended the day's inflows at or above its minimum level.
    fn tank_satisfied(&mut self) {}

    /// Part of the last request did not fit in the tank.
    fn absorb_unfulfilled(&mut self, _unfulfilled_l: f64) {}

    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;
}

/// Proportional-integral pump controller with anti-windup.
///
/// Accumulates the deficit while the tank is short and resets the integral
/// term on any satisfied day, so a healthy tank never carries wound-up
/// demand into the next dry spell.
#[derive(Debug, Default, Clone)]
pub struct PiController {
    integral_error_l: f64,
}

impl PiController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated integral error (L), exposed for diagnostics.
    pub fn integral_error(&self) -> f64 {
        self.integral_error_l
    }
}

impl ControllerStrategy for PiController {
    fn pump_request(&mut self, deficit_l: f64, _rainfall_mm: f64) -> f64 {
        self.integral_error_l += deficit_l;
        (KP * deficit_l + KI * self.integral_error_l).max(0.0)
    }

    fn tank_satisfied(&mut self) {
        self.integral_error_l = 0.0;
    }

    /// Anti-windup: drop the portion of the request the tank had no space
    /// for, so the integral term never accumulates credit for water that
    /// could not be stored.
    fn absorb_unfulfilled(&mut self, unfulfilled_l: f64) {
        self.integral_error_l -= unfulfilled_l;
    }

    fn name(&self) -> &'static str {
        "pi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_deficit_requests_nothing() {
        let mut pi = PiController::new();
        assert_eq!(pi.pump_request(0.0, 0.0), 0.0);
        assert_eq!(pi.name(), "pi");
    }

    #[test]
    fn first_deficit_day_combines_both_terms() {
        let mut pi = PiController::new();
        // Kp*150 + Ki*150 = 120 + 15
        assert_eq!(pi.pump_request(150.0, 0.0), 135.0);
    }

    #[test]
    fn integral_accumulates_across_deficit_days() {
        let mut pi = PiController::new();
        let first = pi.pump_request(150.0, 0.0);
        let second = pi.pump_request(150.0, 0.0);
        assert!(second > first, "{second} should exceed {first}");
        assert_eq!(second, 150.0); // 120 + 0.1 * 300
    }

    #[test]
    fn satisfied_day_resets_integral() {
        let mut pi = PiController::new();
        pi.pump_request(150.0, 0.0);
        pi.tank_satisfied();
        assert_eq!(pi.integral_error(), 0.0);
        assert_eq!(pi.pump_request(150.0, 0.0), 135.0);
    }

    #[test]
    fn anti_windup_leaves_integral_strictly_smaller() {
        let mut corrected = PiController::new();
        let mut uncorrected = PiController::new();

        corrected.pump_request(100.0, 0.0);
        uncorrected.pump_request(100.0, 0.0);
        corrected.absorb_unfulfilled(20.0);

        assert!(corrected.integral_error() < uncorrected.integral_error());
        // Next request reflects the correction: 80 + 0.1*180 vs 80 + 0.1*200.
        assert_eq!(corrected.pump_request(100.0, 0.0), 98.0);
        assert_eq!(uncorrected.pump_request(100.0, 0.0), 100.0);
    }

    #[test]
    fn rainfall_input_does_not_change_the_decision() {
        let mut dry = PiController::new();
        let mut wet = PiController::new();
        assert_eq!(dry.pump_request(150.0, 0.0), wet.pump_request(150.0, 42.0));
    }

    #[test]
    fn negative_raw_output_clamps_to_zero() {
        let mut pi = PiController::new();
        pi.absorb_unfulfilled(10_000.0); // drive the integral deep negative
        assert_eq!(pi.pump_request(10.0, 0.0), 0.0);
    }
}
