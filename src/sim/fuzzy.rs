//! Fuzzy-logic pump controller built from linguistic rules.
//!
//! Inference is classic max–min composition over triangular membership
//! functions with centroid defuzzification. Deficit and pump universes
//! scale with tank capacity so one rule base serves every installation;
//! rainfall is judged on a fixed 0–50 mm universe.

use thiserror::Error;
use tracing::warn;

use super::controller::ControllerStrategy;

/// Sampling intervals for the centroid integration of the aggregated output.
const CENTROID_SAMPLES: usize = 600;

/// Pump universe as a fraction of capacity: `[0, 0.3 * capacity]`.
const PUMP_DOMAIN_FRACTION: f64 = 0.3;

const SMALL: usize = 0;
const MEDIUM: usize = 1;
const LARGE: usize = 2;

const NONE: usize = 0;
const LIGHT: usize = 1;
const HEAVY: usize = 2;

const PUMP_NONE: usize = 0;
const PUMP_LITTLE: usize = 1;
const PUMP_MUCH: usize = 2;

/// Rule base: `(deficit term, rainfall term) -> pump term`.
///
/// | deficit | rainfall | pump   |
/// |---------|----------|--------|
/// | large   | none     | much   |
/// | medium  | light    | little |
/// | small   | heavy    | none   |
/// | small   | none     | little |
/// | medium  | none     | much   |
/// | large   | light    | little |
const RULES: [(usize, usize, usize); 6] = [
    (LARGE, NONE, PUMP_MUCH),
    (MEDIUM, LIGHT, PUMP_LITTLE),
    (SMALL, HEAVY, PUMP_NONE),
    (SMALL, NONE, PUMP_LITTLE),
    (MEDIUM, NONE, PUMP_MUCH),
    (LARGE, LIGHT, PUMP_LITTLE),
];

/// Triangular membership function over `[a, c]` peaking at `b`.
///
/// Boundary terms put the peak on the universe edge (`b == a` or `b == c`),
/// so e.g. zero rainfall is fully "none". Outside `[a, c]` the grade is 0.
#[derive(Debug, Clone, Copy)]
struct Triangle {
    a: f64,
    b: f64,
    c: f64,
}

impl Triangle {
    const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    fn scaled(self, factor: f64) -> Self {
        Self {
            a: self.a * factor,
            b: self.b * factor,
            c: self.c * factor,
        }
    }

    fn grade(&self, x: f64) -> f64 {
        if x < self.a || x > self.c {
            return 0.0;
        }
        if x <= self.b {
            if self.b == self.a {
                1.0
            } else {
                (x - self.a) / (self.b - self.a)
            }
        } else if self.c == self.b {
            1.0
        } else {
            (self.c - x) / (self.c - self.b)
        }
    }
}

/// Deficit terms small/medium/large as capacity fractions.
const DEFICIT_TERMS: [Triangle; 3] = [
    Triangle::new(0.0, 0.0, 0.1),
    Triangle::new(0.05, 0.15, 0.25),
    Triangle::new(0.2, 0.5, 0.5),
];

/// Rainfall terms none/light/heavy (mm).
const RAIN_TERMS: [Triangle; 3] = [
    Triangle::new(0.0, 0.0, 5.0),
    Triangle::new(2.0, 11.0, 20.0),
    Triangle::new(15.0, 50.0, 50.0),
];

/// Pump terms none/little/much as capacity fractions.
const PUMP_TERMS: [Triangle; 3] = [
    Triangle::new(0.0, 0.0, 0.01),
    Triangle::new(0.005, 0.0525, 0.1),
    Triangle::new(0.08, 0.3, 0.3),
];

/// Inference produced no defined pump amount for the given inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    /// Inputs fell outside every rule's membership support.
    #[error("no rule fired for deficit {deficit_l:.1} L, rainfall {rainfall_mm:.1} mm")]
    NoRuleFired { deficit_l: f64, rainfall_mm: f64 },
    /// The aggregated output carried no mass to take a centroid of.
    #[error("degenerate pump aggregate for deficit {deficit_l:.1} L, rainfall {rainfall_mm:.1} mm")]
    EmptyAggregate { deficit_l: f64, rainfall_mm: f64 },
}

/// Stateless rule-based pump controller.
///
/// Carries nothing from one day to the next; each decision depends only on
/// today's deficit and forecast rainfall. An inference failure is recovered
/// locally: the day pumps nothing and the run continues.
#[derive(Debug, Clone)]
pub struct FuzzyController {
    deficit_terms: [Triangle; 3],
    rain_terms: [Triangle; 3],
    pump_terms: [Triangle; 3],
    pump_domain_l: f64,
}

impl FuzzyController {
    /// Builds the controller with universes scaled to the tank capacity.
    pub fn new(capacity_liters: f64) -> Self {
        Self {
            deficit_terms: [
                DEFICIT_TERMS[0].scaled(capacity_liters),
                DEFICIT_TERMS[1].scaled(capacity_liters),
                DEFICIT_TERMS[2].scaled(capacity_liters),
            ],
            rain_terms: RAIN_TERMS,
            pump_terms: [
                PUMP_TERMS[0].scaled(capacity_liters),
                PUMP_TERMS[1].scaled(capacity_liters),
                PUMP_TERMS[2].scaled(capacity_liters),
            ],
            pump_domain_l: capacity_liters * PUMP_DOMAIN_FRACTION,
        }
    }

    /// Runs max–min inference and centroid defuzzification.
    ///
    /// A deficit of zero or less means nothing to pump. Inputs outside all
    /// membership supports (a deficit beyond half the capacity, say) fire no
    /// rule and yield an [`InferenceError`] for the caller to recover from.
    pub fn infer(&self, deficit_l: f64, rainfall_mm: f64) -> Result<f64, InferenceError> {
        if deficit_l <= 0.0 {
            return Ok(0.0);
        }

        let deficit_grades = self.deficit_terms.map(|t| t.grade(deficit_l));
        let rain_grades = self.rain_terms.map(|t| t.grade(rainfall_mm));

        let strengths =
            RULES.map(|(d, r, _)| deficit_grades[d].min(rain_grades[r]));
        if strengths.iter().all(|&s| s == 0.0) {
            return Err(InferenceError::NoRuleFired {
                deficit_l,
                rainfall_mm,
            });
        }

        // Centroid of the max-aggregated, strength-clipped output terms.
        let step = self.pump_domain_l / CENTROID_SAMPLES as f64;
        let mut moment = 0.0;
        let mut area = 0.0;
        for i in 0..=CENTROID_SAMPLES {
            let y = step * i as f64;
            let mut mu: f64 = 0.0;
            for (rule, strength) in RULES.iter().zip(strengths) {
                let clipped = strength.min(self.pump_terms[rule.2].grade(y));
                mu = mu.max(clipped);
            }
            moment += y * mu;
            area += mu;
        }
        if area <= f64::EPSILON {
            return Err(InferenceError::EmptyAggregate {
                deficit_l,
                rainfall_mm,
            });
        }
        Ok(moment / area)
    }
}

impl ControllerStrategy for FuzzyController {
    fn pump_request(&mut self, deficit_l: f64, rainfall_mm: f64) -> f64 {
        match self.infer(deficit_l, rainfall_mm) {
            Ok(pump_l) => pump_l,
            Err(err) => {
                warn!(deficit_l, rainfall_mm, %err, "fuzzy inference failed, pumping nothing");
                0.0
            }
        }
    }

    fn name(&self) -> &'static str {
        "fuzzy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_terms_peak_at_universe_edges() {
        let fuzzy = FuzzyController::new(1000.0);
        assert_eq!(fuzzy.deficit_terms[SMALL].grade(0.0), 1.0);
        assert_eq!(fuzzy.deficit_terms[SMALL].grade(50.0), 0.5);
        assert_eq!(fuzzy.deficit_terms[SMALL].grade(100.0), 0.0);
        assert_eq!(fuzzy.deficit_terms[LARGE].grade(500.0), 1.0);
        assert_eq!(fuzzy.rain_terms[NONE].grade(0.0), 1.0);
        assert_eq!(fuzzy.rain_terms[HEAVY].grade(50.0), 1.0);
    }

    #[test]
    fn interior_term_is_a_proper_triangle() {
        let fuzzy = FuzzyController::new(1000.0);
        let medium = fuzzy.deficit_terms[MEDIUM];
        assert_eq!(medium.grade(50.0), 0.0);
        assert_eq!(medium.grade(150.0), 1.0);
        assert_eq!(medium.grade(250.0), 0.0);
        assert!((medium.grade(100.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_deficit_pumps_nothing() {
        let fuzzy = FuzzyController::new(3000.0);
        assert_eq!(fuzzy.infer(0.0, 0.0), Ok(0.0));
        assert_eq!(fuzzy.infer(-10.0, 30.0), Ok(0.0));
    }

    #[test]
    fn large_deficit_on_a_dry_day_pumps_much() {
        let fuzzy = FuzzyController::new(3000.0);
        let pump = fuzzy.infer(1200.0, 0.0).unwrap();
        assert!(pump > 450.0, "expected a heavy pump, got {pump}");
        assert!(pump <= 900.0, "pump {pump} beyond the output universe");
    }

    #[test]
    fn medium_deficit_on_a_dry_day_hits_the_full_much_term() {
        let fuzzy = FuzzyController::new(3000.0);
        // deficit 0.15*cap is fully "medium"; dry day is fully "none".
        let pump = fuzzy.infer(450.0, 0.0).unwrap();
        // Centroid of the unclipped "much" triangle: (0.08 + 0.3 + 0.3)/3 of cap.
        assert!((pump - 680.0).abs() < 10.0, "got {pump}");
    }

    #[test]
    fn small_deficit_under_heavy_rain_defers_to_the_sky() {
        let fuzzy = FuzzyController::new(3000.0);
        let pump = fuzzy.infer(150.0, 30.0).unwrap();
        assert!(pump < 30.0, "expected a token pump at most, got {pump}");
    }

    #[test]
    fn deficit_beyond_the_universe_fails_soft() {
        let fuzzy = FuzzyController::new(3000.0);
        let err = fuzzy.infer(1800.0, 0.0).unwrap_err();
        assert!(matches!(err, InferenceError::NoRuleFired { .. }));

        let mut controller = fuzzy;
        assert_eq!(controller.name(), "fuzzy");
        assert_eq!(controller.pump_request(1800.0, 0.0), 0.0);
    }

    #[test]
    fn inference_is_stateless_and_deterministic() {
        let mut a = FuzzyController::new(3000.0);
        let mut b = FuzzyController::new(3000.0);
        let first = a.pump_request(600.0, 4.0);
        let again = a.pump_request(600.0, 4.0);
        assert_eq!(first, again);
        assert_eq!(first, b.pump_request(600.0, 4.0));
    }

    #[test]
    fn output_stays_inside_the_pump_universe() {
        let fuzzy = FuzzyController::new(2000.0);
        for deficit in [1.0, 50.0, 200.0, 400.0, 700.0, 999.0] {
            for rain in [0.0, 1.0, 4.0, 12.0, 19.0, 30.0, 50.0] {
                if let Ok(pump) = fuzzy.infer(deficit, rain) {
                    assert!(
                        (0.0..=600.0).contains(&pump),
                        "pump {pump} outside [0, 600] for deficit {deficit}, rain {rain}"
                    );
                }
            }
        }
    }
}
