//! Scalar run parameters.

use serde::Serialize;
use tracing::warn;

use crate::constants::distribution;

pub const DEFAULT_FITNESS: f64 = 1.15;
pub const DEFAULT_TEMPERATURE_C: f64 = 6.0;
pub const DEFAULT_CONDITIONS: &str = "dry";

/// How the finish-time distribution is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Normal approximation around the mean with a fixed coefficient of
    /// variation. Fully deterministic.
    #[default]
    ClosedForm,
    /// Seeded sampling of per-trial moving and aid-station time.
    MonteCarlo { trials: usize, seed: u64 },
}

impl ForecastMethod {
    /// A zero trial count selects the default of 500.
    pub fn monte_carlo(trials: usize, seed: u64) -> Self {
        let trials = if trials == 0 {
            distribution::DEFAULT_MONTE_CARLO_TRIALS
        } else {
            trials
        };
        ForecastMethod::MonteCarlo { trials, seed }
    }

    /// Applies the zero-trials default to a variant built by hand.
    pub fn normalized(self) -> Self {
        match self {
            ForecastMethod::MonteCarlo { trials, seed } => Self::monte_carlo(trials, seed),
            closed => closed,
        }
    }

    /// Parses `closed-form` or `monte-carlo`.
    pub fn parse(name: &str, trials: usize, seed: u64) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "closed-form" | "closed" => Some(ForecastMethod::ClosedForm),
            "monte-carlo" | "mc" => Some(Self::monte_carlo(trials, seed)),
            _ => None,
        }
    }
}

/// Fitness multiplier, temperature and conditions for one forecast run.
///
/// Values are sanitized on construction: a non-finite or non-positive
/// fitness becomes 1.15 and a non-finite temperature becomes 6 °C.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastParams {
    pub fitness: f64,
    pub temperature_c: f64,
    /// Carried through to the report; no model reads it.
    pub conditions: String,
    pub method: ForecastMethod,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            fitness: DEFAULT_FITNESS,
            temperature_c: DEFAULT_TEMPERATURE_C,
            conditions: DEFAULT_CONDITIONS.to_string(),
            method: ForecastMethod::ClosedForm,
        }
    }
}

impl ForecastParams {
    pub fn new(fitness: f64, temperature_c: f64) -> Self {
        Self {
            fitness: sanitize_fitness(fitness),
            temperature_c: sanitize_temperature(temperature_c),
            ..Self::default()
        }
    }

    pub fn with_conditions(mut self, conditions: impl Into<String>) -> Self {
        self.conditions = conditions.into();
        self
    }

    pub fn with_method(mut self, method: ForecastMethod) -> Self {
        self.method = method;
        self
    }

    /// Key used to look up validation targets, e.g. `fitness_1.15`.
    pub fn fitness_key(&self) -> String {
        format!("fitness_{:.2}", self.fitness)
    }
}

pub fn sanitize_fitness(fitness: f64) -> f64 {
    if fitness.is_finite() && fitness > 0.0 {
        fitness
    } else {
        warn!("Invalid fitness multiplier {fitness}; using {DEFAULT_FITNESS}");
        DEFAULT_FITNESS
    }
}

pub fn sanitize_temperature(temperature_c: f64) -> f64 {
    if temperature_c.is_finite() {
        temperature_c
    } else {
        warn!("Invalid temperature {temperature_c}; using {DEFAULT_TEMPERATURE_C}°C");
        DEFAULT_TEMPERATURE_C
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_fitness_falls_back() {
        assert_eq!(ForecastParams::new(0.0, 6.0).fitness, 1.15);
        assert_eq!(ForecastParams::new(-1.0, 6.0).fitness, 1.15);
        assert_eq!(ForecastParams::new(f64::NAN, 6.0).fitness, 1.15);
        assert_eq!(ForecastParams::new(1.05, 6.0).fitness, 1.05);
    }

    #[test]
    fn test_invalid_temperature_falls_back() {
        assert_eq!(ForecastParams::new(1.0, f64::NAN).temperature_c, 6.0);
        assert_eq!(ForecastParams::new(1.0, f64::INFINITY).temperature_c, 6.0);
        assert_eq!(ForecastParams::new(1.0, -12.0).temperature_c, -12.0);
    }

    #[test]
    fn test_fitness_key() {
        assert_eq!(ForecastParams::new(1.15, 6.0).fitness_key(), "fitness_1.15");
        assert_eq!(ForecastParams::new(1.0, 6.0).fitness_key(), "fitness_1.00");
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            ForecastMethod::parse("closed-form", 10, 1),
            Some(ForecastMethod::ClosedForm)
        );
        assert_eq!(
            ForecastMethod::parse("Monte_Carlo", 0, 7),
            Some(ForecastMethod::MonteCarlo {
                trials: 500,
                seed: 7
            })
        );
        assert_eq!(ForecastMethod::parse("magic", 10, 1), None);
    }

    #[test]
    fn test_normalized_zero_trials() {
        assert_eq!(
            ForecastMethod::MonteCarlo { trials: 0, seed: 3 }.normalized(),
            ForecastMethod::MonteCarlo {
                trials: 500,
                seed: 3
            }
        );
        assert_eq!(
            ForecastMethod::MonteCarlo { trials: 40, seed: 3 }.normalized(),
            ForecastMethod::MonteCarlo { trials: 40, seed: 3 }
        );
        assert_eq!(
            ForecastMethod::ClosedForm.normalized(),
            ForecastMethod::ClosedForm
        );
    }
}
