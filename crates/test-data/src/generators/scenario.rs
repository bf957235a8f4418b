//! Randomized race-day scenarios and their forecasts.

use forecast::{
    ForecastError, ForecastParams,
    outcome::forecast_outcome,
    profiles::{Athlete, Course},
    respiratory::RespiratoryRisk,
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::BatchConfig,
    errors::ScenarioError,
    generators::weather::{WeatherSample, weather_pool},
};

/// Smallest weather pool that still holds every kind at least once.
const MIN_POOL_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub index: usize,
    pub fitness: f64,
    pub weather: WeatherSample,
}

impl Scenario {
    pub fn params(&self) -> ForecastParams {
        ForecastParams::new(self.fitness, self.weather.temperature_c)
            .with_conditions(self.weather.conditions.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    /// Median forecast finish time.
    pub finish_hours: f64,
    pub p90_hours: f64,
    pub respiratory_risk: RespiratoryRisk,
}

pub struct ScenarioGenerator {
    config: BatchConfig,
}

impl ScenarioGenerator {
    pub fn new(config: BatchConfig) -> Result<Self, ScenarioError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Draws the batch. Each scenario picks its weather from a shared pool and
    /// a fitness uniformly from the configured range.
    pub fn generate(&self) -> Result<Vec<Scenario>, ScenarioError> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let pool = weather_pool(self.config.num_scenarios.max(MIN_POOL_SIZE), &mut rng)?;
        let (lo, hi) = self.config.fitness_range;

        (0..self.config.num_scenarios)
            .map(|index| -> Result<Scenario, ScenarioError> {
                let weather = pool
                    .choose(&mut rng)
                    .cloned()
                    .ok_or_else(|| ScenarioError::Config("empty weather pool".to_string()))?;
                Ok(Scenario {
                    index,
                    fitness: rng.gen_range(lo..=hi),
                    weather,
                })
            })
            .collect()
    }

    /// Generates the batch and forecasts every scenario in parallel. Outcomes
    /// come back in scenario order.
    pub fn run(&self, athlete: &Athlete, course: &Course) -> Result<Vec<ScenarioOutcome>, ScenarioError> {
        let scenarios = self.generate()?;
        info!(
            "Forecasting {} scenarios for {} on {}",
            scenarios.len(),
            athlete.name,
            course.race_name
        );

        let outcomes = scenarios
            .into_par_iter()
            .map(|scenario| -> Result<ScenarioOutcome, ForecastError> {
                let forecast = forecast_outcome(course, athlete, &scenario.params())?;
                debug!(
                    "Scenario {}: {:?} {:.1}°C fitness {:.3} -> {:.2}h",
                    scenario.index,
                    scenario.weather.kind,
                    scenario.weather.temperature_c,
                    scenario.fitness,
                    forecast.percentiles.p50
                );
                Ok(ScenarioOutcome {
                    finish_hours: forecast.percentiles.p50,
                    p90_hours: forecast.percentiles.p90,
                    respiratory_risk: forecast.respiratory.risk,
                    scenario,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(outcomes)
    }
}
