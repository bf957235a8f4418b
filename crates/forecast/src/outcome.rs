//! Finish-time forecast.
//!
//! The model rescales a validated reference result to the requested fitness,
//! adds a symmetric fatigue adjustment for fitness that differs from the
//! reference, adds aid-station dwell time and then applies the respiratory
//! penalty. The spread is either a closed-form normal approximation or a
//! seeded Monte Carlo sample (see [`ForecastMethod`]).

use serde::Serialize;
use tracing::debug;

use crate::{
    constants::{distribution, validation},
    errors::ForecastError,
    monte_carlo::{self, TrialInputs},
    params::{ForecastMethod, ForecastParams},
    profiles::{Athlete, Course, parse_duration_hours},
    respiratory::{RespiratoryAssessment, assess_respiratory_risk},
};

/// Finish-time percentiles, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinishDistribution {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

impl FinishDistribution {
    fn closed_form(mean: f64, std_dev: f64) -> Self {
        Self {
            p10: mean + distribution::Z_P10 * std_dev,
            p25: mean + distribution::Z_P25 * std_dev,
            p50: mean + distribution::Z_P50 * std_dev,
            p75: mean + distribution::Z_P75 * std_dev,
            p90: mean + distribution::Z_P90 * std_dev,
        }
    }

    fn empirical(sorted: &[f64]) -> Self {
        Self {
            p10: monte_carlo::percentile(sorted, 10.0),
            p25: monte_carlo::percentile(sorted, 25.0),
            p50: monte_carlo::percentile(sorted, 50.0),
            p75: monte_carlo::percentile(sorted, 75.0),
            p90: monte_carlo::percentile(sorted, 90.0),
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [self.p10, self.p25, self.p50, self.p75, self.p90]
    }

    pub fn is_ordered(&self) -> bool {
        self.as_array().windows(2).all(|w| w[0] <= w[1])
    }
}

/// Comparison of the forecast P50 with a stored target for this fitness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationCheck {
    pub key: String,
    pub target: String,
    pub target_hours: f64,
    /// Signed; positive means the forecast is slower than the target.
    pub error_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeForecast {
    pub baseline_hours: f64,
    pub estimated_moving_hours: f64,
    pub fatigue_penalty: f64,
    pub moving_with_fatigue_hours: f64,
    pub aid_station_stops: u32,
    pub aid_station_hours: f64,
    pub mean_hours: f64,
    pub std_dev_hours: f64,
    pub percentiles: FinishDistribution,
    /// Minutes per km, from the moving time before fatigue.
    pub average_pace_min_per_km: f64,
    pub respiratory: RespiratoryAssessment,
    pub method: ForecastMethod,
    pub validation: Option<ValidationCheck>,
}

/// Reference finish time rescaled to fitness 1.0.
pub fn baseline_hours() -> f64 {
    validation::VALIDATED_FINISH_HOURS * (validation::VALIDATED_FITNESS / 1.0)
}

/// Symmetric penalty for fitness away from the validated level.
pub fn fatigue_penalty(fitness: f64) -> f64 {
    1.0 + (fitness - validation::VALIDATED_FITNESS).abs() * validation::FATIGUE_DEVIATION_RATE
}

/// Upper bound of expected stops times the median stop, in hours.
pub fn aid_station_hours(course: &Course) -> f64 {
    f64::from(course.aid_stations.max_stops) * course.aid_stations.median_stop_seconds / 3600.0
}

pub fn forecast_outcome(
    course: &Course,
    athlete: &Athlete,
    params: &ForecastParams,
) -> Result<OutcomeForecast, ForecastError> {
    let baseline = baseline_hours();
    let estimated_moving = baseline / params.fitness;
    let fatigue = fatigue_penalty(params.fitness);
    let moving_with_fatigue = estimated_moving * fatigue;
    let aid_hours = aid_station_hours(course);

    let respiratory = assess_respiratory_risk(athlete, params.temperature_c, course.distance_km);

    let method = params.method.normalized();
    let (mean, std_dev, percentiles) = match method {
        ForecastMethod::ClosedForm => {
            let mean = (moving_with_fatigue + aid_hours) * (1.0 + respiratory.penalty);
            let std_dev = mean * distribution::COEFFICIENT_OF_VARIATION;
            (mean, std_dev, FinishDistribution::closed_form(mean, std_dev))
        }
        ForecastMethod::MonteCarlo { trials, seed } => {
            let mut samples = monte_carlo::sample_finish_times(
                TrialInputs {
                    moving_hours: moving_with_fatigue,
                    aid_station_hours: aid_hours,
                    respiratory_penalty: respiratory.penalty,
                },
                trials,
                seed,
            )?;
            samples.sort_by(f64::total_cmp);
            (
                monte_carlo::mean(&samples),
                monte_carlo::std_dev(&samples),
                FinishDistribution::empirical(&samples),
            )
        }
    };

    let key = params.fitness_key();
    let validation = course.validation_target(&key).and_then(|target| {
        let target_hours = parse_duration_hours(target)?;
        Some(ValidationCheck {
            error_percent: (percentiles.p50 - target_hours) / target_hours * 100.0,
            target: target.to_string(),
            target_hours,
            key: key.clone(),
        })
    });

    debug!(
        "Forecast for {} at fitness {}: mean {mean:.3}h, P50 {:.3}h",
        course.race_name, params.fitness, percentiles.p50
    );

    Ok(OutcomeForecast {
        baseline_hours: baseline,
        estimated_moving_hours: estimated_moving,
        fatigue_penalty: fatigue,
        moving_with_fatigue_hours: moving_with_fatigue,
        aid_station_stops: course.aid_stations.max_stops,
        aid_station_hours: aid_hours,
        mean_hours: mean,
        std_dev_hours: std_dev,
        percentiles,
        average_pace_min_per_km: estimated_moving * 60.0 / course.distance_km,
        respiratory,
        method,
        validation,
    })
}

/// Formats fractional hours as `H:MM:SS`.
pub fn format_hours(hours: f64) -> String {
    let total_seconds = (hours.max(0.0) * 3600.0).round() as u64;
    format!(
        "{}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}
