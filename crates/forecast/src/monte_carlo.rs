//! Seeded finish-time sampling.

use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

use crate::{constants::distribution, errors::ForecastError};

/// Inputs for one sampled trial, before variation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialInputs {
    pub moving_hours: f64,
    pub aid_station_hours: f64,
    pub respiratory_penalty: f64,
}

fn factor(cv: f64) -> Result<Normal<f64>, ForecastError> {
    Normal::new(1.0, cv).map_err(|e| ForecastError::InvalidInput(format!("bad variation: {e}")))
}

/// Draws `trials` finish times. Identical inputs and seed give identical
/// samples.
pub fn sample_finish_times(
    inputs: TrialInputs,
    trials: usize,
    seed: u64,
) -> Result<Vec<f64>, ForecastError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let moving = factor(distribution::MOVING_TIME_CV)?;
    let aid = factor(distribution::AID_TIME_CV)?;
    let (moving_lo, moving_hi) = distribution::MOVING_TIME_CLAMP;
    let (aid_lo, aid_hi) = distribution::AID_TIME_CLAMP;

    let samples = (0..trials)
        .map(|_| {
            let moving_hours = inputs.moving_hours * moving.sample(&mut rng).clamp(moving_lo, moving_hi);
            let aid_hours = inputs.aid_station_hours * aid.sample(&mut rng).clamp(aid_lo, aid_hi);
            (moving_hours + aid_hours) * (1.0 + inputs.respiratory_penalty)
        })
        .collect();
    Ok(samples)
}

/// Empirical percentile (0..=100) with linear interpolation between order
/// statistics. `sorted` must be ascending and non-empty.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = (pct / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
