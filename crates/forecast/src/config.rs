//! Environment-driven configuration for the `forecast` binary.

use std::{env, path::PathBuf};

use tracing::warn;

use crate::{
    constants::distribution,
    errors::ForecastError,
    params::{DEFAULT_CONDITIONS, ForecastMethod, ForecastParams},
};

pub const ATHLETE_PROFILE: &str = "ATHLETE_PROFILE";
pub const COURSE_PROFILE: &str = "COURSE_PROFILE";
pub const COURSE_GPX: &str = "COURSE_GPX";
pub const FITNESS: &str = "FITNESS";
pub const TEMPERATURE_C: &str = "TEMPERATURE_C";
pub const CONDITIONS: &str = "CONDITIONS";
pub const FORECAST_METHOD: &str = "FORECAST_METHOD";
pub const MONTE_CARLO_TRIALS: &str = "MONTE_CARLO_TRIALS";
pub const MONTE_CARLO_SEED: &str = "MONTE_CARLO_SEED";

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub athlete_path: PathBuf,
    pub course_path: PathBuf,
    pub gpx_path: Option<PathBuf>,
    pub params: ForecastParams,
}

impl RunConfig {
    pub fn from_env() -> Result<Self, ForecastError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ForecastError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let athlete_path = lookup(ATHLETE_PROFILE)
            .filter(|p| !p.trim().is_empty())
            .ok_or(ForecastError::MissingConfig(ATHLETE_PROFILE))?;
        let course_path = lookup(COURSE_PROFILE)
            .filter(|p| !p.trim().is_empty())
            .ok_or(ForecastError::MissingConfig(COURSE_PROFILE))?;

        // Unparseable numbers go through the same sanitizing path as NaN.
        let fitness = parse_or(&lookup, FITNESS, f64::NAN, crate::params::DEFAULT_FITNESS);
        let temperature_c = parse_or(
            &lookup,
            TEMPERATURE_C,
            f64::NAN,
            crate::params::DEFAULT_TEMPERATURE_C,
        );
        let trials = parse_or(
            &lookup,
            MONTE_CARLO_TRIALS,
            distribution::DEFAULT_MONTE_CARLO_TRIALS,
            distribution::DEFAULT_MONTE_CARLO_TRIALS,
        );
        let seed = parse_or(
            &lookup,
            MONTE_CARLO_SEED,
            distribution::DEFAULT_MONTE_CARLO_SEED,
            distribution::DEFAULT_MONTE_CARLO_SEED,
        );

        let method = match lookup(FORECAST_METHOD) {
            Some(name) => ForecastMethod::parse(&name, trials, seed).unwrap_or_else(|| {
                warn!("Unknown {FORECAST_METHOD} {name:?}; using closed-form");
                ForecastMethod::ClosedForm
            }),
            None => ForecastMethod::ClosedForm,
        };

        let params = ForecastParams::new(fitness, temperature_c)
            .with_conditions(
                lookup(CONDITIONS).unwrap_or_else(|| DEFAULT_CONDITIONS.to_string()),
            )
            .with_method(method);

        Ok(Self {
            athlete_path: PathBuf::from(athlete_path),
            course_path: PathBuf::from(course_path),
            gpx_path: lookup(COURSE_GPX)
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            params,
        })
    }
}

/// `missing` when the key is absent, `invalid` when it does not parse.
fn parse_or<F, T>(lookup: &F, key: &str, invalid: T, missing: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Could not parse {key}={raw:?}");
            invalid
        }),
        None => missing,
    }
}
