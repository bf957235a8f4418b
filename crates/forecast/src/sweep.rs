//! Fitness and temperature sensitivity sweeps.

use rayon::prelude::*;
use serde::Serialize;

use crate::{
    errors::ForecastError,
    outcome::forecast_outcome,
    params::ForecastParams,
    profiles::{Athlete, Course},
    respiratory::RespiratoryRisk,
};

/// 1.00 to 1.25 in steps of 0.05.
pub fn default_fitness_grid() -> Vec<f64> {
    (0..=5).map(|i| f64::from(100 + 5 * i) / 100.0).collect()
}

/// 6 to 20 °C in steps of 2.
pub fn default_temperature_grid() -> Vec<f64> {
    (3..=10).map(|i| f64::from(2 * i)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub fitness: f64,
    pub temperature_c: f64,
    pub p50_hours: f64,
    pub p90_hours: f64,
    pub respiratory_risk: RespiratoryRisk,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepAxis {
    pub points: Vec<SweepPoint>,
    /// Slowest minus fastest P50 across the axis.
    pub spread_hours: f64,
}

impl SweepAxis {
    fn new(points: Vec<SweepPoint>) -> Self {
        let (lo, hi) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.p50_hours), hi.max(p.p50_hours))
            });
        let spread_hours = if points.is_empty() { 0.0 } else { hi - lo };
        Self {
            points,
            spread_hours,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityReport {
    pub fitness: SweepAxis,
    pub temperature: SweepAxis,
}

fn evaluate(
    course: &Course,
    athlete: &Athlete,
    params: ForecastParams,
) -> Result<SweepPoint, ForecastError> {
    let forecast = forecast_outcome(course, athlete, &params)?;
    Ok(SweepPoint {
        fitness: params.fitness,
        temperature_c: params.temperature_c,
        p50_hours: forecast.percentiles.p50,
        p90_hours: forecast.percentiles.p90,
        respiratory_risk: forecast.respiratory.risk,
    })
}

/// Evaluates every fitness value at the base temperature. Results keep the
/// grid order.
pub fn sweep_fitness(
    course: &Course,
    athlete: &Athlete,
    base: &ForecastParams,
    grid: &[f64],
) -> Result<SweepAxis, ForecastError> {
    let points = grid
        .par_iter()
        .map(|&fitness| {
            let params = ForecastParams::new(fitness, base.temperature_c).with_method(base.method);
            evaluate(course, athlete, params)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SweepAxis::new(points))
}

pub fn sweep_temperature(
    course: &Course,
    athlete: &Athlete,
    base: &ForecastParams,
    grid: &[f64],
) -> Result<SweepAxis, ForecastError> {
    let points = grid
        .par_iter()
        .map(|&temperature_c| {
            let params = ForecastParams::new(base.fitness, temperature_c).with_method(base.method);
            evaluate(course, athlete, params)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SweepAxis::new(points))
}

pub fn sensitivity(
    course: &Course,
    athlete: &Athlete,
    base: &ForecastParams,
) -> Result<SensitivityReport, ForecastError> {
    let (fitness, temperature) = rayon::join(
        || sweep_fitness(course, athlete, base, &default_fitness_grid()),
        || sweep_temperature(course, athlete, base, &default_temperature_grid()),
    );
    Ok(SensitivityReport {
        fitness: fitness?,
        temperature: temperature?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{AthleteProfile, CourseProfile};

    fn inputs() -> (Course, Athlete) {
        let course = serde_json::from_str::<CourseProfile>(
            r#"{"course_metadata": {"race_name": "R", "distance_km": 74},
                "aid_station_model": {"expected_stops_count": [5, 7], "median_stop_seconds": 100}}"#,
        )
        .unwrap()
        .resolve()
        .unwrap();
        let athlete = serde_json::from_str::<AthleteProfile>(
            r#"{"name": "A", "respiratory_profile": {}}"#,
        )
        .unwrap()
        .resolve()
        .unwrap();
        (course, athlete)
    }

    #[test]
    fn test_default_grids() {
        assert_eq!(default_fitness_grid(), [1.0, 1.05, 1.1, 1.15, 1.2, 1.25]);
        assert_eq!(
            default_temperature_grid(),
            [6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0]
        );
    }

    #[test]
    fn test_fitness_sweep_keeps_order_and_matches_direct_forecast() {
        let (course, athlete) = inputs();
        let base = ForecastParams::new(1.15, 14.0);
        let axis = sweep_fitness(&course, &athlete, &base, &default_fitness_grid()).unwrap();
        assert_eq!(axis.points.len(), 6);
        for (point, fitness) in axis.points.iter().zip(default_fitness_grid()) {
            assert_eq!(point.fitness, fitness);
            let direct =
                forecast_outcome(&course, &athlete, &ForecastParams::new(fitness, 14.0)).unwrap();
            assert_eq!(point.p50_hours, direct.percentiles.p50);
        }
        assert!(axis.points.windows(2).all(|w| w[0].p50_hours > w[1].p50_hours));
        let expected = axis.points[0].p50_hours - axis.points[5].p50_hours;
        assert!((axis.spread_hours - expected).abs() < 1e-12);
    }

    #[test]
    fn test_temperature_sweep_gets_faster_as_it_warms() {
        let (course, athlete) = inputs();
        let report = sensitivity(&course, &athlete, &ForecastParams::default()).unwrap();
        let temps = &report.temperature.points;
        assert_eq!(temps.len(), 8);
        assert_eq!(temps[0].respiratory_risk, RespiratoryRisk::High);
        assert_eq!(temps[7].respiratory_risk, RespiratoryRisk::Minimal);
        assert!(temps.windows(2).all(|w| w[0].p50_hours >= w[1].p50_hours));
        assert!(report.temperature.spread_hours > 0.0);
    }

    #[test]
    fn test_empty_grid() {
        let (course, athlete) = inputs();
        let axis = sweep_temperature(&course, &athlete, &ForecastParams::default(), &[]).unwrap();
        assert!(axis.points.is_empty());
        assert_eq!(axis.spread_hours, 0.0);
    }
}
