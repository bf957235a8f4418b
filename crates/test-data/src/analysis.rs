//! Summary statistics over a forecast batch.

use std::collections::BTreeMap;

use forecast::monte_carlo::{mean, percentile};
use serde::Serialize;

use crate::{
    config::TargetWindow,
    generators::{ScenarioOutcome, WeatherKind},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStatistics {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1).
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
}

impl TimeStatistics {
    /// `None` for an empty batch.
    pub fn from_hours(hours: &[f64]) -> Option<Self> {
        if hours.is_empty() {
            return None;
        }
        let mut sorted = hours.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            mean: mean(&sorted),
            median: percentile(&sorted, 50.0),
            std: sample_std_dev(&sorted),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p10: percentile(&sorted, 10.0),
            p25: percentile(&sorted, 25.0),
            p75: percentile(&sorted, 75.0),
            p90: percentile(&sorted, 90.0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStatistics {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetAchievement {
    pub window: TargetWindow,
    pub count: usize,
    pub success_rate: f64,
    pub mean_fitness_in_target: Option<f64>,
    pub mean_temperature_in_target: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchAnalysis {
    pub total_scenarios: usize,
    pub time_statistics: Option<TimeStatistics>,
    /// Share of scenarios whose respiratory risk carries a time penalty.
    pub respiratory_risk_rate: f64,
    pub weather_performance: BTreeMap<WeatherKind, GroupStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_achievement: Option<TargetAchievement>,
}

pub fn analyze(outcomes: &[ScenarioOutcome], target: Option<TargetWindow>) -> BatchAnalysis {
    let hours: Vec<f64> = outcomes.iter().map(|o| o.finish_hours).collect();
    let total = outcomes.len();

    let mut by_weather: BTreeMap<WeatherKind, Vec<f64>> = BTreeMap::new();
    for outcome in outcomes {
        by_weather
            .entry(outcome.scenario.weather.kind)
            .or_default()
            .push(outcome.finish_hours);
    }
    let weather_performance = by_weather
        .into_iter()
        .map(|(kind, hours)| {
            let stats = GroupStatistics {
                count: hours.len(),
                mean: mean(&hours),
                std: sample_std_dev(&hours),
            };
            (kind, stats)
        })
        .collect();

    let at_risk = outcomes
        .iter()
        .filter(|o| o.respiratory_risk.penalty() > 0.0)
        .count();

    BatchAnalysis {
        total_scenarios: total,
        time_statistics: TimeStatistics::from_hours(&hours),
        respiratory_risk_rate: ratio(at_risk, total),
        weather_performance,
        target_achievement: target.map(|window| target_achievement(outcomes, window)),
    }
}

fn target_achievement(outcomes: &[ScenarioOutcome], window: TargetWindow) -> TargetAchievement {
    let hits: Vec<&ScenarioOutcome> = outcomes
        .iter()
        .filter(|o| window.contains(o.finish_hours))
        .collect();
    let fitness: Vec<f64> = hits.iter().map(|o| o.scenario.fitness).collect();
    let temperature: Vec<f64> = hits
        .iter()
        .map(|o| o.scenario.weather.temperature_c)
        .collect();

    TargetAchievement {
        window,
        count: hits.len(),
        success_rate: ratio(hits.len(), outcomes.len()),
        mean_fitness_in_target: (!fitness.is_empty()).then(|| mean(&fitness)),
        mean_temperature_in_target: (!temperature.is_empty()).then(|| mean(&temperature)),
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Bessel-corrected; 0 for fewer than two values.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}
