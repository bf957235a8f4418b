//! Snapshot of the athlete's current fitness, for reporting only.

use serde::Serialize;

use crate::{
    bands::{BandTable, Threshold},
    constants::athlete as athlete_consts,
    profiles::{Athlete, HeartRateZones},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Vo2Rating {
    #[serde(rename = "World-Class")]
    WorldClass,
    Elite,
    Competitive,
    Recreational,
}

pub const VO2_RATINGS: BandTable<Vo2Rating, 3> = BandTable::new(
    [
        (Threshold::AtLeast(62.0), Vo2Rating::WorldClass),
        (Threshold::AtLeast(55.0), Vo2Rating::Elite),
        (Threshold::AtLeast(48.0), Vo2Rating::Competitive),
    ],
    Vo2Rating::Recreational,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FitnessStatus {
    #[serde(rename = "Peak form")]
    PeakForm,
    #[serde(rename = "Strong fitness")]
    StrongFitness,
    Baseline,
}

const FITNESS_STATUS: BandTable<FitnessStatus, 2> = BandTable::new(
    [
        (Threshold::AtLeast(1.2), FitnessStatus::PeakForm),
        (Threshold::AtLeast(1.1), FitnessStatus::StrongFitness),
    ],
    FitnessStatus::Baseline,
);

/// Share of base pace retained over a duration bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceDecay {
    pub hours: &'static str,
    pub percent_of_base: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AthleteState {
    pub vo2_max: f64,
    pub vo2_source: String,
    pub vo2_rating: Vo2Rating,
    pub heart_rate: HeartRateZones,
    pub ctl: f64,
    pub fitness: f64,
    pub status: FitnessStatus,
    pub pace_decay: Vec<PaceDecay>,
    /// Athlete's own ranking of what decides their races.
    pub success_factors: Vec<String>,
}

const FITNESS_EPSILON: f64 = 1e-9;

/// Training load matching the fitness multiplier: UTMB 2025 at 1.0, Arc
/// 2025 at 1.15, a fixed 150 at 1.2, otherwise the UTMB 2025 figure.
pub fn current_ctl(athlete: &Athlete, fitness: f64) -> f64 {
    let near = |target: f64| (fitness - target).abs() < FITNESS_EPSILON;
    if near(1.15) {
        athlete.training_load.ctl_arc_2025
    } else if near(1.2) {
        athlete_consts::PEAK_FITNESS_CTL
    } else {
        athlete.training_load.ctl_utmb_2025
    }
}

pub fn pace_decay(fitness: f64) -> Vec<PaceDecay> {
    [("4-8", 8.0), ("8-12", 15.0), ("12+", 25.0)]
        .into_iter()
        .map(|(hours, rate)| PaceDecay {
            hours,
            percent_of_base: 100.0 - fitness * rate,
        })
        .collect()
}

pub fn athlete_state(athlete: &Athlete, fitness: f64) -> AthleteState {
    AthleteState {
        vo2_max: athlete.vo2_max,
        vo2_source: athlete.vo2_source.clone(),
        vo2_rating: VO2_RATINGS.classify(athlete.vo2_max),
        heart_rate: athlete.heart_rate,
        ctl: current_ctl(athlete, fitness),
        fitness,
        status: FITNESS_STATUS.classify(fitness),
        pace_decay: pace_decay(fitness),
        success_factors: athlete.success_factors.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::AthleteProfile;

    fn athlete() -> Athlete {
        serde_json::from_str::<AthleteProfile>(
            r#"{"name": "A",
                "fitness_baseline": {"training_load": {"ctl_utmb_2025": 112, "ctl_arc_2025": 141}},
                "physiological_profile": {"aerobic_capacity": {"vo2_max_ml_kg_min": 55, "source": "Lab test"}},
                "success_factors_ranked": ["Pacing", "Fueling"]}"#,
        )
        .unwrap()
        .resolve()
        .unwrap()
    }

    #[test]
    fn test_ctl_selection() {
        let a = athlete();
        assert_eq!(current_ctl(&a, 1.0), 112.0);
        assert_eq!(current_ctl(&a, 1.15), 141.0);
        assert_eq!(current_ctl(&a, 1.2), 150.0);
        assert_eq!(current_ctl(&a, 1.05), 112.0);
    }

    #[test]
    fn test_vo2_rating_boundaries() {
        assert_eq!(VO2_RATINGS.classify(62.0), Vo2Rating::WorldClass);
        assert_eq!(VO2_RATINGS.classify(61.9), Vo2Rating::Elite);
        assert_eq!(VO2_RATINGS.classify(48.0), Vo2Rating::Competitive);
        assert_eq!(VO2_RATINGS.classify(47.9), Vo2Rating::Recreational);
    }

    #[test]
    fn test_state_summary() {
        let state = athlete_state(&athlete(), 1.15);
        assert_eq!(state.vo2_rating, Vo2Rating::Elite);
        assert_eq!(state.vo2_source, "Lab test");
        assert_eq!(state.status, FitnessStatus::StrongFitness);
        assert_eq!(state.ctl, 141.0);
        assert_eq!(state.heart_rate.zone_2.max, 145);
        assert_eq!(state.success_factors, ["Pacing", "Fueling"]);
    }

    #[test]
    fn test_fitness_status() {
        assert_eq!(FITNESS_STATUS.classify(1.25), FitnessStatus::PeakForm);
        assert_eq!(FITNESS_STATUS.classify(1.0), FitnessStatus::Baseline);
    }

    #[test]
    fn test_pace_decay() {
        let decay = pace_decay(1.0);
        let values: Vec<f64> = decay.iter().map(|d| d.percent_of_base).collect();
        assert_eq!(values, [92.0, 85.0, 75.0]);
    }
}
