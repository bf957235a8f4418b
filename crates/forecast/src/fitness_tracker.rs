//! Chronic training load (CTL) to fitness multiplier conversion and
//! race-day progression estimates.
//!
//! Calibrated on two reference points: CTL 120 is fitness 1.0 and CTL 138
//! is roughly fitness 1.15.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::{debug, info};

use crate::errors::ForecastError;

pub const BASELINE_CTL: f64 = 120.0;
pub const BASELINE_FITNESS: f64 = 1.0;
/// Fitness gained per CTL point.
pub const CTL_TO_FITNESS_RATE: f64 = 0.00833;
pub const MIN_FITNESS: f64 = 0.5;

const MAX_TAPER_WEEKS: f64 = 2.0;
const TAPER_CTL_PER_WEEK: f64 = -2.0;

pub fn ctl_to_fitness(ctl: f64) -> f64 {
    (BASELINE_FITNESS + (ctl - BASELINE_CTL) * CTL_TO_FITNESS_RATE).max(MIN_FITNESS)
}

pub fn fitness_to_ctl(fitness: f64) -> f64 {
    BASELINE_CTL + (fitness - BASELINE_FITNESS) / CTL_TO_FITNESS_RATE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtlRecord {
    pub date: Date,
    pub ctl: f64,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CtlRecord {
    pub fn new(date: Date, ctl: f64) -> Self {
        Self {
            date,
            ctl,
            event_name: None,
            notes: None,
        }
    }

    pub fn with_event(mut self, event_name: impl Into<String>) -> Self {
        self.event_name = Some(event_name.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CtlSummary {
    pub total_records: usize,
    pub min_ctl: f64,
    pub max_ctl: f64,
    pub avg_ctl: f64,
    pub latest_ctl: f64,
    pub first_date: Date,
    pub latest_date: Date,
}

/// Dated CTL measurements, always kept in date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CtlHistory {
    #[serde(rename = "ctl_history", default)]
    records: Vec<CtlRecord>,
}

impl CtlHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ForecastError> {
        let mut history: CtlHistory = serde_json::from_str(json)?;
        history.records.sort_by_key(|r| r.date);
        Ok(history)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let history = Self::from_json_str(&fs::read_to_string(path.as_ref())?)?;
        debug!(
            "Loaded {} CTL records from {}",
            history.records.len(),
            path.as_ref().display()
        );
        Ok(history)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ForecastError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Inserts after any record with the same date.
    pub fn add(&mut self, record: CtlRecord) {
        let at = self.records.partition_point(|r| r.date <= record.date);
        self.records.insert(at, record);
    }

    pub fn records(&self) -> &[CtlRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&CtlRecord> {
        self.records.last()
    }

    pub fn summary(&self) -> Option<CtlSummary> {
        let first = self.records.first()?;
        let latest = self.records.last()?;
        let ctls = self.records.iter().map(|r| r.ctl);
        Some(CtlSummary {
            total_records: self.records.len(),
            min_ctl: ctls.clone().fold(f64::INFINITY, f64::min),
            max_ctl: ctls.clone().fold(f64::NEG_INFINITY, f64::max),
            avg_ctl: ctls.sum::<f64>() / self.records.len() as f64,
            latest_ctl: latest.ctl,
            first_date: first.date,
            latest_date: latest.date,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingPlan {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
    Maintenance,
    Taper,
}

impl TrainingPlan {
    /// CTL change per week during the build phase.
    pub fn weekly_gain(self) -> f64 {
        match self {
            TrainingPlan::Conservative => 2.5,
            TrainingPlan::Moderate => 3.5,
            TrainingPlan::Aggressive => 5.0,
            TrainingPlan::Maintenance => 0.0,
            TrainingPlan::Taper => -2.0,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "conservative" => Some(TrainingPlan::Conservative),
            "moderate" => Some(TrainingPlan::Moderate),
            "aggressive" => Some(TrainingPlan::Aggressive),
            "maintenance" => Some(TrainingPlan::Maintenance),
            "taper" => Some(TrainingPlan::Taper),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CtlProgression {
    pub days_to_race: i64,
    pub weeks_to_race: f64,
    pub plan: TrainingPlan,
    pub weekly_ctl_gain: f64,
    pub build_weeks: f64,
    pub taper_weeks: f64,
    pub current_ctl: f64,
    pub current_fitness: f64,
    /// CTL at the end of the build, before taper.
    pub peak_ctl: f64,
    pub peak_fitness: f64,
    pub race_day_ctl: f64,
    pub race_day_fitness: f64,
    pub ctl_gain: f64,
    pub fitness_gain: f64,
}

/// Projects CTL to race day: a build at the plan's weekly gain, then up to
/// two weeks of taper at -2 CTL per week.
pub fn predict_progression(
    current_ctl: f64,
    current_date: Date,
    race_date: Date,
    plan: TrainingPlan,
) -> Result<CtlProgression, ForecastError> {
    if race_date < current_date {
        return Err(ForecastError::InvalidInput(format!(
            "race date {race_date} is before {current_date}"
        )));
    }
    let days_to_race = (race_date - current_date).whole_days();
    let weeks_to_race = days_to_race as f64 / 7.0;
    let taper_weeks = weeks_to_race.min(MAX_TAPER_WEEKS);
    let build_weeks = (weeks_to_race - taper_weeks).max(0.0);

    let weekly_gain = plan.weekly_gain();
    let peak_ctl = current_ctl + build_weeks * weekly_gain;
    let race_day_ctl = peak_ctl + taper_weeks * TAPER_CTL_PER_WEEK;

    let current_fitness = ctl_to_fitness(current_ctl);
    let race_day_fitness = ctl_to_fitness(race_day_ctl);

    info!(
        "CTL {current_ctl:.1} -> {race_day_ctl:.1} over {days_to_race} days ({plan:?} plan)"
    );

    Ok(CtlProgression {
        days_to_race,
        weeks_to_race,
        plan,
        weekly_ctl_gain: weekly_gain,
        build_weeks,
        taper_weeks,
        current_ctl,
        current_fitness,
        peak_ctl,
        peak_fitness: ctl_to_fitness(peak_ctl),
        race_day_ctl,
        race_day_fitness,
        ctl_gain: race_day_ctl - current_ctl,
        fitness_gain: race_day_fitness - current_fitness,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn test_ctl_to_fitness_calibration() {
        assert_eq!(ctl_to_fitness(120.0), 1.0);
        assert!((ctl_to_fitness(138.0) - 1.15).abs() < 1e-3);
        assert_eq!(ctl_to_fitness(40.0), 0.5);
    }

    #[test]
    fn test_fitness_to_ctl_inverts() {
        for ctl in [90.0, 120.0, 138.0, 187.0] {
            assert!((fitness_to_ctl(ctl_to_fitness(ctl)) - ctl).abs() < 1e-9);
        }
    }

    #[test]
    fn test_progression_moderate() {
        let p = predict_progression(
            106.0,
            date!(2026 - 01 - 08),
            date!(2026 - 03 - 08),
            TrainingPlan::Moderate,
        )
        .unwrap();
        assert_eq!(p.days_to_race, 59);
        assert_eq!(p.taper_weeks, 2.0);
        assert!((p.build_weeks - (59.0 / 7.0 - 2.0)).abs() < 1e-12);
        assert!((p.peak_ctl - (106.0 + p.build_weeks * 3.5)).abs() < 1e-12);
        assert!((p.race_day_ctl - (p.peak_ctl - 4.0)).abs() < 1e-12);
        assert!(p.race_day_fitness > p.current_fitness);
    }

    #[test]
    fn test_progression_short_lead_is_all_taper() {
        let p = predict_progression(
            140.0,
            date!(2026 - 03 - 01),
            date!(2026 - 03 - 08),
            TrainingPlan::Aggressive,
        )
        .unwrap();
        assert_eq!(p.taper_weeks, 1.0);
        assert_eq!(p.build_weeks, 0.0);
        assert_eq!(p.race_day_ctl, 138.0);
    }

    #[test]
    fn test_race_in_past_is_invalid() {
        let err = predict_progression(
            100.0,
            date!(2026 - 03 - 08),
            date!(2026 - 01 - 08),
            TrainingPlan::Moderate,
        )
        .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
    }

    #[test]
    fn test_history_stays_sorted() {
        let mut history = CtlHistory::new();
        history.add(CtlRecord::new(date!(2026 - 01 - 08), 106.0).with_notes("Current"));
        history.add(CtlRecord::new(date!(2025 - 08 - 29), 187.0).with_event("UTMB 2025"));
        history.add(CtlRecord::new(date!(2025 - 10 - 15), 150.0));

        let dates: Vec<Date> = history.records().iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            [date!(2025 - 08 - 29), date!(2025 - 10 - 15), date!(2026 - 01 - 08)]
        );
        assert_eq!(history.latest().map(|r| r.ctl), Some(106.0));

        let summary = history.summary().unwrap();
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.min_ctl, 106.0);
        assert_eq!(summary.max_ctl, 187.0);
        assert!((summary.avg_ctl - 443.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.first_date, date!(2025 - 08 - 29));
    }

    #[test]
    fn test_empty_history() {
        let history = CtlHistory::new();
        assert!(history.latest().is_none());
        assert!(history.summary().is_none());
    }

    #[test]
    fn test_history_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctl.json");
        std::fs::write(
            &path,
            r#"{"ctl_history": [
                {"date": "2026-01-08", "ctl": 106},
                {"date": "2025-08-29", "ctl": 187, "event_name": "UTMB 2025"}
            ]}"#,
        )
        .unwrap();
        let history = CtlHistory::load(&path).unwrap();
        assert_eq!(history.records()[0].event_name.as_deref(), Some("UTMB 2025"));

        let copy = dir.path().join("copy.json");
        history.save(&copy).unwrap();
        assert_eq!(CtlHistory::load(&copy).unwrap(), history);
    }

    #[test]
    fn test_plan_parsing() {
        assert_eq!(TrainingPlan::parse("Aggressive"), Some(TrainingPlan::Aggressive));
        assert_eq!(TrainingPlan::parse("yolo"), None);
        assert_eq!(TrainingPlan::default().weekly_gain(), 3.5);
    }
}
