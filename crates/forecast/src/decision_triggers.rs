//! In-race decision rules: pace caps, fueling, walk/run and abort criteria.

use serde::Serialize;

use crate::{
    bands::{BandTable, Threshold},
    constants::triggers,
    outcome::OutcomeForecast,
    params::ForecastParams,
    profiles::Athlete,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceCap {
    pub name: &'static str,
    pub start_km: f64,
    /// `None` for the open-ended final segment.
    pub end_km: Option<f64>,
    pub pace_multiplier: f64,
    pub max_pace_min_per_km: f64,
    pub heart_rate_limit_bpm: u32,
}

/// Three fixed course-position segments. The heart-rate ceiling rises from
/// zone 2 to zone 4 as the race settles.
pub fn pace_caps(athlete: &Athlete, average_pace_min_per_km: f64) -> Vec<PaceCap> {
    let base = if average_pace_min_per_km.is_finite() && average_pace_min_per_km > 0.0 {
        average_pace_min_per_km
    } else {
        triggers::FALLBACK_PACE_MIN_PER_KM
    };
    let zones = &athlete.heart_rate;
    [
        ("0-15km (Start)", 0.0, Some(15.0), 1.10, zones.zone_2.max),
        ("15-30km (Settled)", 15.0, Some(30.0), 1.00, zones.zone_3.max),
        ("30km+ (Push)", 30.0, None, 0.95, zones.zone_4.max),
    ]
    .into_iter()
    .map(|(name, start_km, end_km, multiplier, hr)| PaceCap {
        name,
        start_km,
        end_km,
        pace_multiplier: multiplier,
        max_pace_min_per_km: base * multiplier,
        heart_rate_limit_bpm: hr,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelingStep {
    pub hour: &'static str,
    pub carbs_g: u32,
    pub fluid_ml: Option<u32>,
    pub caffeine_mg: Option<u32>,
    pub caffeine_optional: bool,
}

/// Static fueling policy; independent of every input.
pub fn fueling_schedule() -> Vec<FuelingStep> {
    vec![
        FuelingStep {
            hour: "1",
            carbs_g: 60,
            fluid_ml: Some(500),
            caffeine_mg: None,
            caffeine_optional: false,
        },
        FuelingStep {
            hour: "2",
            carbs_g: 60,
            fluid_ml: Some(500),
            caffeine_mg: None,
            caffeine_optional: false,
        },
        FuelingStep {
            hour: "3",
            carbs_g: 60,
            fluid_ml: None,
            caffeine_mg: Some(100),
            caffeine_optional: false,
        },
        FuelingStep {
            hour: "4+",
            carbs_g: 60,
            fluid_ml: None,
            caffeine_mg: Some(200),
            caffeine_optional: true,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gait {
    PowerHike,
    Walk,
    Run,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClimbRule {
    AlwaysHike,
    HeartRateGated,
    RunIfAllowed,
}

const CLIMB_RULES: BandTable<ClimbRule, 2> = BandTable::new(
    [
        (Threshold::Above(triggers::ALWAYS_HIKE_GRADE_PCT), ClimbRule::AlwaysHike),
        (Threshold::AtLeast(triggers::HR_GATED_GRADE_PCT), ClimbRule::HeartRateGated),
    ],
    ClimbRule::RunIfAllowed,
);

/// Walk/run decision for a grade (percent, negative is downhill).
///
/// Climbs above 12% are always hiked. From 8% to 12% and on shallower
/// ground the athlete walks once heart rate exceeds 160 bpm. Descents are
/// run unless steeper than 20% or the quads have gone.
pub fn decide_gait(grade_pct: f64, heart_rate_bpm: u32, quad_failure: bool) -> Gait {
    let over_limit = heart_rate_bpm > triggers::WALK_HEART_RATE_BPM;
    if grade_pct < 0.0 {
        return if quad_failure || -grade_pct > triggers::MAX_RUNNABLE_DESCENT_PCT {
            Gait::Walk
        } else {
            Gait::Run
        };
    }
    match CLIMB_RULES.classify(grade_pct) {
        ClimbRule::AlwaysHike => Gait::PowerHike,
        ClimbRule::HeartRateGated if over_limit => Gait::PowerHike,
        ClimbRule::RunIfAllowed if over_limit => Gait::Walk,
        ClimbRule::HeartRateGated | ClimbRule::RunIfAllowed => Gait::Run,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaitRule {
    pub terrain: &'static str,
    pub rule: String,
}

pub fn walk_run_rules() -> Vec<GaitRule> {
    vec![
        GaitRule {
            terrain: "Gradient >12%",
            rule: "Power hike (always)".to_string(),
        },
        GaitRule {
            terrain: "Gradient 8-12%",
            rule: format!(
                "Heart-rate dependent (>{} bpm: walk)",
                triggers::WALK_HEART_RATE_BPM
            ),
        },
        GaitRule {
            terrain: "Gradient <8%",
            rule: "Run if heart rate allows".to_string(),
        },
        GaitRule {
            terrain: "Descents",
            rule: format!(
                "Run unless quad failure or >{}% grade",
                triggers::MAX_RUNNABLE_DESCENT_PCT
            ),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreRaceGate {
    StrongDns,
    ConsiderDns,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbortCriteria {
    pub pre_race: PreRaceGate,
    pub pre_race_note: Option<String>,
    pub abort_if: Vec<String>,
    pub salvage_if: Vec<String>,
    /// Elapsed hours after which the salvage plan kicks in.
    pub salvage_after_hours: f64,
}

pub fn abort_criteria(
    athlete: &Athlete,
    forecast: &OutcomeForecast,
    temperature_c: f64,
) -> AbortCriteria {
    let bands = athlete.gating_bands();
    let gate = BandTable::new(
        [
            (Threshold::AtMost(bands.extreme_danger_c), PreRaceGate::StrongDns),
            (Threshold::AtMost(bands.high_risk_c), PreRaceGate::ConsiderDns),
        ],
        PreRaceGate::Clear,
    )
    .classify(temperature_c);

    let pre_race_note = match gate {
        PreRaceGate::StrongDns => Some(format!(
            "DNS strongly recommended (temp {temperature_c}°C <= {}°C)",
            bands.extreme_danger_c
        )),
        PreRaceGate::ConsiderDns => Some("High risk - consider DNS".to_string()),
        PreRaceGate::Clear => None,
    };

    AbortCriteria {
        pre_race: gate,
        pre_race_note,
        abort_if: vec![
            format!(
                "Breathing severely restricted for >{} min",
                triggers::ABORT_RESTRICTED_BREATHING_MIN
            ),
            format!(
                "Cannot maintain forward progress for >{} min",
                triggers::ABORT_NO_PROGRESS_MIN
            ),
        ],
        salvage_if: vec![
            format!(
                "{}+ min behind P75 projection",
                triggers::SALVAGE_BEHIND_P75_MIN
            ),
            "Respiratory issues but manageable: slow to survival pace".to_string(),
        ],
        salvage_after_hours: forecast.percentiles.p75 + triggers::SALVAGE_BEHIND_P75_MIN / 60.0,
    }
}

/// True once the projected finish is at least 30 minutes behind P75.
pub fn should_salvage(forecast: &OutcomeForecast, projected_finish_hours: f64) -> bool {
    projected_finish_hours - forecast.percentiles.p75 >= triggers::SALVAGE_BEHIND_P75_MIN / 60.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionTriggers {
    pub pace_caps: Vec<PaceCap>,
    pub fueling: Vec<FuelingStep>,
    pub walk_run: Vec<GaitRule>,
    pub abort: AbortCriteria,
}

pub fn decision_triggers(
    forecast: &OutcomeForecast,
    athlete: &Athlete,
    params: &ForecastParams,
) -> DecisionTriggers {
    DecisionTriggers {
        pace_caps: pace_caps(athlete, forecast.average_pace_min_per_km),
        fueling: fueling_schedule(),
        walk_run: walk_run_rules(),
        abort: abort_criteria(athlete, forecast, params.temperature_c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        outcome::forecast_outcome,
        profiles::{AthleteProfile, CourseProfile},
    };

    fn athlete(json: &str) -> Athlete {
        serde_json::from_str::<AthleteProfile>(json)
            .unwrap()
            .resolve()
            .unwrap()
    }

    fn forecast() -> OutcomeForecast {
        let course = serde_json::from_str::<CourseProfile>(
            r#"{"course_metadata": {"race_name": "R", "distance_km": 45}}"#,
        )
        .unwrap()
        .resolve()
        .unwrap();
        forecast_outcome(&course, &athlete(r#"{"name": "A"}"#), &ForecastParams::default()).unwrap()
    }

    #[test]
    fn test_pace_caps_use_zone_fallbacks() {
        let caps = pace_caps(&athlete(r#"{"name": "A"}"#), 6.0);
        assert_eq!(caps.len(), 3);
        assert!((caps[0].max_pace_min_per_km - 6.6).abs() < 1e-12);
        assert_eq!(caps[1].max_pace_min_per_km, 6.0);
        assert!((caps[2].max_pace_min_per_km - 5.7).abs() < 1e-12);
        let limits: Vec<u32> = caps.iter().map(|c| c.heart_rate_limit_bpm).collect();
        assert_eq!(limits, [145, 155, 165]);
        assert_eq!(caps[2].end_km, None);
    }

    #[test]
    fn test_pace_caps_use_athlete_zones() {
        let a = athlete(
            r#"{"name": "A", "physiological_profile": {"heart_rate":
                {"zone_2_max": 140, "zone_3_max": 152, "zone_4_max": 170}}}"#,
        );
        let limits: Vec<u32> = pace_caps(&a, 6.0)
            .iter()
            .map(|c| c.heart_rate_limit_bpm)
            .collect();
        assert_eq!(limits, [140, 152, 170]);
    }

    #[test]
    fn test_pace_caps_fallback_pace() {
        let caps = pace_caps(&athlete(r#"{"name": "A"}"#), f64::NAN);
        assert_eq!(caps[1].max_pace_min_per_km, 6.5);
    }

    #[test]
    fn test_fueling_is_static() {
        let schedule = fueling_schedule();
        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule[2].caffeine_mg, Some(100));
        assert!(schedule[3].caffeine_optional);
        assert!(schedule.iter().all(|s| s.carbs_g == 60));
    }

    #[test]
    fn test_gait_thresholds() {
        assert_eq!(decide_gait(15.0, 120, false), Gait::PowerHike);
        assert_eq!(decide_gait(12.5, 120, false), Gait::PowerHike);
        assert_eq!(decide_gait(10.0, 150, false), Gait::Run);
        assert_eq!(decide_gait(10.0, 165, false), Gait::PowerHike);
        assert_eq!(decide_gait(12.0, 165, false), Gait::PowerHike);
        assert_eq!(decide_gait(8.0, 161, false), Gait::PowerHike);
        assert_eq!(decide_gait(4.0, 150, false), Gait::Run);
        assert_eq!(decide_gait(4.0, 170, false), Gait::Walk);
        assert_eq!(decide_gait(-10.0, 170, false), Gait::Run);
        assert_eq!(decide_gait(-25.0, 130, false), Gait::Walk);
        assert_eq!(decide_gait(-5.0, 130, true), Gait::Walk);
    }

    #[test]
    fn test_pre_race_gate_defaults() {
        let a = athlete(r#"{"name": "A"}"#);
        let f = forecast();
        assert_eq!(abort_criteria(&a, &f, 4.0).pre_race, PreRaceGate::StrongDns);
        assert_eq!(abort_criteria(&a, &f, 5.0).pre_race, PreRaceGate::StrongDns);
        assert_eq!(abort_criteria(&a, &f, 6.0).pre_race, PreRaceGate::ConsiderDns);
        assert_eq!(abort_criteria(&a, &f, 9.0).pre_race, PreRaceGate::Clear);
        assert!(abort_criteria(&a, &f, 9.0).pre_race_note.is_none());
    }

    #[test]
    fn test_pre_race_gate_uses_athlete_bands() {
        let a = athlete(
            r#"{"name": "A", "respiratory_profile": {"temperature_risk_bands":
                {"extreme_danger_c": 2, "high_risk_c": 4, "moderate_risk_c": 6, "low_risk_c": 8}}}"#,
        );
        let f = forecast();
        assert_eq!(abort_criteria(&a, &f, 3.0).pre_race, PreRaceGate::ConsiderDns);
        assert_eq!(abort_criteria(&a, &f, 6.0).pre_race, PreRaceGate::Clear);
    }

    #[test]
    fn test_salvage_threshold() {
        let f = forecast();
        let criteria = abort_criteria(&athlete(r#"{"name": "A"}"#), &f, 10.0);
        assert!((criteria.salvage_after_hours - (f.percentiles.p75 + 0.5)).abs() < 1e-12);
        assert!(should_salvage(&f, f.percentiles.p75 + 0.6));
        assert!(!should_salvage(&f, f.percentiles.p75 + 0.25));
        assert_eq!(criteria.abort_if.len(), 2);
    }
}
