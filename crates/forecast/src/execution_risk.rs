//! Behavioral execution risks.
//!
//! Four independent indices, each derived from the forecast and the two
//! profiles: pacing deviation, aid-station dwell creep, night cognitive
//! load and overlap with the athlete's past failure patterns.

use serde::Serialize;
use tracing::debug;

use crate::{
    bands::{BandTable, Threshold},
    constants::execution,
    outcome::OutcomeForecast,
    params::ForecastParams,
    profiles::{Athlete, Course},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PacingLevel {
    High,
    Moderate,
    Low,
}

impl PacingLevel {
    pub fn recommendation(self) -> &'static str {
        match self {
            PacingLevel::High => "Use HR cap strictly, force conservative start",
            PacingLevel::Moderate => "Set conservative first 10km target",
            PacingLevel::Low => "Trust your pacing instincts",
        }
    }
}

const PACING_BANDS: BandTable<PacingLevel, 2> = BandTable::new(
    [
        (Threshold::Above(60.0), PacingLevel::High),
        (Threshold::Above(40.0), PacingLevel::Moderate),
    ],
    PacingLevel::Low,
);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacingRisk {
    /// 0..=100
    pub score: u32,
    pub level: PacingLevel,
    pub recommendation: &'static str,
}

pub fn pacing_risk(athlete: &Athlete, course: &Course) -> PacingRisk {
    let mut score = execution::PACING_BASE;
    if athlete.has_strength(execution::PACING_STRENGTH) {
        score += execution::PACING_DISCIPLINE_BONUS;
    }
    if athlete.has_weakness(execution::FAST_START_WEAKNESS) {
        score += execution::FAST_START_PENALTY;
    }
    if course.runnable_fraction > execution::RUNNABLE_FRACTION_TRIGGER {
        score += execution::RUNNABLE_COURSE_PENALTY;
    }
    let score = score.clamp(0, 100).unsigned_abs();
    let level = PACING_BANDS.classify(f64::from(score));
    PacingRisk {
        score,
        level,
        recommendation: level.recommendation(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DwellTimeCreep {
    pub stops: u32,
    pub early_stop_seconds: f64,
    pub late_stop_seconds: f64,
    /// Minutes lost against a target of 80% of the median stop.
    pub creep_minutes: f64,
    pub warning: bool,
    pub advice: &'static str,
}

/// Half the stops run at the median, the late half at 1.5x the median.
pub fn dwell_time_creep(course: &Course) -> DwellTimeCreep {
    let stops = course.aid_stations.max_stops;
    let median = course.aid_stations.median_stop_seconds;
    let half = f64::from(stops) / 2.0;
    let early = median;
    let late = median * execution::LATE_STOP_FACTOR;

    let actual_minutes = (half * early + half * late) / 60.0;
    let target_minutes = f64::from(stops) * median * execution::TARGET_STOP_FACTOR / 60.0;
    let creep_minutes = actual_minutes - target_minutes;
    let warning = creep_minutes > execution::DWELL_CREEP_WARNING_MIN;

    DwellTimeCreep {
        stops,
        early_stop_seconds: early,
        late_stop_seconds: late,
        creep_minutes,
        warning,
        advice: if warning {
            "Use timer at EVERY stop"
        } else {
            "Manageable with discipline"
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NightLoad {
    pub start_hour: f64,
    /// Clock hour (0..24) at the P50 finish.
    pub finish_hour: f64,
    pub night_hours: f64,
    /// Share of the race spent in the dark, 0..=100.
    pub load_percent: f64,
    pub warning: bool,
    pub advice: &'static str,
}

pub fn night_load(course: &Course, forecast: &OutcomeForecast) -> NightLoad {
    let duration = forecast.percentiles.p50;
    let start_hour = course.start_hour();
    let finish_hour = (start_hour + duration).rem_euclid(24.0);

    let finishes_in_dark = finish_hour < execution::NIGHT_END_HOUR
        || (finish_hour > execution::NIGHT_START_HOUR && duration > execution::LONG_RACE_HOURS);
    let night_hours = if finishes_in_dark {
        duration.min(execution::MAX_NIGHT_HOURS)
    } else {
        0.0
    };
    let load_percent = if duration > 0.0 {
        night_hours / duration * 100.0
    } else {
        0.0
    };
    let warning = load_percent > execution::NIGHT_LOAD_WARNING_PCT;

    NightLoad {
        start_hour,
        finish_hour,
        night_hours,
        load_percent,
        warning,
        advice: if warning {
            "Significant night section - headlamp, caffeine critical"
        } else {
            "Minimal/no night running"
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverlapLevel {
    Critical,
    Elevated,
    Low,
}

impl OverlapLevel {
    pub fn description(self) -> &'static str {
        match self {
            OverlapLevel::Critical => "Conditions closely match past DNF triggers",
            OverlapLevel::Elevated => "Some pattern overlap with past struggles",
            OverlapLevel::Low => "Conditions differ from past DNF scenarios",
        }
    }
}

const OVERLAP_BANDS: BandTable<OverlapLevel, 2> = BandTable::new(
    [
        (Threshold::Above(70.0), OverlapLevel::Critical),
        (Threshold::Above(40.0), OverlapLevel::Elevated),
    ],
    OverlapLevel::Low,
);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureOverlap {
    pub score: u32,
    pub level: OverlapLevel,
    pub description: &'static str,
}

pub fn failure_overlap(athlete: &Athlete, course: &Course, temperature_c: f64) -> FailureOverlap {
    let mut score = 0u32;
    if athlete
        .personal_high_risk_c
        .is_some_and(|threshold| temperature_c <= threshold)
    {
        score += execution::RESPIRATORY_OVERLAP;
    }
    if course.course_type == execution::TECHNICAL_COURSE_TYPE
        && athlete
            .past_dnfs
            .iter()
            .any(|dnf| dnf.contains(execution::TECHNICAL_DNF_MARKER))
    {
        score += execution::TECHNICAL_OVERLAP;
    }
    let score = score.min(100);
    let level = OVERLAP_BANDS.classify(f64::from(score));
    FailureOverlap {
        score,
        level,
        description: level.description(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRisk {
    pub pacing: PacingRisk,
    pub dwell_time: DwellTimeCreep,
    pub night_load: NightLoad,
    pub failure_overlap: FailureOverlap,
}

pub fn assess_execution_risk(
    forecast: &OutcomeForecast,
    course: &Course,
    athlete: &Athlete,
    params: &ForecastParams,
) -> ExecutionRisk {
    let risk = ExecutionRisk {
        pacing: pacing_risk(athlete, course),
        dwell_time: dwell_time_creep(course),
        night_load: night_load(course, forecast),
        failure_overlap: failure_overlap(athlete, course, params.temperature_c),
    };
    debug!(
        "Execution risk: pacing {}, dwell creep {:.1}min, night load {:.0}%, overlap {}",
        risk.pacing.score,
        risk.dwell_time.creep_minutes,
        risk.night_load.load_percent,
        risk.failure_overlap.score
    );
    risk
}
