//! Full race briefing: every model evaluated over the same two profiles.

use serde::Serialize;
use tracing::info;

use crate::{
    athlete_state::{AthleteState, athlete_state},
    course_interaction::{CourseInteraction, course_interaction},
    course_track::CourseTrack,
    decision_triggers::{DecisionTriggers, decision_triggers},
    errors::ForecastError,
    execution_risk::{ExecutionRisk, assess_execution_risk},
    outcome::{OutcomeForecast, forecast_outcome},
    params::ForecastParams,
    profiles::{Athlete, Course, KeySegment},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentBrief {
    pub index: usize,
    pub name: String,
    pub start_km: f64,
    pub end_km: f64,
    pub length_km: f64,
    pub difficulty_rating: String,
    pub description: String,
    pub strategy_notes: String,
    pub key_challenges: Vec<String>,
}

impl SegmentBrief {
    fn new(index: usize, segment: &KeySegment) -> Self {
        Self {
            index,
            name: segment.name.clone(),
            start_km: segment.start_km,
            end_km: segment.end_km,
            length_km: segment.length_km(),
            difficulty_rating: segment.difficulty_rating.clone(),
            description: segment.description.clone(),
            strategy_notes: segment.strategy_notes.clone(),
            key_challenges: segment.key_challenges.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceSummary {
    pub athlete: String,
    pub race_name: String,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub elevation_loss_m: f64,
    pub start_time: String,
    pub course_type: String,
}

/// Measured elevation profile from a GPX file, when one was supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub total_distance_km: f64,
    pub total_gain_m: f64,
    pub total_loss_m: f64,
    pub steepest_climb_pct: f64,
    pub steepest_descent_pct: f64,
    pub samples: usize,
}

impl From<&CourseTrack> for TrackSummary {
    fn from(track: &CourseTrack) -> Self {
        let (up, down) = track.gradient_extremes();
        Self {
            total_distance_km: track.total_distance_km,
            total_gain_m: track.total_gain_m,
            total_loss_m: track.total_loss_m,
            steepest_climb_pct: up,
            steepest_descent_pct: down,
            samples: track.profile.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceReport {
    pub summary: RaceSummary,
    pub params: ForecastParams,
    pub forecast: OutcomeForecast,
    pub execution_risk: ExecutionRisk,
    pub decision_triggers: DecisionTriggers,
    pub course_interaction: CourseInteraction,
    pub athlete_state: AthleteState,
    pub segments: Vec<SegmentBrief>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<TrackSummary>,
}

impl RaceReport {
    pub fn build(
        athlete: &Athlete,
        course: &Course,
        params: &ForecastParams,
    ) -> Result<Self, ForecastError> {
        info!(
            "Building report for {} on {} (fitness {}, {}°C, {})",
            athlete.name, course.race_name, params.fitness, params.temperature_c, params.conditions
        );

        let forecast = forecast_outcome(course, athlete, params)?;
        let execution_risk = assess_execution_risk(&forecast, course, athlete, params);
        let decision_triggers = decision_triggers(&forecast, athlete, params);

        Ok(Self {
            summary: RaceSummary {
                athlete: athlete.name.clone(),
                race_name: course.race_name.clone(),
                distance_km: course.distance_km,
                elevation_gain_m: course.elevation_gain_m,
                elevation_loss_m: course.elevation_loss_m,
                start_time: format!(
                    "{:02}:{:02}",
                    course.start_time.hour(),
                    course.start_time.minute()
                ),
                course_type: course.course_type.clone(),
            },
            params: params.clone(),
            execution_risk,
            decision_triggers,
            course_interaction: course_interaction(athlete, course),
            athlete_state: athlete_state(athlete, params.fitness),
            segments: course
                .key_segments
                .iter()
                .enumerate()
                .map(|(i, segment)| SegmentBrief::new(i + 1, segment))
                .collect(),
            forecast,
            track: None,
        })
    }

    pub fn with_track(mut self, track: &CourseTrack) -> Self {
        self.track = Some(TrackSummary::from(track));
        self
    }
}
