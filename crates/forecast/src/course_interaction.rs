//! Descriptive fit between the athlete's terrain skills and the course.
//! Nothing here feeds back into the forecast.

use serde::Serialize;

use crate::{
    bands::{BandTable, Threshold},
    constants::athlete as athlete_consts,
    profiles::{Athlete, Course, DescentRating},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimbingRating {
    Strong,
    Competitive,
    Average,
}

const CLIMBING_BANDS: BandTable<ClimbingRating, 2> = BandTable::new(
    [
        (Threshold::Above(55.0), ClimbingRating::Strong),
        (Threshold::Above(50.0), ClimbingRating::Competitive),
    ],
    ClimbingRating::Average,
);

/// Terrain figures of the course the athlete is matched against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseTerrain {
    pub course_type: String,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub elevation_loss_m: f64,
    pub runnable_fraction: f64,
    pub technical_multiplier: f64,
    pub field_loss_multiplier_technical: f64,
    pub fatigue_inflection_km: f64,
    pub fatigue_slope_multiplier: f64,
}

impl From<&Course> for CourseTerrain {
    fn from(course: &Course) -> Self {
        Self {
            course_type: course.course_type.clone(),
            distance_km: course.distance_km,
            elevation_gain_m: course.elevation_gain_m,
            elevation_loss_m: course.elevation_loss_m,
            runnable_fraction: course.runnable_fraction,
            technical_multiplier: course.dry_multiplier,
            field_loss_multiplier_technical: course.field_loss_multiplier_technical,
            fatigue_inflection_km: course.fatigue.inflection_km,
            fatigue_slope_multiplier: course.fatigue.slope_multiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseInteraction {
    pub terrain: CourseTerrain,
    pub descending: DescentRating,
    pub descending_strength: bool,
    pub climbing: ClimbingRating,
    pub vo2_max: f64,
    pub technical_strength: bool,
}

pub fn course_interaction(athlete: &Athlete, course: &Course) -> CourseInteraction {
    CourseInteraction {
        terrain: CourseTerrain::from(course),
        descending: athlete.steep_descents,
        descending_strength: athlete.steep_descents.is_strength(),
        climbing: CLIMBING_BANDS.classify(athlete.vo2_max),
        vo2_max: athlete.vo2_max,
        technical_strength: athlete.has_strength(athlete_consts::TECHNICAL_STRENGTH),
    }
}
