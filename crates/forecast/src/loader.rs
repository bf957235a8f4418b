//! Reads profile documents from JSON and resolves them.

use std::{fs, path::Path};

use tracing::debug;

use crate::{
    errors::ForecastError,
    profiles::{Athlete, AthleteProfile, Course, CourseProfile},
};

pub fn athlete_from_json_str(json: &str) -> Result<Athlete, ForecastError> {
    serde_json::from_str::<AthleteProfile>(json)?.resolve()
}

pub fn course_from_json_str(json: &str) -> Result<Course, ForecastError> {
    serde_json::from_str::<CourseProfile>(json)?.resolve()
}

pub fn load_athlete_profile(path: impl AsRef<Path>) -> Result<Athlete, ForecastError> {
    let path = path.as_ref();
    debug!("Loading athlete profile from {}", path.display());
    athlete_from_json_str(&fs::read_to_string(path)?)
}

pub fn load_course_profile(path: impl AsRef<Path>) -> Result<Course, ForecastError> {
    let path = path.as_ref();
    debug!("Loading course profile from {}", path.display());
    course_from_json_str(&fs::read_to_string(path)?)
}
