pub mod athlete_state;
pub mod bands;
pub mod config;
pub mod constants;
pub mod course_interaction;
pub mod course_track;
pub mod decision_triggers;
pub mod errors;
pub mod execution_risk;
pub mod fitness_tracker;
pub mod loader;
pub mod monte_carlo;
pub mod outcome;
pub mod params;
pub mod profiles;
pub mod report;
pub mod respiratory;
pub mod sweep;

pub use errors::ForecastError;
pub use params::{ForecastMethod, ForecastParams};
pub use profiles::{Athlete, AthleteProfile, Course, CourseProfile};
pub use report::RaceReport;
