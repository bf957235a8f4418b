//! Athlete and course profile documents.
//!
//! Raw documents deserialize straight from JSON with every optional section
//! left as `Option`. `resolve()` applies one defaults table per document and
//! returns a fully populated [`Athlete`] or [`Course`], so the models never
//! deal with absent data.

mod athlete;
mod course;
mod lenient;

pub use athlete::{
    AerobicCapacity, Athlete, AthleteInfo, AthleteProfile, DescentRating, FitnessBaseline,
    HealthProfile, HeartRateProfile, HeartRateZones, PhysiologicalProfile, RacingExperience,
    RespiratoryConditions, RespiratoryProfile, TemperatureBands, TemperatureRiskBands,
    TemperatureThresholds, TerrainAdvantages, TrainingLoad, TrainingLoadBaseline, ZoneRange,
};
pub use course::{
    AidStationModel, AidStations, Course, CourseMetadata, CourseProfile, FatigueModel,
    FatigueModelDoc, FieldEffects, KeySegment, Runnability, SimulationDefaults, Technicality,
    TerrainProfile, ValidationTargets, parse_clock, parse_duration_hours,
};
