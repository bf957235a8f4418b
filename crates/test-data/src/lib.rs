//! Test data generation for ultra-forecast.
//!
//! This crate provides profile presets, randomized race-day scenarios, batch
//! outcome analysis, and synthetic GPX courses to support manual verification
//! and integration testing of the `forecast` crate.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! let athlete = AthletePreset::Validated.resolve()?;
//! let course = CoursePreset::CoastalRidge.resolve()?;
//! let generator = ScenarioGenerator::new(BatchConfig {
//!     num_scenarios: 500,
//!     target: Some(TargetWindow::new(4.5, 5.0)),
//!     ..Default::default()
//! })?;
//! let outcomes = generator.run(&athlete, &course)?;
//! let analysis = analyze(&outcomes, generator.config().target);
//! ```

pub mod analysis;
pub mod builders;
pub mod config;
pub mod errors;
pub mod generators;
pub mod gpx;
pub mod profiles;
pub mod sources;
pub mod terrain;

pub use errors::ScenarioError;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::analysis::{BatchAnalysis, analyze};
    pub use crate::builders::{ScenarioBuilder, ScenarioMetrics, ScenarioResult};
    pub use crate::config::{BatchConfig, TargetWindow};
    pub use crate::errors::ScenarioError;
    pub use crate::generators::{
        Scenario, ScenarioGenerator, ScenarioOutcome, WeatherKind, WeatherSample,
    };
    pub use crate::gpx::{generate_gpx, write_gpx};
    pub use crate::profiles::{AthletePreset, CoursePreset};
    pub use crate::sources::{CoursePoint, CourseTrackGenerator};
    pub use crate::terrain::ElevationGenerator;
}
