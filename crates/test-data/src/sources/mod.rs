//! Sources of course geometry.
//!
//! [`CourseTrackGenerator`] walks a synthetic course of a given length and
//! drapes it over an [`ElevationGenerator`](crate::terrain::ElevationGenerator).

mod procedural;

pub use procedural::{CoursePoint, CourseTrackGenerator, TrackConfig, path_length_km};
