//! Synthetic terrain for course tracks.
//!
//! Elevation comes from layered Perlin noise so generated courses have long
//! climbs with small-scale roughness on top.

mod elevation;

pub use elevation::{ElevationGenerator, add_elevation_jitter};
