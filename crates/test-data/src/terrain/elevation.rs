//! Perlin noise-based elevation generation.

use noise::{NoiseFn, Perlin};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::errors::ScenarioError;

/// Elevation field sampled at lat/lon coordinates.
///
/// Octaves of Perlin noise are summed with halving amplitude (fBm), then
/// scaled around a base elevation and floored so coastal terrain never dips
/// below the sea.
#[derive(Debug, Clone)]
pub struct ElevationGenerator {
    perlin: Perlin,
    /// Base elevation in meters.
    base_elevation: f64,
    /// Amplitude of the noise in meters.
    height_scale: f64,
    /// Spatial frequency in cycles per degree.
    frequency: f64,
    octaves: u32,
    /// Lowest elevation returned.
    floor: f64,
}

impl ElevationGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 800.0,
            height_scale: 400.0,
            frequency: 40.0,
            octaves: 4,
            floor: 0.0,
        }
    }

    /// Sea cliffs and coves: low base, short sharp relief.
    pub fn coastal(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 120.0,
            height_scale: 180.0,
            frequency: 60.0,
            octaves: 5,
            floor: 0.0,
        }
    }

    /// High passes with long valley climbs.
    pub fn alpine(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 1800.0,
            height_scale: 900.0,
            frequency: 25.0,
            octaves: 5,
            floor: 400.0,
        }
    }

    /// Gentle rolling terrain.
    pub fn rolling(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 300.0,
            height_scale: 50.0,
            frequency: 30.0,
            octaves: 2,
            floor: 0.0,
        }
    }

    pub fn with_base_elevation(mut self, elevation: f64) -> Self {
        self.base_elevation = elevation;
        self
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    pub fn elevation_at(&self, lat: f64, lon: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            total += self.perlin.get([lat * frequency, lon * frequency]) * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        let normalized = if max_amplitude > 0.0 {
            total / max_amplitude
        } else {
            0.0
        };
        (self.base_elevation + normalized * self.height_scale).max(self.floor)
    }

    pub fn elevation_profile(&self, coords: &[(f64, f64)]) -> Vec<f64> {
        coords
            .iter()
            .map(|&(lat, lon)| self.elevation_at(lat, lon))
            .collect()
    }
}

/// Adds barometric noise to an elevation reading.
pub fn add_elevation_jitter(
    elevation: f64,
    rng: &mut impl Rng,
    std_dev: f64,
) -> Result<f64, ScenarioError> {
    let normal = Normal::new(0.0, std_dev)?;
    Ok(elevation + normal.sample(rng))
}
