//! Procedural course generation.

use geo::{Destination as _, Distance as _, Haversine, geometry::Point};
use rand::Rng;
use tracing::debug;

use crate::errors::ScenarioError;
use crate::terrain::{ElevationGenerator, add_elevation_jitter};

/// One point of a synthetic course.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoursePoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
}

impl CoursePoint {
    fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

#[derive(Debug, Clone)]
pub struct TrackConfig {
    /// Target course length in kilometers.
    pub distance_km: f64,
    /// Start (lat, lon).
    pub start_point: (f64, f64),
    /// Approximate distance between points in meters.
    pub point_spacing_m: f64,
    /// Largest heading change per step, in degrees.
    pub max_turn_deg: f64,
    /// Standard deviation of elevation noise in meters.
    pub elevation_jitter_m: f64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            distance_km: 10.0,
            start_point: (43.21, 5.54),
            point_spacing_m: 50.0,
            max_turn_deg: 15.0,
            elevation_jitter_m: 2.0,
        }
    }
}

/// Generates synthetic courses with momentum-driven headings.
pub struct CourseTrackGenerator {
    config: TrackConfig,
    elevation: ElevationGenerator,
}

impl CourseTrackGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            config: TrackConfig::default(),
            elevation: ElevationGenerator::coastal(seed),
        }
    }

    pub fn with_distance_km(mut self, km: f64) -> Self {
        self.config.distance_km = km;
        self
    }

    pub fn with_start(mut self, lat: f64, lon: f64) -> Self {
        self.config.start_point = (lat, lon);
        self
    }

    pub fn with_point_spacing(mut self, meters: f64) -> Self {
        self.config.point_spacing_m = meters;
        self
    }

    pub fn with_elevation(mut self, elevation: ElevationGenerator) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn generate(&self, rng: &mut impl Rng) -> Result<Vec<CoursePoint>, ScenarioError> {
        let path = self.generate_path(rng)?;
        let points = path
            .into_iter()
            .map(|p| -> Result<CoursePoint, ScenarioError> {
                let elevation = add_elevation_jitter(
                    self.elevation.elevation_at(p.y(), p.x()),
                    rng,
                    self.config.elevation_jitter_m,
                )?;
                Ok(CoursePoint {
                    lat: p.y(),
                    lon: p.x(),
                    elevation: Some(elevation),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Generated course of {} points over {:.2} km",
            points.len(),
            path_length_km(&points)
        );
        Ok(points)
    }

    /// Walks the course without elevation. The final step is shortened so the
    /// path length lands on the target distance.
    pub fn generate_path(&self, rng: &mut impl Rng) -> Result<Vec<Point>, ScenarioError> {
        let TrackConfig {
            distance_km,
            start_point: (lat, lon),
            point_spacing_m,
            max_turn_deg,
            ..
        } = self.config;

        if !(distance_km > 0.0 && point_spacing_m > 0.0) {
            return Err(ScenarioError::Config(format!(
                "course needs positive distance and spacing, got {distance_km} km / {point_spacing_m} m"
            )));
        }

        let target_m = distance_km * 1000.0;
        let mut current = Point::new(lon, lat);
        let mut path = vec![current];
        let mut heading: f64 = rng.gen_range(0.0..360.0);
        let mut walked = 0.0;

        while walked < target_m {
            if max_turn_deg > 0.0 {
                heading = (heading + rng.gen_range(-max_turn_deg..max_turn_deg)).rem_euclid(360.0);
            }
            let step = (point_spacing_m * rng.gen_range(0.8..1.2)).min(target_m - walked);
            current = Haversine.destination(current, heading, step);
            path.push(current);
            walked += step;
        }

        Ok(path)
    }
}

/// Haversine length of a point sequence.
pub fn path_length_km(points: &[CoursePoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| Haversine.distance(pair[0].point(), pair[1].point()))
        .sum::<f64>()
        / 1000.0
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_generate_course() {
        let mut rng = StdRng::seed_from_u64(42);
        let course = CourseTrackGenerator::new(42)
            .with_distance_km(5.0)
            .generate(&mut rng)
            .unwrap();

        assert!(course.len() > 80);
        assert!(course.iter().all(|p| p.elevation.is_some()));
        assert!((path_length_km(&course) - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_same_seed_same_course() {
        let generator = CourseTrackGenerator::new(9).with_distance_km(2.0);
        let a = generator.generate(&mut StdRng::seed_from_u64(5)).unwrap();
        let b = generator.generate(&mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_starts_at_configured_point() {
        let mut rng = StdRng::seed_from_u64(1);
        let path = CourseTrackGenerator::new(1)
            .with_start(45.92, 6.87)
            .with_distance_km(1.0)
            .generate_path(&mut rng)
            .unwrap();
        assert_eq!((path[0].y(), path[0].x()), (45.92, 6.87));
    }

    #[test]
    fn test_rejects_zero_spacing() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = CourseTrackGenerator::new(1)
            .with_point_spacing(0.0)
            .generate_path(&mut rng);
        assert!(matches!(result, Err(ScenarioError::Config(_))));
    }
}
