//! Fluent builder for single race scenarios.

use std::time::Instant;

use forecast::{
    Athlete, AthleteProfile, Course, CourseProfile, ForecastMethod, ForecastParams, RaceReport,
    course_track::{DEFAULT_INTERVAL_KM, read_course_track},
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

use crate::{
    errors::ScenarioError,
    gpx::generate_gpx,
    profiles::{AthletePreset, CoursePreset},
    sources::{CoursePoint, CourseTrackGenerator},
    terrain::ElevationGenerator,
};

/// Result of building a scenario.
#[derive(Debug)]
pub struct ScenarioResult {
    pub athlete: Athlete,
    pub course: Course,
    pub params: ForecastParams,
    pub report: RaceReport,
    /// Synthetic course points, when a track was requested.
    pub track: Option<Vec<CoursePoint>>,
    pub metrics: Option<ScenarioMetrics>,
}

#[derive(Debug, Clone)]
pub struct ScenarioMetrics {
    pub generation_time_ms: u64,
    pub track_points: usize,
}

/// Builder for a complete scenario: two profiles, race-day parameters, and an
/// optional synthetic GPX course that feeds the report's track summary.
///
/// # Example
///
/// ```rust,ignore
/// let result = ScenarioBuilder::new()
///     .with_athlete_preset(AthletePreset::Validated)
///     .with_course_preset(CoursePreset::CoastalRidge)
///     .with_temperature(7.0)
///     .with_synthetic_track(ElevationGenerator::coastal(3))
///     .build()?;
/// ```
pub struct ScenarioBuilder {
    athlete: AthleteProfile,
    course: CourseProfile,
    params: ForecastParams,
    track_terrain: Option<ElevationGenerator>,
    seed: u64,
    track_metrics: bool,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self {
            athlete: AthletePreset::Validated.profile(),
            course: CoursePreset::CoastalRidge.profile(),
            params: ForecastParams::default(),
            track_terrain: None,
            seed: 42,
            track_metrics: false,
        }
    }

    /// Cold alpine race with a Monte Carlo forecast and a synthetic track.
    pub fn cold_alpine() -> Self {
        Self::new()
            .with_course_preset(CoursePreset::AlpineFifty)
            .with_temperature(6.5)
            .with_method(ForecastMethod::monte_carlo(1000, 42))
            .with_synthetic_track(ElevationGenerator::alpine(42))
    }

    pub fn with_athlete(mut self, profile: AthleteProfile) -> Self {
        self.athlete = profile;
        self
    }

    pub fn with_athlete_preset(self, preset: AthletePreset) -> Self {
        self.with_athlete(preset.profile())
    }

    pub fn with_course(mut self, profile: CourseProfile) -> Self {
        self.course = profile;
        self
    }

    pub fn with_course_preset(self, preset: CoursePreset) -> Self {
        self.with_course(preset.profile())
    }

    pub fn with_fitness(mut self, fitness: f64) -> Self {
        self.params = ForecastParams::new(fitness, self.params.temperature_c)
            .with_conditions(self.params.conditions)
            .with_method(self.params.method);
        self
    }

    pub fn with_temperature(mut self, temperature_c: f64) -> Self {
        self.params = ForecastParams::new(self.params.fitness, temperature_c)
            .with_conditions(self.params.conditions)
            .with_method(self.params.method);
        self
    }

    pub fn with_conditions(mut self, conditions: impl Into<String>) -> Self {
        self.params = self.params.with_conditions(conditions);
        self
    }

    pub fn with_method(mut self, method: ForecastMethod) -> Self {
        self.params = self.params.with_method(method);
        self
    }

    /// Generates a course of the race's distance over the given terrain.
    pub fn with_synthetic_track(mut self, terrain: ElevationGenerator) -> Self {
        self.track_terrain = Some(terrain);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    pub fn build(self) -> Result<ScenarioResult, ScenarioError> {
        let start = self.track_metrics.then(Instant::now);

        let athlete = self.athlete.resolve()?;
        let course = self.course.resolve()?;
        let mut report = RaceReport::build(&athlete, &course, &self.params)?;

        let track = match self.track_terrain {
            Some(terrain) => {
                let mut rng = StdRng::seed_from_u64(self.seed);
                let points = CourseTrackGenerator::new(self.seed as u32)
                    .with_elevation(terrain)
                    .with_distance_km(course.distance_km)
                    .with_point_spacing(100.0)
                    .generate(&mut rng)?;
                let gpx = generate_gpx(&points, &course.race_name);
                let measured = read_course_track(gpx.as_slice(), DEFAULT_INTERVAL_KM)?;
                report = report.with_track(&measured);
                Some(points)
            }
            None => None,
        };

        let metrics = start.map(|start| ScenarioMetrics {
            generation_time_ms: start.elapsed().as_millis() as u64,
            track_points: track.as_ref().map_or(0, Vec::len),
        });

        info!(
            "Built scenario for {} on {} ({} track points)",
            athlete.name,
            course.race_name,
            track.as_ref().map_or(0, Vec::len)
        );

        Ok(ScenarioResult {
            athlete,
            course,
            params: self.params,
            report,
            track,
            metrics,
        })
    }
}
