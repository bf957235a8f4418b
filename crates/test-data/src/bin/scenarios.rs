//! Randomized scenario batch over the validated athlete and course presets,
//! or over the profiles named by `ATHLETE_PROFILE` / `COURSE_PROFILE`.
//!
//! Run with:
//! ```
//! SCENARIO_COUNT=2000 TARGET_HOURS=4.5-5.0 cargo run -p test-data --bin scenarios
//! ```
//!
//! Set `COURSE_GPX_OUT` to also write a synthetic course track for the race.

use std::env;

use forecast::loader::{load_athlete_profile, load_course_profile};
use rand::{SeedableRng, rngs::StdRng};
use test_data::{
    analysis::analyze,
    config::{BatchConfig, TargetWindow},
    generators::ScenarioGenerator,
    gpx::write_gpx,
    profiles::{AthletePreset, CoursePreset},
    sources::CourseTrackGenerator,
};
use tracing_subscriber::EnvFilter;

fn parse_target(value: &str) -> Option<TargetWindow> {
    let (lo, hi) = value.split_once('-')?;
    Some(TargetWindow::new(lo.trim().parse().ok()?, hi.trim().parse().ok()?))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let athlete = match env::var("ATHLETE_PROFILE") {
        Ok(path) => load_athlete_profile(path)?,
        Err(_) => AthletePreset::Validated.resolve()?,
    };
    let course = match env::var("COURSE_PROFILE") {
        Ok(path) => load_course_profile(path)?,
        Err(_) => CoursePreset::CoastalRidge.resolve()?,
    };

    let defaults = BatchConfig::default();
    let config = BatchConfig {
        num_scenarios: env::var("SCENARIO_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.num_scenarios),
        seed: env::var("SCENARIO_SEED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.seed),
        target: env::var("TARGET_HOURS").ok().as_deref().and_then(parse_target),
        ..defaults
    };

    let generator = ScenarioGenerator::new(config)?;
    let outcomes = generator.run(&athlete, &course)?;
    let analysis = analyze(&outcomes, generator.config().target);

    if let Some(stats) = &analysis.time_statistics {
        tracing::info!("Batch completed!");
        tracing::info!("  Scenarios: {}", analysis.total_scenarios);
        tracing::info!("  Median: {:.2}h", stats.median);
        tracing::info!("  P10-P90: {:.2}h - {:.2}h", stats.p10, stats.p90);
    }

    if let Ok(path) = env::var("COURSE_GPX_OUT") {
        let mut rng = StdRng::seed_from_u64(generator.config().seed);
        let points = CourseTrackGenerator::new(generator.config().seed as u32)
            .with_distance_km(course.distance_km)
            .with_point_spacing(100.0)
            .generate(&mut rng)?;
        write_gpx(&path, &points, &course.race_name)?;
        tracing::info!("  Course track: {} points written to {}", points.len(), path);
    }

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
