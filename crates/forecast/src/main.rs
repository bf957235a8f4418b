use forecast::{
    RaceReport,
    config::RunConfig,
    course_track::{DEFAULT_INTERVAL_KM, load_course_track},
    loader::{load_athlete_profile, load_course_profile},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = RunConfig::from_env()?;
    let athlete = load_athlete_profile(&config.athlete_path)?;
    let course = load_course_profile(&config.course_path)?;

    let mut report = RaceReport::build(&athlete, &course, &config.params)?;
    if let Some(path) = &config.gpx_path {
        let track = load_course_track(path, DEFAULT_INTERVAL_KM)?;
        report = report.with_track(&track);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
