//! Stochastic scenario generators.
//!
//! - [`weather`]: race-day temperature and conditions drawn from a weighted mix
//! - [`scenario`]: seeded batches of fitness/weather scenarios, forecast in parallel

pub mod scenario;
pub mod weather;

pub use scenario::{Scenario, ScenarioGenerator, ScenarioOutcome};
pub use weather::{WeatherKind, WeatherSample, weather_pool};
