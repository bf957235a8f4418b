//! Fluent builder APIs for race scenarios.

mod scenario;

pub use scenario::{ScenarioBuilder, ScenarioMetrics, ScenarioResult};
