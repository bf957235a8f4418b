//! Configuration types for scenario batches.

use serde::{Deserialize, Serialize};

use crate::errors::ScenarioError;

/// Finish-time window, in hours, counted as a successful outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetWindow {
    pub min_hours: f64,
    pub max_hours: f64,
}

impl TargetWindow {
    pub const fn new(min_hours: f64, max_hours: f64) -> Self {
        Self {
            min_hours,
            max_hours,
        }
    }

    pub fn contains(&self, hours: f64) -> bool {
        hours >= self.min_hours && hours <= self.max_hours
    }
}

/// Configuration for a randomized scenario batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of scenarios to draw.
    pub num_scenarios: usize,

    /// Fitness is drawn uniformly from this inclusive range.
    pub fitness_range: (f64, f64),

    /// Seed for the scenario RNG.
    pub seed: u64,

    /// Optional success window for the analysis.
    pub target: Option<TargetWindow>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            num_scenarios: 1000,
            fitness_range: (0.95, 1.15),
            seed: 42,
            target: None,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let (lo, hi) = self.fitness_range;
        if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi) {
            return Err(ScenarioError::Config(format!(
                "fitness range ({lo}, {hi}) must be positive and ordered"
            )));
        }
        if let Some(target) = self.target
            && target.min_hours > target.max_hours
        {
            return Err(ScenarioError::Config(format!(
                "target window {}h..{}h is inverted",
                target.min_hours, target.max_hours
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = BatchConfig::default();
        assert_eq!(config.fitness_range, (0.95, 1.15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let config = BatchConfig {
            fitness_range: (1.2, 1.0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScenarioError::Config(_))));

        let config = BatchConfig {
            target: Some(TargetWindow::new(6.0, 5.0)),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target_window_is_inclusive() {
        let window = TargetWindow::new(4.5, 5.0);
        assert!(window.contains(4.5));
        assert!(window.contains(5.0));
        assert!(!window.contains(5.01));
    }
}
