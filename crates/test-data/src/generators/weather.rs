//! Race-day weather scenarios.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::errors::ScenarioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WeatherKind {
    Typical,
    Cold,
    Optimal,
    Warm,
}

impl WeatherKind {
    pub const ALL: [WeatherKind; 4] = [
        WeatherKind::Typical,
        WeatherKind::Cold,
        WeatherKind::Optimal,
        WeatherKind::Warm,
    ];

    /// Share of the weather pool.
    pub fn share(self) -> f64 {
        match self {
            WeatherKind::Typical => 0.4,
            WeatherKind::Cold => 0.2,
            WeatherKind::Optimal => 0.3,
            WeatherKind::Warm => 0.1,
        }
    }

    /// Mean and standard deviation of the temperature draw (°C).
    fn temperature_normal(self) -> (f64, f64) {
        match self {
            WeatherKind::Typical => (11.0, 2.5),
            WeatherKind::Cold => (7.0, 2.0),
            WeatherKind::Optimal => (14.0, 1.5),
            WeatherKind::Warm => (17.0, 2.0),
        }
    }

    /// Inclusive clamp applied to the temperature draw (°C).
    pub fn temperature_bounds(self) -> (f64, f64) {
        match self {
            WeatherKind::Typical => (4.0, 16.0),
            WeatherKind::Cold => (2.0, 10.0),
            WeatherKind::Optimal => (12.0, 16.0),
            WeatherKind::Warm => (15.0, 20.0),
        }
    }

    /// Chance of light rain; only typical days see any.
    fn rain_probability(self) -> f64 {
        match self {
            WeatherKind::Typical => 0.25,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSample {
    pub kind: WeatherKind,
    pub temperature_c: f64,
    /// `dry` or `light_rain`.
    pub conditions: String,
}

impl WeatherSample {
    pub fn draw(kind: WeatherKind, rng: &mut impl Rng) -> Result<Self, ScenarioError> {
        let (mean, std_dev) = kind.temperature_normal();
        let (lo, hi) = kind.temperature_bounds();
        let temperature_c = Normal::new(mean, std_dev)?.sample(rng).clamp(lo, hi);
        let conditions = if rng.r#gen::<f64>() < kind.rain_probability() {
            "light_rain"
        } else {
            "dry"
        };

        Ok(Self {
            kind,
            temperature_c,
            conditions: conditions.to_string(),
        })
    }
}

/// Builds a pool of `size` weather samples split by each kind's share
/// (truncated, so the pool can come up a few short of `size`).
pub fn weather_pool(size: usize, rng: &mut impl Rng) -> Result<Vec<WeatherSample>, ScenarioError> {
    let mut pool = Vec::with_capacity(size);
    for kind in WeatherKind::ALL {
        let count = (size as f64 * kind.share()) as usize;
        for _ in 0..count {
            pool.push(WeatherSample::draw(kind, rng)?);
        }
    }
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_shares_sum_to_one() {
        let total: f64 = WeatherKind::ALL.iter().map(|k| k.share()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pool_split() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = weather_pool(200, &mut rng).unwrap();
        assert_eq!(pool.len(), 200);

        let count = |kind| pool.iter().filter(|w| w.kind == kind).count();
        assert_eq!(count(WeatherKind::Typical), 80);
        assert_eq!(count(WeatherKind::Cold), 40);
        assert_eq!(count(WeatherKind::Optimal), 60);
        assert_eq!(count(WeatherKind::Warm), 20);
    }

    #[test]
    fn test_temperatures_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for kind in WeatherKind::ALL {
            let (lo, hi) = kind.temperature_bounds();
            for _ in 0..500 {
                let sample = WeatherSample::draw(kind, &mut rng).unwrap();
                assert!(sample.temperature_c >= lo && sample.temperature_c <= hi);
            }
        }
    }

    #[test]
    fn test_only_typical_days_rain() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = weather_pool(1000, &mut rng).unwrap();
        assert!(pool
            .iter()
            .filter(|w| w.kind != WeatherKind::Typical)
            .all(|w| w.conditions == "dry"));
        let rainy = pool.iter().filter(|w| w.conditions == "light_rain").count();
        assert!(rainy > 50 && rainy < 150);
    }
}
