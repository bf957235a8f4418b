//! Ordered threshold tables for categorical labeling.
//!
//! A [`BandTable`] is checked row by row; the first row whose threshold
//! matches wins, and anything that matches no row (including NaN) falls
//! through to the `otherwise` label. Every input therefore maps to exactly
//! one label.

use serde::Serialize;

/// Comparison applied to a value by one row of a [`BandTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Threshold {
    AtMost(f64),
    AtLeast(f64),
    Above(f64),
}

impl Threshold {
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Threshold::AtMost(limit) => value <= limit,
            Threshold::AtLeast(limit) => value >= limit,
            Threshold::Above(limit) => value > limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BandTable<L, const N: usize> {
    rows: [(Threshold, L); N],
    otherwise: L,
}

impl<L: Copy, const N: usize> BandTable<L, N> {
    pub const fn new(rows: [(Threshold, L); N], otherwise: L) -> Self {
        Self { rows, otherwise }
    }

    pub fn classify(&self, value: f64) -> L {
        self.rows
            .iter()
            .find(|(threshold, _)| threshold.matches(value))
            .map_or(self.otherwise, |(_, label)| *label)
    }

    pub fn rows(&self) -> &[(Threshold, L); N] {
        &self.rows
    }

    pub fn otherwise(&self) -> L {
        self.otherwise
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Level {
        Cold,
        Cool,
        Warm,
    }

    const TABLE: BandTable<Level, 2> = BandTable::new(
        [
            (Threshold::AtMost(5.0), Level::Cold),
            (Threshold::AtMost(10.0), Level::Cool),
        ],
        Level::Warm,
    );

    #[test]
    fn test_first_match_wins() {
        assert_eq!(TABLE.classify(-3.0), Level::Cold);
        assert_eq!(TABLE.classify(5.0), Level::Cold);
        assert_eq!(TABLE.classify(5.01), Level::Cool);
        assert_eq!(TABLE.classify(10.0), Level::Cool);
        assert_eq!(TABLE.classify(10.5), Level::Warm);
    }

    #[test]
    fn test_nan_falls_through() {
        assert_eq!(TABLE.classify(f64::NAN), Level::Warm);
    }

    #[test]
    fn test_descending_table() {
        let table = BandTable::new(
            [(Threshold::Above(60.0), 'H'), (Threshold::Above(40.0), 'M')],
            'L',
        );
        assert_eq!(table.classify(61.0), 'H');
        assert_eq!(table.classify(60.0), 'M');
        assert_eq!(table.classify(40.0), 'L');
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.otherwise(), 'L');
    }

    #[test]
    fn test_at_least() {
        assert!(Threshold::AtLeast(55.0).matches(55.0));
        assert!(!Threshold::Above(55.0).matches(55.0));
    }
}
