//! Distance functions for Krippendorff's alpha

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Pairwise distance between two judgments.
///
/// Implementations must be symmetric and return zero for equal values.
pub trait Distance {
    fn distance(&self, a: f64, b: f64) -> f64;
}

/// Built-in measurement scales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// 0 for equal values, 1 otherwise
    Nominal,
    /// Squared difference
    #[default]
    Interval,
    /// Squared difference relative to the sum
    Ratio,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Nominal => "nominal",
            Metric::Interval => "interval",
            Metric::Ratio => "ratio",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Distance for Metric {
    fn distance(&self, a: f64, b: f64) -> f64 {
        match self {
            Metric::Nominal => {
                if a == b {
                    0.0
                } else {
                    1.0
                }
            }
            Metric::Interval => (a - b) * (a - b),
            Metric::Ratio => {
                let sum = a + b;
                if sum == 0.0 {
                    0.0
                } else {
                    let d = (a - b) / sum;
                    d * d
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal() {
        assert_eq!(Metric::Nominal.distance(1.0, 1.0), 0.0);
        assert_eq!(Metric::Nominal.distance(1.0, 4.0), 1.0);
    }

    #[test]
    fn test_interval() {
        assert_eq!(Metric::Interval.distance(1.0, 4.0), 9.0);
        assert_eq!(Metric::Interval.distance(4.0, 1.0), 9.0);
    }

    #[test]
    fn test_ratio() {
        assert_eq!(Metric::Ratio.distance(0.0, 0.0), 0.0);
        assert!((Metric::Ratio.distance(1.0, 3.0) - 0.25).abs() < 1e-12);
    }
}
