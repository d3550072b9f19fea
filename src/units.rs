//! This module defines the unit types used by the forecasting engine.
use crate::utils::round_to_one_decimal;
use serde::{Deserialize, Serialize};

/// A rate or share expressed in percentage points (e.g. `4.5` means 4.5%).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Display,
)]
#[display("{_0}%")]
pub struct Percent(pub f64);

impl Percent {
    /// Returns the value as a fraction (e.g. 4.5% becomes 0.045).
    pub fn as_fraction(self) -> f64 {
        self.0 / 100.0
    }

    /// Whether the value is neither infinite nor NaN
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// The relative change from `from` to `to`, rounded to one decimal place.
    ///
    /// Returns zero if `from` is zero.
    pub fn change(from: f64, to: f64) -> Self {
        if from == 0.0 {
            return Self(0.0);
        }

        Self(round_to_one_decimal((to - from) / from * 100.0))
    }
}

impl std::ops::Mul<f64> for Percent {
    type Output = Percent;

    fn mul(self, rhs: f64) -> Self::Output {
        Percent(self.0 * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, 150.0, 50.0)]
    #[case(518.0, 1067.0, 106.0)]
    #[case(2179.0, 4727.0, 116.9)]
    #[case(200.0, 100.0, -50.0)]
    #[case(0.0, 100.0, 0.0)]
    fn test_percent_change(#[case] from: f64, #[case] to: f64, #[case] expected: f64) {
        assert_eq!(Percent::change(from, to), Percent(expected));
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent(4.5).to_string(), "4.5%");
    }

    #[test]
    fn test_percent_arithmetic() {
        assert_eq!(Percent(2.0) + Percent(1.5), Percent(3.5));
        assert_eq!(Percent(2.0) * 0.5, Percent(1.0));
        assert_eq!(Percent(4.5).as_fraction(), 0.045);
    }
}
