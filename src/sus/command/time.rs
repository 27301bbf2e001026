//! Definitions of time in SUS.

use num::{Rational64, ToPrimitive, Zero};

/// A measure index in the score, decoded from the `#mmm` head of a timed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure(pub u32);

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// A measure-space position: the measure index plus the fractional offset in the measure.
///
/// It is kept as an exact rational, so comparing with a time signature anchor never suffers from rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurePosition(Rational64);

impl MeasurePosition {
    /// The origin of the score, the head of measure 0.
    pub const ZERO: Self = Self(Rational64::new_raw(0, 1));

    /// Creates the position of the `numerator / denominator` point in the `measure`.
    ///
    /// Returns `None` if `denominator` is 0.
    #[must_use]
    pub fn new(measure: Measure, numerator: u32, denominator: u32) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let offset = Rational64::new(i64::from(numerator), i64::from(denominator));
        Some(Self(Rational64::from_integer(i64::from(measure.0)) + offset))
    }

    /// Creates the position at the head of the `measure`.
    #[must_use]
    pub fn head_of(measure: Measure) -> Self {
        Self(Rational64::from_integer(i64::from(measure.0)))
    }

    /// Returns the exact rational value.
    #[must_use]
    pub const fn as_rational(&self) -> Rational64 {
        self.0
    }

    /// Returns `other - self` in measures as `f64`.
    #[must_use]
    pub fn measures_until(&self, other: Self) -> f64 {
        let diff = other.0 - self.0;
        if diff.is_zero() {
            return 0.0;
        }
        diff.to_f64().unwrap_or(f64::NAN)
    }

    /// Returns the value in measures as `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl From<Measure> for MeasurePosition {
    fn from(measure: Measure) -> Self {
        Self::head_of(measure)
    }
}

impl std::fmt::Display for MeasurePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
