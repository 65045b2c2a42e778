//! Beat definition for the `.mc` format. It represents only a position on the score, so you need
//! to know the BPMs before it for finding the happening milliseconds of a note.

use std::{cmp::Ordering, fmt, hash::Hash};

use num::{CheckedAdd, ToPrimitive, rational::Rational64};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw position in a chart, written as `[measure, numerator, denominator]` in the source.
///
/// It means `measure + numerator / denominator` beats from the start of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Beat(pub i64, pub i64, pub i64);

impl Beat {
    /// Creates a new `Beat` from its parts.
    #[must_use]
    pub const fn new(measure: i64, numerator: i64, denominator: i64) -> Self {
        Self(measure, numerator, denominator)
    }

    /// Creates a `Beat` on the start of `measure`.
    #[must_use]
    pub const fn start_of(measure: i64) -> Self {
        Self(measure, 0, 1)
    }

    /// Whole part of the beat.
    #[must_use]
    pub const fn measure(self) -> i64 {
        self.0
    }

    /// Numerator of the fractional part.
    #[must_use]
    pub const fn numerator(self) -> i64 {
        self.1
    }

    /// Denominator of the fractional part.
    #[must_use]
    pub const fn denominator(self) -> i64 {
        self.2
    }

    /// Evaluates `measure + numerator / denominator`.
    ///
    /// # Errors
    ///
    /// - [`BeatError::DivisionByZero`] if the denominator is zero.
    /// - [`BeatError::Overflow`] if the sum does not fit in 64-bit integers.
    pub fn position(self) -> Result<BeatPosition, BeatError> {
        let Self(measure, numerator, denominator) = self;
        if denominator == 0 {
            return Err(BeatError::DivisionByZero(self));
        }
        // `Ratio::new` negates a negative denominator while reducing.
        if numerator == i64::MIN || denominator == i64::MIN {
            return Err(BeatError::Overflow(self));
        }
        let exact = Rational64::from_integer(measure)
            .checked_add(&Rational64::new(numerator, denominator))
            .ok_or(BeatError::Overflow(self))?;
        BeatPosition::from_exact(exact).ok_or(BeatError::Overflow(self))
    }
}

impl fmt::Display for Beat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0, self.1, self.2)
    }
}

/// Errors on evaluating a [`Beat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum BeatError {
    /// The denominator was zero.
    #[error("beat {0} has zero denominator")]
    DivisionByZero(Beat),
    /// The beat was too large to be represented.
    #[error("beat {0} overflows")]
    Overflow(Beat),
}

/// Evaluated position in beats.
///
/// Comparison is exact on the rational value, and [`BeatPosition::value`] gives the real value
/// used for time calculation.
#[derive(Debug, Clone, Copy)]
pub struct BeatPosition {
    exact: Rational64,
    value: f64,
}

impl BeatPosition {
    fn from_exact(exact: Rational64) -> Option<Self> {
        let value = exact.to_f64()?;
        Some(Self { exact, value })
    }

    /// Creates a position on a whole beat.
    #[must_use]
    pub fn from_integer(beats: i64) -> Self {
        Self {
            exact: Rational64::from_integer(beats),
            value: beats as f64,
        }
    }

    /// Gets the exact rational value.
    #[must_use]
    pub const fn exact(self) -> Rational64 {
        self.exact
    }

    /// Gets the real value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.value
    }

    /// Beats from `earlier` to `self` as a real value. Negative if `earlier` is after `self`.
    #[must_use]
    pub fn beats_since(self, earlier: Self) -> f64 {
        self.value - earlier.value
    }
}

impl PartialEq for BeatPosition {
    fn eq(&self, other: &Self) -> bool {
        self.exact == other.exact
    }
}

impl Eq for BeatPosition {}

impl PartialOrd for BeatPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BeatPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.exact.cmp(&other.exact)
    }
}

impl Hash for BeatPosition {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.exact.hash(state);
    }
}

impl TryFrom<Beat> for BeatPosition {
    type Error = BeatError;

    fn try_from(value: Beat) -> Result<Self, Self::Error> {
        value.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_fraction() {
        assert_eq!(Beat::new(0, 0, 1).position().unwrap().value(), 0.0);
        assert_eq!(Beat::new(1, 1, 2).position().unwrap().value(), 1.5);
        assert_eq!(Beat::new(3, 3, 4).position().unwrap().value(), 3.75);
        assert_eq!(Beat::new(2, 4, 4).position().unwrap().value(), 3.0);
    }

    #[test]
    fn compares_exactly() {
        let third = Beat::new(0, 1, 3).position().unwrap();
        let two_sixths = Beat::new(0, 2, 6).position().unwrap();
        assert_eq!(third, two_sixths);
        assert!(Beat::new(0, 1, 3).position().unwrap() < Beat::new(0, 34, 100).position().unwrap());
        assert_eq!(
            Beat::new(2, 0, 1).position().unwrap(),
            BeatPosition::from_integer(2)
        );
    }

    #[test]
    fn zero_denominator_fails() {
        let beat = Beat::new(4, 1, 0);
        assert_eq!(beat.position(), Err(BeatError::DivisionByZero(beat)));
    }

    #[test]
    fn overflow_fails() {
        let beat = Beat::new(i64::MAX, 1, 2);
        assert_eq!(beat.position(), Err(BeatError::Overflow(beat)));
        let beat = Beat::new(0, 1, i64::MIN);
        assert_eq!(beat.position(), Err(BeatError::Overflow(beat)));
    }

    #[test]
    fn deserializes_from_array() {
        let beat: Beat = serde_json::from_str("[12, 3, 8]").unwrap();
        assert_eq!(beat, Beat::new(12, 3, 8));
        assert_eq!(beat.to_string(), "[12, 3, 8]");
    }
}
