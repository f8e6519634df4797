#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::error::{BandError, Result};

/// Time signature with support for simple and compound meters.
///
/// Patterns count in beats: the pulse a drummer counts and a tempo is set
/// against. In simple meters that is the denominator note (4/4 has four
/// quarter-note beats). In compound meters the eighths group in threes and
/// the beat is the dotted quarter (6/8 has two beats, 12/8 has four).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSignature {
    /// Number of notes per measure (numerator)
    pub numerator: u8,
    /// Note value that gets one count (denominator: 4 = quarter, 8 = eighth)
    pub denominator: u8,
}

impl TimeSignature {
    pub const FOUR_FOUR: TimeSignature = TimeSignature::new_unchecked(4, 4);
    /// Waltz, country two-step in three
    pub const THREE_FOUR: TimeSignature = TimeSignature::new_unchecked(3, 4);
    /// Compound duple: two dotted-quarter beats
    pub const SIX_EIGHT: TimeSignature = TimeSignature::new_unchecked(6, 8);
    /// Slow blues and doo-wop shuffle: four dotted-quarter beats
    pub const TWELVE_EIGHT: TimeSignature = TimeSignature::new_unchecked(12, 8);

    const fn new_unchecked(numerator: u8, denominator: u8) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn new(numerator: u8, denominator: u8) -> Result<Self> {
        if numerator == 0 || !matches!(denominator, 1 | 2 | 4 | 8 | 16) {
            return Err(BandError::invalid(format!(
                "unsupported time signature {numerator}/{denominator}"
            )));
        }
        Ok(Self::new_unchecked(numerator, denominator))
    }

    /// Compound meters: eighths (or sixteenths) grouped in threes, more than
    /// one group per measure.
    pub fn is_compound(&self) -> bool {
        self.denominator >= 8 && self.numerator % 3 == 0 && self.numerator > 3
    }

    pub fn is_simple(&self) -> bool {
        !self.is_compound()
    }

    /// Counted beats per measure.
    pub fn beats_per_measure(&self) -> f64 {
        if self.is_compound() {
            (self.numerator / 3) as f64
        } else {
            self.numerator as f64
        }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::FOUR_FOUR
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_meters_count_the_denominator() {
        assert_eq!(TimeSignature::FOUR_FOUR.beats_per_measure(), 4.0);
        assert_eq!(TimeSignature::THREE_FOUR.beats_per_measure(), 3.0);
        assert!(TimeSignature::THREE_FOUR.is_simple());
    }

    #[test]
    fn compound_meters_count_dotted_quarters() {
        assert_eq!(TimeSignature::SIX_EIGHT.beats_per_measure(), 2.0);
        assert_eq!(TimeSignature::TWELVE_EIGHT.beats_per_measure(), 4.0);
        assert!(TimeSignature::TWELVE_EIGHT.is_compound());
    }

    #[test]
    fn three_eight_is_simple() {
        let ts = TimeSignature::new(3, 8).unwrap();
        assert!(ts.is_simple());
        assert_eq!(ts.beats_per_measure(), 3.0);
    }

    #[test]
    fn rejects_odd_denominators() {
        assert!(TimeSignature::new(4, 3).is_err());
        assert!(TimeSignature::new(0, 4).is_err());
        assert_eq!(TimeSignature::SIX_EIGHT.to_string(), "6/8");
    }
}
