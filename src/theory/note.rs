use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{BandError, Result};

/*
Equal-Tempered Note Table
=========================

All pitched frequencies come from one 12-entry table: the octave-zero
frequencies, anchored at C0 = 16.35 Hz (which puts A4 at 440 Hz). Any other
octave is a power-of-two scaling:

    frequency(pitch_class, octave) = NOTE_TABLE[pitch_class] · 2^octave

    A4 = 27.5 · 2^4 = 440 Hz
    E1 = 20.6 · 2^1 = 41.2 Hz   (lowest string of a 4-string bass)

Note names are a letter, any number of accidentals (# or b), and an octave
number: "C4", "F#2", "Bb3", "Cb4" (= B3). Parsing works on absolute
semitones, so accidentals that cross an octave boundary land in the right
octave.
*/

const NOTE_TABLE: [f32; 12] = [
    16.351_598, // C0
    17.323_914, // C#0
    18.354_048, // D0
    19.445_436, // D#0
    20.601_722, // E0
    21.826_764, // F0
    23.124_651, // F#0
    24.499_715, // G0
    25.956_544, // G#0
    27.5,       // A0
    29.135_235, // A#0
    30.867_706, // B0
];

/// Frequency of C0, the anchor of the note table.
pub const C0_FREQUENCY: f32 = NOTE_TABLE[0];

const MAX_OCTAVE: i32 = 9;

const NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// One of the twelve pitch classes, spelled with sharps.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Pitch class for any semitone count (wraps in both directions).
    pub fn from_index(semitones: i32) -> Self {
        Self::ALL[semitones.rem_euclid(12) as usize]
    }

    /// Semitones above C (0-11).
    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        NAMES[self as usize]
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_index(self.index() + semitones)
    }

    /// Upward distance to `other` in semitones (0-11).
    pub fn interval_to(self, other: PitchClass) -> i32 {
        (other.index() - self.index()).rem_euclid(12)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Split a leading note spelling ("F#", "Bb", "E") from the rest of `text`.
///
/// Returns the semitone offset from C (may fall outside 0-11, e.g. "Cb" is
/// -1) and the unparsed remainder.
pub(crate) fn split_spelling(text: &str) -> Option<(i32, &str)> {
    let mut chars = text.char_indices();
    let (_, letter) = chars.next()?;
    let base = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let mut offset = base;
    let mut rest = &text[letter.len_utf8()..];
    loop {
        match rest.chars().next() {
            Some('#') | Some('♯') => offset += 1,
            Some('b') | Some('♭') => offset -= 1,
            _ => break,
        }
        let len = rest.chars().next().map_or(0, char::len_utf8);
        rest = &rest[len..];
    }

    Some((offset, rest))
}

impl FromStr for PitchClass {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self> {
        match split_spelling(s.trim()) {
            Some((offset, "")) => Ok(PitchClass::from_index(offset)),
            _ => Err(BandError::invalid(format!("unknown pitch class '{s}'"))),
        }
    }
}

/// A pitch class in a specific octave.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub pitch_class: PitchClass,
    pub octave: i32,
}

impl Note {
    pub const A4: Note = Note::new(PitchClass::A, 4);

    pub const fn new(pitch_class: PitchClass, octave: i32) -> Self {
        Self {
            pitch_class,
            octave,
        }
    }

    /// Note `semitones` above C0.
    pub fn from_semitone(semitones: i32) -> Self {
        Self {
            pitch_class: PitchClass::from_index(semitones),
            octave: semitones.div_euclid(12),
        }
    }

    /// Semitones above C0.
    pub fn semitone(self) -> i32 {
        self.octave * 12 + self.pitch_class.index()
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_semitone(self.semitone() + semitones)
    }

    pub fn frequency(self) -> f32 {
        NOTE_TABLE[self.pitch_class as usize] * 2.0_f32.powi(self.octave)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}

impl FromStr for Note {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BandError::invalid(format!("malformed note name '{s}'"));

        let (offset, octave_text) = split_spelling(s.trim()).ok_or_else(invalid)?;
        if octave_text.is_empty() || !octave_text.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let octave: i32 = octave_text.parse().map_err(|_| invalid())?;

        let semitone = octave
            .checked_mul(12)
            .and_then(|base| base.checked_add(offset))
            .ok_or_else(invalid)?;
        let note = Note::from_semitone(semitone);
        if !(0..=MAX_OCTAVE).contains(&note.octave) {
            return Err(invalid());
        }
        Ok(note)
    }
}

/// Frequency of a named note, e.g. `"A4"` → 440.0.
pub fn note_frequency(name: &str) -> Result<f32> {
    name.parse::<Note>().map(Note::frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_anchored_at_c0() {
        assert!((C0_FREQUENCY - 16.35).abs() < 0.01);
        assert!((Note::new(PitchClass::C, 4).frequency() - 261.63).abs() < 0.01);
        assert_eq!(Note::A4.frequency(), 440.0);
    }

    #[test]
    fn parses_sharps_flats_and_octaves() {
        assert_eq!("F#2".parse::<Note>(), Ok(Note::new(PitchClass::FSharp, 2)));
        assert_eq!("Bb3".parse::<Note>(), Ok(Note::new(PitchClass::ASharp, 3)));
        assert_eq!("Cb4".parse::<Note>(), Ok(Note::new(PitchClass::B, 3)));
        assert_eq!("B#3".parse::<Note>(), Ok(Note::new(PitchClass::C, 4)));
        assert_eq!("e1".parse::<Note>(), Ok(Note::new(PitchClass::E, 1)));
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["", "H2", "C", "C#", "4", "Cx4", "A-1", "C10", "G 4", "C999999999"] {
            assert!(
                matches!(name.parse::<Note>(), Err(BandError::InvalidParameter(_))),
                "'{name}' should be rejected"
            );
        }
        assert!(note_frequency("Q7").is_err());
    }

    #[test]
    fn transpose_crosses_octaves() {
        let b3 = Note::new(PitchClass::B, 3);
        assert_eq!(b3.transpose(1), Note::new(PitchClass::C, 4));
        assert_eq!(Note::new(PitchClass::C, 2).transpose(-1), Note::new(PitchClass::B, 1));
    }

    #[test]
    fn pitch_class_intervals_wrap() {
        assert_eq!(PitchClass::A.interval_to(PitchClass::C), 3);
        assert_eq!(PitchClass::C.interval_to(PitchClass::A), 9);
        assert_eq!(PitchClass::G.transpose(7), PitchClass::D);
        assert_eq!("Db".parse::<PitchClass>(), Ok(PitchClass::CSharp));
    }
}
