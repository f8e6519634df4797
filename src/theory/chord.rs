use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{BandError, Result},
    theory::note::{split_spelling, Note, PitchClass},
};

/// Chord quality: which intervals sit above the root.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Dominant7,
    Major7,
    Minor7,
    HalfDiminished7,
    Diminished7,
}

impl ChordQuality {
    /// Semitones above the root: (third, fifth, seventh).
    ///
    /// Suspended chords report their suspended tone in the third slot; a
    /// bass line walking "root, third, fifth" over Gsus4 plays G, C, D.
    pub fn intervals(self) -> (i32, i32, Option<i32>) {
        match self {
            ChordQuality::Major => (4, 7, None),
            ChordQuality::Minor => (3, 7, None),
            ChordQuality::Diminished => (3, 6, None),
            ChordQuality::Augmented => (4, 8, None),
            ChordQuality::Sus2 => (2, 7, None),
            ChordQuality::Sus4 => (5, 7, None),
            ChordQuality::Dominant7 => (4, 7, Some(10)),
            ChordQuality::Major7 => (4, 7, Some(11)),
            ChordQuality::Minor7 => (3, 7, Some(10)),
            ChordQuality::HalfDiminished7 => (3, 6, Some(10)),
            ChordQuality::Diminished7 => (3, 6, Some(9)),
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::HalfDiminished7 => "m7b5",
            ChordQuality::Diminished7 => "dim7",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        let quality = match suffix {
            "" | "maj" | "M" => ChordQuality::Major,
            "m" | "min" | "-" => ChordQuality::Minor,
            "dim" | "°" | "o" => ChordQuality::Diminished,
            "aug" | "+" => ChordQuality::Augmented,
            "sus2" => ChordQuality::Sus2,
            "sus4" | "sus" => ChordQuality::Sus4,
            "7" | "dom7" => ChordQuality::Dominant7,
            "maj7" | "M7" | "Δ7" | "Δ" => ChordQuality::Major7,
            "m7" | "min7" | "-7" => ChordQuality::Minor7,
            "m7b5" | "ø" | "ø7" => ChordQuality::HalfDiminished7,
            "dim7" | "°7" | "o7" => ChordQuality::Diminished7,
            _ => return None,
        };
        Some(quality)
    }
}

/// A chord: root plus quality. Every chord tone derives from these two.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub root: PitchClass,
    pub quality: ChordQuality,
}

impl Chord {
    pub const fn new(root: PitchClass, quality: ChordQuality) -> Self {
        Self { root, quality }
    }

    pub fn third(&self) -> PitchClass {
        self.root.transpose(self.quality.intervals().0)
    }

    pub fn fifth(&self) -> PitchClass {
        self.root.transpose(self.quality.intervals().1)
    }

    pub fn seventh(&self) -> Option<PitchClass> {
        self.quality
            .intervals()
            .2
            .map(|interval| self.root.transpose(interval))
    }

    /// Chord tones bottom-up: root, third, fifth, and seventh if present.
    pub fn tones(&self) -> Vec<PitchClass> {
        let mut tones = vec![self.root, self.third(), self.fifth()];
        tones.extend(self.seventh());
        tones
    }

    /// Root-position voicing starting at the root in `octave`.
    pub fn voicing(&self, octave: i32) -> Vec<Note> {
        let root = Note::new(self.root, octave);
        let (third, fifth, seventh) = self.quality.intervals();
        let mut notes = vec![root, root.transpose(third), root.transpose(fifth)];
        notes.extend(seventh.map(|interval| root.transpose(interval)));
        notes
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality.suffix())
    }
}

impl FromStr for Chord {
    type Err = BandError;

    /// Parse a chord symbol: "C", "Am", "F#7", "Bbmaj7", "Dm7b5", "Gsus4".
    fn from_str(s: &str) -> Result<Self> {
        let symbol = s.trim();
        let (offset, suffix) = split_spelling(symbol)
            .ok_or_else(|| BandError::invalid(format!("malformed chord symbol '{s}'")))?;
        let quality = ChordQuality::from_suffix(suffix).ok_or_else(|| {
            BandError::invalid(format!("unknown chord quality '{suffix}' in '{s}'"))
        })?;
        Ok(Chord::new(PitchClass::from_index(offset), quality))
    }
}

/// Ordered, cyclic list of chords with a playback position.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ProgressionFields"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordProgression {
    chords: Vec<Chord>,
    index: usize,
}

/// Deserialized form, checked before it becomes a progression.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct ProgressionFields {
    chords: Vec<Chord>,
    #[serde(default)]
    index: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<ProgressionFields> for ChordProgression {
    type Error = BandError;

    fn try_from(fields: ProgressionFields) -> Result<Self> {
        let mut progression = ChordProgression::new(fields.chords)?;
        if fields.index >= progression.len() {
            return Err(BandError::invalid(format!(
                "chord index {} out of range for {} chords",
                fields.index,
                progression.len()
            )));
        }
        progression.index = fields.index;
        Ok(progression)
    }
}

impl ChordProgression {
    pub fn new(chords: Vec<Chord>) -> Result<Self> {
        if chords.is_empty() {
            return Err(BandError::invalid("chord progression is empty"));
        }
        Ok(Self { chords, index: 0 })
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Chord {
        self.chords[self.index]
    }

    /// The chord after the current one, wrapping at the end.
    pub fn peek_next(&self) -> Chord {
        self.chord_at(self.index + 1)
    }

    /// Chord at any step, counted cyclically from the start.
    pub fn chord_at(&self, step: usize) -> Chord {
        self.chords[step % self.chords.len()]
    }

    /// Step to the next chord and return it.
    pub fn advance(&mut self) -> Chord {
        self.index = (self.index + 1) % self.chords.len();
        self.current()
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

impl Default for ChordProgression {
    /// I–V–vi–IV in C.
    fn default() -> Self {
        Self {
            chords: vec![
                Chord::new(PitchClass::C, ChordQuality::Major),
                Chord::new(PitchClass::G, ChordQuality::Major),
                Chord::new(PitchClass::A, ChordQuality::Minor),
                Chord::new(PitchClass::F, ChordQuality::Major),
            ],
            index: 0,
        }
    }
}

impl fmt::Display for ChordProgression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chord) in self.chords.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{chord}")?;
        }
        Ok(())
    }
}

impl FromStr for ChordProgression {
    type Err = BandError;

    /// Parse "C G Am F", "C-G-Am-F", "C | G | Am | F" or "C,G,Am,F".
    fn from_str(s: &str) -> Result<Self> {
        let chords = s
            .split(|c: char| c.is_whitespace() || matches!(c, ',' | '|'))
            .flat_map(|token| token.split(" - "))
            .filter(|token| !token.is_empty())
            .flat_map(split_dashes)
            .map(str::parse)
            .collect::<Result<Vec<Chord>>>()?;
        ChordProgression::new(chords)
    }
}

/// "C-G-Am-F" splits on dashes, but a trailing "-" or "-7" is a minor suffix.
fn split_dashes(token: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in token.char_indices() {
        let next = token[i + c.len_utf8()..].chars().next();
        if c == '-' && i > start && next.is_some_and(|n| n.is_ascii_uppercase()) {
            parts.push(&token[start..i]);
            start = i + 1;
        }
    }
    parts.push(&token[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(symbol: &str) -> Chord {
        symbol.parse().unwrap()
    }

    #[test]
    fn derives_tones_from_root_and_quality() {
        let am7 = chord("Am7");
        assert_eq!(am7.third(), PitchClass::C);
        assert_eq!(am7.fifth(), PitchClass::E);
        assert_eq!(am7.seventh(), Some(PitchClass::G));

        let g = chord("G");
        assert_eq!(g.tones(), vec![PitchClass::G, PitchClass::B, PitchClass::D]);
        assert_eq!(g.seventh(), None);
    }

    #[test]
    fn parses_common_symbols() {
        assert_eq!(chord("F#7"), Chord::new(PitchClass::FSharp, ChordQuality::Dominant7));
        assert_eq!(chord("Bbmaj7"), Chord::new(PitchClass::ASharp, ChordQuality::Major7));
        assert_eq!(chord("Dm7b5"), Chord::new(PitchClass::D, ChordQuality::HalfDiminished7));
        assert_eq!(chord("Esus4"), Chord::new(PitchClass::E, ChordQuality::Sus4));
        assert_eq!(chord("C-7"), Chord::new(PitchClass::C, ChordQuality::Minor7));
        assert!("Cfoo".parse::<Chord>().is_err());
        assert!("".parse::<Chord>().is_err());
    }

    #[test]
    fn symbols_round_trip_through_display() {
        for symbol in ["C", "Am", "F#7", "Bdim", "Gsus2", "Ebmaj7"] {
            let parsed = chord(symbol);
            assert_eq!(chord(&parsed.to_string()), parsed);
        }
    }

    #[test]
    fn voicing_stacks_above_root() {
        let notes = chord("G7").voicing(3);
        let names: Vec<String> = notes.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["G3", "B3", "D4", "F4"]);
    }

    #[test]
    fn progression_is_cyclic() {
        let mut progression: ChordProgression = "C G Am F".parse().unwrap();
        assert_eq!(progression.current(), chord("C"));
        assert_eq!(progression.peek_next(), chord("G"));

        for _ in 0..3 {
            progression.advance();
        }
        assert_eq!(progression.current(), chord("F"));
        assert_eq!(progression.peek_next(), chord("C"));
        assert_eq!(progression.advance(), chord("C"));
        assert_eq!(progression.chord_at(6), chord("Am"));
    }

    #[test]
    fn progression_accepts_separators() {
        let expected: ChordProgression = "Dm7 G7 Cmaj7".parse().unwrap();
        for text in ["Dm7-G7-Cmaj7", "Dm7 | G7 | Cmaj7", "Dm7,G7,Cmaj7"] {
            assert_eq!(text.parse::<ChordProgression>().unwrap(), expected, "{text}");
        }
        assert!("".parse::<ChordProgression>().is_err());
        assert!("C X F".parse::<ChordProgression>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_progression_is_validated() {
        let fields = |chords: Vec<Chord>, index| ProgressionFields { chords, index };
        assert!(ChordProgression::try_from(fields(vec![], 0)).is_err());
        assert!(ChordProgression::try_from(fields(vec![chord("C"), chord("G")], 2)).is_err());

        let progression =
            ChordProgression::try_from(fields(vec![chord("C"), chord("G")], 1)).unwrap();
        assert_eq!(progression.current(), chord("G"));
    }
}
