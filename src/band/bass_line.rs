#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

use crate::{
    error::{BandError, Result},
    theory::{Chord, Note},
};

/*
Bass Lines
==========

The bass line is generated from the chord, never stored in a pattern, so the
same groove follows any progression. Three modes:

  Root      root on beats 1 and 3 of every measure
  Walking   four notes per chord, spread evenly over the chord's duration:
            root → third → fifth → approach
  Melodic   root, fifth, third, root on 1, 2&, 3&, 4 of every measure

The walking approach note leads into the next chord a semitone from below.
When the next chord has the same root there is nothing to approach, and the
line plays the root again.

Offsets scale with the measure, so a 3/4 or 12/8 groove walks just as evenly:

  chord_beats = measures_per_chord × measure_beats
  walking offset i = i × chord_beats / 4
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BassMode {
    #[default]
    Root,
    Walking,
    Melodic,
}

impl BassMode {
    pub const ALL: [BassMode; 3] = [BassMode::Root, BassMode::Walking, BassMode::Melodic];

    pub fn name(self) -> &'static str {
        match self {
            BassMode::Root => "root",
            BassMode::Walking => "walking",
            BassMode::Melodic => "melodic",
        }
    }

    /// The mode after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            BassMode::Root => BassMode::Walking,
            BassMode::Walking => BassMode::Melodic,
            BassMode::Melodic => BassMode::Root,
        }
    }
}

impl fmt::Display for BassMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BassMode {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self> {
        BassMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| BandError::invalid(format!("unknown bass mode '{s}'")))
    }
}

/// One bass note, positioned inside a measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BassNote {
    /// Straight beat from the downbeat of the measure.
    pub beat: f64,
    pub note: Note,
    pub velocity: f32,
    pub duration_beats: f64,
}

/// Where a measure sits in its chord and how long the measures are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureSlot {
    /// 0-based measure within the current chord.
    pub measure_in_chord: u64,
    pub measures_per_chord: u64,
    pub measure_beats: f64,
}

impl MeasureSlot {
    pub fn chord_beats(&self) -> f64 {
        self.measures_per_chord.max(1) as f64 * self.measure_beats
    }
}

const MELODIC_OFFSETS: [f64; 4] = [0.0, 1.5, 2.5, 3.0];
const MELODIC_VELOCITIES: [f32; 4] = [1.0, 0.7, 0.8, 0.9];
const WALKING_VELOCITIES: [f32; 4] = [1.0, 0.8, 0.85, 0.75];

/// The bass notes for one measure of `chord`, with `next` the chord after it.
pub fn bass_line(
    mode: BassMode,
    chord: Chord,
    next: Chord,
    slot: MeasureSlot,
    octave: i32,
) -> Vec<BassNote> {
    let root = Note::new(chord.root, octave);
    let (third, fifth, _) = chord.quality.intervals();
    let measure_beats = slot.measure_beats;

    match mode {
        BassMode::Root => {
            let half = measure_beats / 2.0;
            vec![
                BassNote {
                    beat: 0.0,
                    note: root,
                    velocity: 1.0,
                    duration_beats: half,
                },
                BassNote {
                    beat: half,
                    note: root,
                    velocity: 0.85,
                    duration_beats: half,
                },
            ]
        }
        BassMode::Walking => {
            let step = slot.chord_beats() / 4.0;
            let approach = if next.root == chord.root {
                root
            } else {
                // A semitone under the next root, in the octave just above
                // this root so the line steps rather than leaps
                let target = root.transpose(chord.root.interval_to(next.root));
                target.transpose(-1)
            };
            let walk = [root, root.transpose(third), root.transpose(fifth), approach];

            let measure_start = slot.measure_in_chord as f64 * measure_beats;
            let measure_end = measure_start + measure_beats;
            walk.into_iter()
                .zip(WALKING_VELOCITIES)
                .enumerate()
                .filter_map(|(i, (note, velocity))| {
                    let offset = i as f64 * step;
                    (measure_start..measure_end)
                        .contains(&offset)
                        .then(|| BassNote {
                            beat: offset - measure_start,
                            note,
                            velocity,
                            duration_beats: step,
                        })
                })
                .collect()
        }
        BassMode::Melodic => {
            let unit = measure_beats / 4.0;
            let notes = [root, root.transpose(fifth), root.transpose(third), root];
            notes
                .into_iter()
                .zip(MELODIC_OFFSETS)
                .zip(MELODIC_VELOCITIES)
                .enumerate()
                .map(|(i, ((note, offset), velocity))| {
                    let until = MELODIC_OFFSETS.get(i + 1).copied().unwrap_or(4.0);
                    BassNote {
                        beat: offset * unit,
                        note,
                        velocity,
                        duration_beats: (until - offset) * unit,
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::PitchClass;

    fn chord(symbol: &str) -> Chord {
        symbol.parse().unwrap()
    }

    fn slot(measure_in_chord: u64, measures_per_chord: u64) -> MeasureSlot {
        MeasureSlot {
            measure_in_chord,
            measures_per_chord,
            measure_beats: 4.0,
        }
    }

    fn classes(notes: &[BassNote]) -> Vec<PitchClass> {
        notes.iter().map(|n| n.note.pitch_class).collect()
    }

    #[test]
    fn root_plays_beats_one_and_three() {
        let line = bass_line(BassMode::Root, chord("C"), chord("G"), slot(0, 1), 2);
        let beats: Vec<f64> = line.iter().map(|n| n.beat).collect();
        assert_eq!(beats, vec![0.0, 2.0]);
        assert!(line.iter().all(|n| n.note == Note::new(PitchClass::C, 2)));
    }

    #[test]
    fn walking_is_root_third_fifth_approach() {
        let line = bass_line(BassMode::Walking, chord("C"), chord("G"), slot(0, 1), 2);
        assert_eq!(
            classes(&line),
            [PitchClass::C, PitchClass::E, PitchClass::G, PitchClass::FSharp]
        );
        let beats: Vec<f64> = line.iter().map(|n| n.beat).collect();
        assert_eq!(beats, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn walking_into_same_root_repeats_the_root() {
        let line = bass_line(BassMode::Walking, chord("Am"), chord("Am7"), slot(0, 1), 2);
        assert_eq!(
            classes(&line),
            [PitchClass::A, PitchClass::C, PitchClass::E, PitchClass::A]
        );
    }

    #[test]
    fn walking_spreads_four_notes_over_a_two_measure_chord() {
        let first = bass_line(BassMode::Walking, chord("F"), chord("C"), slot(0, 2), 2);
        let second = bass_line(BassMode::Walking, chord("F"), chord("C"), slot(1, 2), 2);

        assert_eq!(first.len() + second.len(), 4);
        assert_eq!(classes(&first), [PitchClass::F, PitchClass::A]);
        assert_eq!(classes(&second), [PitchClass::C, PitchClass::B]);
        assert_eq!(second[0].beat, 0.0);
        assert_eq!(second[1].beat, 2.0);
    }

    #[test]
    fn melodic_offsets_and_velocities() {
        let line = bass_line(BassMode::Melodic, chord("G"), chord("C"), slot(0, 1), 2);
        let beats: Vec<f64> = line.iter().map(|n| n.beat).collect();
        let velocities: Vec<f32> = line.iter().map(|n| n.velocity).collect();
        assert_eq!(beats, vec![0.0, 1.5, 2.5, 3.0]);
        assert_eq!(velocities, vec![1.0, 0.7, 0.8, 0.9]);
        assert_eq!(
            classes(&line),
            [PitchClass::G, PitchClass::D, PitchClass::B, PitchClass::G]
        );
    }

    #[test]
    fn modes_parse_and_cycle() {
        assert_eq!("Walking".parse::<BassMode>().unwrap(), BassMode::Walking);
        assert!("slap".parse::<BassMode>().is_err());
        assert_eq!(BassMode::Melodic.next(), BassMode::Root);
    }
}
