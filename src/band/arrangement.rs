use std::{collections::VecDeque, sync::Arc};

use crate::{
    band::bass_line::{bass_line, BassMode, MeasureSlot},
    engine::{Channel, MeasurePlan, MeasureSource},
    sequencing::{Articulation, Instrument, Pattern},
    theory::{Chord, ChordProgression, Note},
};

/// What the band plays at one scheduled instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    Drum {
        instrument: Instrument,
        articulation: Articulation,
        velocity: f32,
    },
    Bass {
        note: Note,
        velocity: f32,
        beats: f64,
    },
    Piano {
        chord: Chord,
        velocity: f32,
        beats: f64,
    },
}

impl Cue {
    pub fn channel(&self) -> Channel {
        match self {
            Cue::Drum { .. } => Channel::Drums,
            Cue::Bass { .. } => Channel::Bass,
            Cue::Piano { .. } => Channel::Piano,
        }
    }

    pub fn velocity(&self) -> f32 {
        match *self {
            Cue::Drum { velocity, .. } | Cue::Bass { velocity, .. } | Cue::Piano { velocity, .. } => {
                velocity
            }
        }
    }

    /// The drum this cue strikes, if it is a drum cue.
    pub fn drum(&self) -> Option<Instrument> {
        match *self {
            Cue::Drum { instrument, .. } => Some(instrument),
            _ => None,
        }
    }
}

/// Turns a pattern, a chord progression and a bass mode into measures.
///
/// The progression moves one chord every `measures_per_chord` measures, as
/// measures are planned. Planning runs a lookahead ahead of the audio, so the
/// chord here is the one about to sound; [`chord_for`](Arrangement::chord_for)
/// answers for a measure that is already playing.
#[derive(Debug, Clone)]
pub struct Arrangement {
    pattern: Arc<Pattern>,
    progression: ChordProgression,
    measures_per_chord: u64,
    bass_mode: BassMode,
    bass_octave: i32,
    /// Chord of each recently planned measure, oldest first.
    planned: VecDeque<(u64, Chord)>,
}

/// Planned measures remembered for `chord_for`. The lookahead never runs
/// more than one measure past the playing one.
const PLANNED_HISTORY: usize = 4;

impl Arrangement {
    pub fn new(
        pattern: Arc<Pattern>,
        progression: ChordProgression,
        measures_per_chord: u64,
        bass_mode: BassMode,
        bass_octave: i32,
    ) -> Self {
        Self {
            pattern,
            progression,
            measures_per_chord: measures_per_chord.max(1),
            bass_mode,
            bass_octave,
            planned: VecDeque::with_capacity(PLANNED_HISTORY),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn progression(&self) -> &ChordProgression {
        &self.progression
    }

    /// Chord of the most recently planned measure.
    pub fn current_chord(&self) -> Chord {
        self.progression.current()
    }

    /// Chord planned for `measure`. A measure past the planning horizon gets
    /// the latest planned chord; one long gone gets `None`.
    pub fn chord_for(&self, measure: u64) -> Option<Chord> {
        match self.planned.back() {
            Some(&(latest, chord)) if measure > latest => Some(chord),
            _ => self
                .planned
                .iter()
                .find(|(planned, _)| *planned == measure)
                .map(|&(_, chord)| chord),
        }
    }

    pub fn bass_mode(&self) -> BassMode {
        self.bass_mode
    }

    /// Takes effect from the next planned measure.
    pub fn set_bass_mode(&mut self, mode: BassMode) {
        self.bass_mode = mode;
    }
}

impl MeasureSource<Cue> for Arrangement {
    fn plan_measure(&mut self, index: u64) -> MeasurePlan<Cue> {
        if index > 0 && index % self.measures_per_chord == 0 {
            self.progression.advance();
        }
        let chord = self.progression.current();
        let next = self.progression.peek_next();
        if self.planned.len() == PLANNED_HISTORY {
            self.planned.pop_front();
        }
        self.planned.push_back((index, chord));
        let pattern = &self.pattern;

        let mut plan = MeasurePlan::new(pattern.measure_beats());
        for event in pattern.events() {
            let cue = match event.instrument {
                Instrument::Piano => Cue::Piano {
                    chord,
                    velocity: event.velocity,
                    beats: event.duration_beats,
                },
                instrument => Cue::Drum {
                    instrument,
                    articulation: event.articulation,
                    velocity: event.velocity,
                },
            };
            plan.push(pattern.swing_beat(event.beat), cue);
        }

        let slot = MeasureSlot {
            measure_in_chord: index % self.measures_per_chord,
            measures_per_chord: self.measures_per_chord,
            measure_beats: pattern.measure_beats(),
        };
        for note in bass_line(self.bass_mode, chord, next, slot, self.bass_octave) {
            plan.push(
                pattern.swing_beat(note.beat),
                Cue::Bass {
                    note: note.note,
                    velocity: note.velocity,
                    beats: note.duration_beats,
                },
            );
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::TimeSignature;

    fn arrangement(measures_per_chord: u64, mode: BassMode) -> Arrangement {
        let pattern = Pattern::builder(TimeSignature::FOUR_FOUR)
            .steps(Instrument::Kick, "x...x...x...x...")
            .steps(Instrument::ClosedHat, "x.x.x.x.x.x.x.x.")
            .steps(Instrument::Piano, "x.......x.......")
            .swing(0.6)
            .build()
            .unwrap();
        Arrangement::new(
            Arc::new(pattern),
            "C G Am F".parse().unwrap(),
            measures_per_chord,
            mode,
            2,
        )
    }

    fn chords_played(arrangement: &mut Arrangement, measures: u64) -> Vec<String> {
        (0..measures)
            .map(|index| {
                let plan = arrangement.plan_measure(index);
                plan.events
                    .iter()
                    .find_map(|(_, cue)| match cue {
                        Cue::Piano { chord, .. } => Some(chord.to_string()),
                        _ => None,
                    })
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn chord_advances_every_measure_by_default() {
        let mut arrangement = arrangement(1, BassMode::Root);
        assert_eq!(
            chords_played(&mut arrangement, 5),
            ["C", "G", "Am", "F", "C"]
        );
    }

    #[test]
    fn chord_holds_for_measures_per_chord() {
        let mut arrangement = arrangement(2, BassMode::Root);
        assert_eq!(
            chords_played(&mut arrangement, 4),
            ["C", "C", "G", "G"]
        );
    }

    #[test]
    fn chord_for_reports_the_planned_measure() {
        let mut arrangement = arrangement(1, BassMode::Root);
        assert_eq!(arrangement.chord_for(0), None);
        arrangement.plan_measure(0);
        arrangement.plan_measure(1);
        assert_eq!(arrangement.current_chord().to_string(), "G");
        assert_eq!(arrangement.chord_for(0).unwrap().to_string(), "C");
        assert_eq!(arrangement.chord_for(1).unwrap().to_string(), "G");
        assert_eq!(arrangement.chord_for(2).unwrap().to_string(), "G");

        for index in 2..8 {
            arrangement.plan_measure(index);
        }
        assert_eq!(arrangement.chord_for(0), None);
        assert_eq!(arrangement.chord_for(7).unwrap().to_string(), "F");
    }

    #[test]
    fn off_beats_are_swung() {
        let mut arrangement = arrangement(1, BassMode::Root);
        let plan = arrangement.plan_measure(0);
        let hats: Vec<f64> = plan
            .events
            .iter()
            .filter(|(_, cue)| cue.drum() == Some(Instrument::ClosedHat))
            .map(|(beat, _)| *beat)
            .collect();
        assert_eq!(hats[0], 0.0);
        assert!((hats[1] - 0.6).abs() < 1e-9);
        assert_eq!(hats[2], 1.0);
    }

    #[test]
    fn walking_bass_follows_the_mode_switch() {
        let mut arrangement = arrangement(1, BassMode::Root);
        let bass_count = |plan: &MeasurePlan<Cue>| {
            plan.events
                .iter()
                .filter(|(_, cue)| cue.channel() == Channel::Bass)
                .count()
        };
        assert_eq!(bass_count(&arrangement.plan_measure(0)), 2);
        arrangement.set_bass_mode(BassMode::Walking);
        assert_eq!(bass_count(&arrangement.plan_measure(1)), 4);
    }
}
