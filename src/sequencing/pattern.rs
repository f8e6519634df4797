/*
Patterns
========

A pattern is one measure of a groove: which instruments hit, on which beats,
how hard, and how the off-beats are swung.

Beats are counted from 0.0 at the downbeat. In 4/4:

    beat  0.0   0.5   1.0   1.5   2.0   2.5   3.0   3.5
          1     &     2     &     3     &     4     &

Step Grids
----------

Most grooves are easiest to write as a step grid, where timing is implicit in
position: a string of N steps divides the measure into N equal slots.

    kick   "x...x...x...x..."    four on the floor (16 steps = sixteenths)
    snare  "....X.......X..."    backbeat on 2 and 4, accented
    hat    "x.x.x.x.x.x.x.x."    eighths

  X  accent (velocity 1.0)
  x  normal hit (0.8)
  o  ghost note (0.5, Ghost articulation)
  r  rim / cross-stick (Rim articulation)
  h  high variant (High articulation; toms)
  l  low variant (Low articulation; toms)
  .  rest   (also '-' and '_'; spaces and '|' are ignored)

A piano grid holds each chord until the next hit or the end of the measure.

Swing
-----

Swing delays the off-beat eighth within every beat. With swing `s` (0.5 is
straight, 0.67 is a triplet shuffle, 0.75 is a hard dotted shuffle) a
position `p` inside the beat maps piecewise-linearly:

    p ≤ 0.5:  p' = p / 0.5 × s
    p > 0.5:  p' = s + (p - 0.5) / 0.5 × (1 - s)

so downbeats never move and the "&" lands at `s`.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

use crate::{
    engine::Channel,
    error::{BandError, Result},
    sequencing::time_signature::TimeSignature,
};

/// Everything a pattern can ask to be played.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    Kick,
    Snare,
    ClosedHat,
    OpenHat,
    Clap,
    Tom,
    Crash,
    Ride,
    /// A comping chord on the piano channel.
    Piano,
}

impl Instrument {
    pub const ALL: [Instrument; 9] = [
        Instrument::Kick,
        Instrument::Snare,
        Instrument::ClosedHat,
        Instrument::OpenHat,
        Instrument::Clap,
        Instrument::Tom,
        Instrument::Crash,
        Instrument::Ride,
        Instrument::Piano,
    ];

    pub fn is_drum(self) -> bool {
        self != Instrument::Piano
    }

    pub fn channel(self) -> Channel {
        if self.is_drum() {
            Channel::Drums
        } else {
            Channel::Piano
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::Kick => "kick",
            Instrument::Snare => "snare",
            Instrument::ClosedHat => "hat",
            Instrument::OpenHat => "open-hat",
            Instrument::Clap => "clap",
            Instrument::Tom => "tom",
            Instrument::Crash => "crash",
            Instrument::Ride => "ride",
            Instrument::Piano => "piano",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Instrument {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self> {
        Instrument::ALL
            .into_iter()
            .find(|instrument| instrument.name() == s)
            .ok_or_else(|| BandError::invalid(format!("unknown instrument '{s}'")))
    }
}

/// Timbral variant of a hit.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Articulation {
    #[default]
    Normal,
    Ghost,
    Rim,
    High,
    Low,
}

/// One hit in a pattern.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceEvent {
    pub instrument: Instrument,
    /// Straight (unswung) position in beats from the downbeat.
    pub beat: f64,
    pub velocity: f32,
    pub articulation: Articulation,
    /// How long a sustaining instrument (piano) holds, in beats.
    pub duration_beats: f64,
}

impl VoiceEvent {
    pub fn new(instrument: Instrument, beat: f64, velocity: f32) -> Self {
        Self {
            instrument,
            beat,
            velocity,
            articulation: Articulation::Normal,
            duration_beats: 0.0,
        }
    }

    pub fn with_articulation(mut self, articulation: Articulation) -> Self {
        self.articulation = articulation;
        self
    }

    pub fn with_duration(mut self, beats: f64) -> Self {
        self.duration_beats = beats.max(0.0);
        self
    }
}

pub const MIN_SWING: f64 = 0.5;
pub const MAX_SWING: f64 = 0.75;

/// One validated measure of a groove.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    time_signature: TimeSignature,
    events: Vec<VoiceEvent>,
    tempo_range: (f32, f32),
    swing: f64,
    intensity: f32,
}

impl Pattern {
    /// Validate and build a pattern. Events are sorted by beat.
    pub fn new(
        time_signature: TimeSignature,
        mut events: Vec<VoiceEvent>,
        tempo_range: (f32, f32),
        swing: f64,
        intensity: f32,
    ) -> Result<Self> {
        let beats = time_signature.beats_per_measure();

        if let Some(event) = events.iter().find(|e| !(0.0..beats).contains(&e.beat)) {
            return Err(BandError::invalid(format!(
                "{} at beat {} is outside a {beats}-beat measure",
                event.instrument, event.beat
            )));
        }
        if let Some(event) = events.iter().find(|e| !(0.0..=1.0).contains(&e.velocity)) {
            return Err(BandError::invalid(format!(
                "{} velocity {} is outside 0..=1",
                event.instrument, event.velocity
            )));
        }
        if !(tempo_range.0 <= tempo_range.1) {
            return Err(BandError::invalid(format!(
                "tempo range {}..{} is inverted",
                tempo_range.0, tempo_range.1
            )));
        }
        if !(MIN_SWING..=MAX_SWING).contains(&swing) {
            return Err(BandError::invalid(format!(
                "swing {swing} is outside {MIN_SWING}..={MAX_SWING}"
            )));
        }
        if !(0.0..=1.0).contains(&intensity) {
            return Err(BandError::invalid(format!(
                "intensity {intensity} is outside 0..=1"
            )));
        }

        events.sort_by(|a, b| a.beat.total_cmp(&b.beat));
        Ok(Self {
            time_signature,
            events,
            tempo_range,
            swing,
            intensity,
        })
    }

    pub fn builder(time_signature: TimeSignature) -> PatternBuilder {
        PatternBuilder::new(time_signature)
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn measure_beats(&self) -> f64 {
        self.time_signature.beats_per_measure()
    }

    pub fn events(&self) -> &[VoiceEvent] {
        &self.events
    }

    pub fn tempo_range(&self) -> (f32, f32) {
        self.tempo_range
    }

    pub fn swing(&self) -> f64 {
        self.swing
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Beats at which `instrument` plays, straight.
    pub fn beats_of(&self, instrument: Instrument) -> Vec<f64> {
        self.events
            .iter()
            .filter(|e| e.instrument == instrument)
            .map(|e| e.beat)
            .collect()
    }

    /// Where a straight beat position actually lands once swung.
    pub fn swing_beat(&self, beat: f64) -> f64 {
        swing_position(beat, self.swing)
    }
}

pub(crate) fn swing_position(beat: f64, swing: f64) -> f64 {
    let whole = beat.floor();
    let p = beat - whole;
    let swung = if p <= 0.5 {
        p / 0.5 * swing
    } else {
        swing + (p - 0.5) / 0.5 * (1.0 - swing)
    };
    whole + swung
}

/// Assembles a pattern from step grids and explicit hits.
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    time_signature: TimeSignature,
    events: Vec<VoiceEvent>,
    tempo_range: (f32, f32),
    swing: f64,
    intensity: f32,
    errors: Vec<String>,
}

impl PatternBuilder {
    pub fn new(time_signature: TimeSignature) -> Self {
        Self {
            time_signature,
            events: Vec::new(),
            tempo_range: (40.0, 240.0),
            swing: MIN_SWING,
            intensity: 0.5,
            errors: Vec::new(),
        }
    }

    /// Lay a step grid across the whole measure.
    pub fn steps(mut self, instrument: Instrument, grid: &str) -> Self {
        let steps: Vec<char> = grid.chars().filter(|c| !matches!(c, ' ' | '|')).collect();
        if steps.is_empty() {
            self.errors.push(format!("empty step grid for {instrument}"));
            return self;
        }
        let step_beats = self.time_signature.beats_per_measure() / steps.len() as f64;

        for (i, step) in steps.into_iter().enumerate() {
            let (velocity, articulation) = match step {
                'X' => (1.0, Articulation::Normal),
                'x' => (0.8, Articulation::Normal),
                'o' => (0.5, Articulation::Ghost),
                'r' => (0.7, Articulation::Rim),
                'h' => (0.8, Articulation::High),
                'l' => (0.8, Articulation::Low),
                '.' | '-' | '_' => continue,
                other => {
                    self.errors
                        .push(format!("unknown step '{other}' in {instrument} grid '{grid}'"));
                    continue;
                }
            };
            self.events.push(
                VoiceEvent::new(instrument, i as f64 * step_beats, velocity)
                    .with_articulation(articulation)
                    .with_duration(step_beats),
            );
        }

        if instrument == Instrument::Piano {
            self.hold_chords();
        }
        self
    }

    /// Stretch each piano hit to the next one, the last to the barline.
    fn hold_chords(&mut self) {
        let measure = self.time_signature.beats_per_measure();
        let mut onsets: Vec<f64> = self
            .events
            .iter()
            .filter(|e| e.instrument == Instrument::Piano)
            .map(|e| e.beat)
            .collect();
        onsets.sort_by(f64::total_cmp);

        for event in self
            .events
            .iter_mut()
            .filter(|e| e.instrument == Instrument::Piano)
        {
            let next = onsets
                .iter()
                .copied()
                .find(|&beat| beat > event.beat)
                .unwrap_or(measure);
            event.duration_beats = next - event.beat;
        }
    }

    /// Explicit hits at the given beats.
    pub fn hits(mut self, instrument: Instrument, beats: &[f64], velocity: f32) -> Self {
        for &beat in beats {
            self.events.push(VoiceEvent::new(instrument, beat, velocity));
        }
        self
    }

    /// A comping chord held for `duration` beats.
    pub fn comp(mut self, beat: f64, duration: f64, velocity: f32) -> Self {
        self.events
            .push(VoiceEvent::new(Instrument::Piano, beat, velocity).with_duration(duration));
        self
    }

    pub fn event(mut self, event: VoiceEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn tempo_range(mut self, low: f32, high: f32) -> Self {
        self.tempo_range = (low, high);
        self
    }

    pub fn swing(mut self, swing: f64) -> Self {
        self.swing = swing;
        self
    }

    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn build(self) -> Result<Pattern> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(BandError::invalid(error));
        }
        Pattern::new(
            self.time_signature,
            self.events,
            self.tempo_range,
            self.swing,
            self.intensity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_grid_spreads_over_the_measure() {
        let pattern = Pattern::builder(TimeSignature::FOUR_FOUR)
            .steps(Instrument::Kick, "x...x...x...x...")
            .steps(Instrument::Snare, "....X.......X...")
            .build()
            .unwrap();

        assert_eq!(pattern.beats_of(Instrument::Kick), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(pattern.beats_of(Instrument::Snare), vec![1.0, 3.0]);
        assert_eq!(pattern.events()[1].instrument, Instrument::Kick);
        assert_eq!(pattern.events()[2].velocity, 1.0, "snare accent sorts after the beat-1 kick");
    }

    #[test]
    fn grid_letters_pick_articulations() {
        let pattern = Pattern::builder(TimeSignature::FOUR_FOUR)
            .steps(Instrument::Snare, "r.o.")
            .build()
            .unwrap();
        let articulations: Vec<_> = pattern.events().iter().map(|e| e.articulation).collect();
        assert_eq!(articulations, [Articulation::Rim, Articulation::Ghost]);
    }

    #[test]
    fn piano_grid_holds_until_next_chord() {
        let pattern = Pattern::builder(TimeSignature::FOUR_FOUR)
            .steps(Instrument::Piano, "x.....x.........")
            .build()
            .unwrap();
        let durations: Vec<f64> = pattern.events().iter().map(|e| e.duration_beats).collect();
        assert_eq!(durations, [1.5, 2.5]);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let beyond_measure = Pattern::builder(TimeSignature::THREE_FOUR)
            .hits(Instrument::Kick, &[3.0], 0.8)
            .build();
        assert!(beyond_measure.is_err());

        let loud = Pattern::builder(TimeSignature::FOUR_FOUR)
            .hits(Instrument::Kick, &[0.0], 1.2)
            .build();
        assert!(loud.is_err());

        let swung = Pattern::builder(TimeSignature::FOUR_FOUR).swing(0.9).build();
        assert!(swung.is_err());

        let inverted = Pattern::builder(TimeSignature::FOUR_FOUR)
            .tempo_range(140.0, 90.0)
            .build();
        assert!(inverted.is_err());

        let typo = Pattern::builder(TimeSignature::FOUR_FOUR)
            .steps(Instrument::ClosedHat, "x.y.")
            .build();
        assert!(typo.is_err());
    }

    #[test]
    fn swing_moves_only_the_offbeat() {
        let pattern = Pattern::builder(TimeSignature::FOUR_FOUR)
            .swing(2.0 / 3.0)
            .build()
            .unwrap();

        assert_eq!(pattern.swing_beat(2.0), 2.0);
        assert!((pattern.swing_beat(1.5) - (1.0 + 2.0 / 3.0)).abs() < 1e-12);
        // A straight sixteenth before the "&" is squeezed proportionally
        assert!((pattern.swing_beat(0.25) - 1.0 / 3.0).abs() < 1e-12);
        // ...and the one after it is squeezed into the remaining third
        assert!((pattern.swing_beat(0.75) - (2.0 / 3.0 + 1.0 / 6.0)).abs() < 1e-12);
    }

    #[test]
    fn straight_swing_is_identity() {
        for beat in [0.0, 0.25, 0.5, 0.75, 3.5] {
            assert_eq!(swing_position(beat, 0.5), beat);
        }
    }

    #[test]
    fn piano_events_route_to_piano_channel() {
        assert_eq!(Instrument::Piano.channel(), Channel::Piano);
        assert_eq!(Instrument::Ride.channel(), Channel::Drums);
        assert_eq!("open-hat".parse::<Instrument>().unwrap(), Instrument::OpenHat);
    }
}
