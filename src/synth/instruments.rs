use tracing::warn;

use crate::{
    engine::Channel,
    sequencing::{Articulation, Instrument},
    synth::{
        factory::{VoiceFactory, VoiceTiming},
        voice::{Strike, Voice},
    },
    theory::{note_frequency, Chord, Note, PitchClass},
    voices::{self, BassTone, DrumKit, Patch, PianoTone},
};

/// Ghost notes are felt more than heard.
const GHOST_VELOCITY: f32 = 0.6;

/// Bass fallback pitch for unparseable note names: A1, 55 Hz.
pub const DEFAULT_BASS_NOTE: Note = Note::new(PitchClass::A, 1);
/// Piano fallback pitch for unparseable note names: C4, about 261.63 Hz.
pub const DEFAULT_PIANO_NOTE: Note = Note::new(PitchClass::C, 4);

/// Synthesizes drum hits for one kit.
#[derive(Debug, Clone)]
pub struct DrumEngine {
    kit: DrumKit,
    timing: VoiceTiming,
}

impl DrumEngine {
    pub fn new(kit: DrumKit, timing: VoiceTiming) -> Self {
        Self { kit, timing }
    }

    pub fn kit(&self) -> DrumKit {
        self.kit
    }

    pub fn set_kit(&mut self, kit: DrumKit) {
        self.kit = kit;
    }

    /// One drum hit starting at `start_frame`.
    ///
    /// Returns `None` for [`Instrument::Piano`], which the piano engine plays.
    pub fn hit(
        &self,
        instrument: Instrument,
        articulation: Articulation,
        velocity: f32,
        start_frame: u64,
    ) -> Option<Voice> {
        if !instrument.is_drum() {
            return None;
        }
        let velocity = match articulation {
            Articulation::Ghost => velocity * GHOST_VELOCITY,
            _ => velocity,
        };
        Some(self.synthesize((instrument, articulation), Strike::hit(velocity, start_frame)))
    }
}

impl VoiceFactory for DrumEngine {
    type Variant = (Instrument, Articulation);

    fn channel(&self) -> Channel {
        Channel::Drums
    }

    fn timing(&self) -> VoiceTiming {
        self.timing
    }

    fn patch(&self, (instrument, articulation): Self::Variant) -> Patch {
        let kit = self.kit;
        match instrument {
            Instrument::Kick => voices::kick(kit),
            Instrument::Snare => voices::snare(kit, articulation),
            Instrument::ClosedHat => voices::hihat(kit),
            Instrument::OpenHat => voices::openhat(kit),
            Instrument::Clap => voices::clap(kit),
            Instrument::Tom => voices::tom(kit, articulation),
            Instrument::Crash => voices::crash(kit),
            // Piano never reaches here through `hit`; a ride is the
            // harmless answer for direct callers.
            Instrument::Ride | Instrument::Piano => voices::ride(kit),
        }
    }
}

/// Synthesizes bass notes in one tone.
#[derive(Debug, Clone)]
pub struct BassEngine {
    tone: BassTone,
    timing: VoiceTiming,
}

impl BassEngine {
    pub fn new(tone: BassTone, timing: VoiceTiming) -> Self {
        Self { tone, timing }
    }

    pub fn tone(&self) -> BassTone {
        self.tone
    }

    pub fn set_tone(&mut self, tone: BassTone) {
        self.tone = tone;
    }

    /// A note held for `hold` seconds, then released.
    pub fn note(&self, note: Note, velocity: f32, start_frame: u64, hold: f32) -> Voice {
        self.synthesize(
            (),
            Strike::note(note.frequency(), velocity, start_frame, hold),
        )
    }

    /// Like [`note`](Self::note) from a name such as `"E1"`. Unknown names
    /// play A1 instead.
    pub fn note_named(&self, name: &str, velocity: f32, start_frame: u64, hold: f32) -> Voice {
        let frequency = note_frequency(name).unwrap_or_else(|err| {
            warn!(%err, fallback = %DEFAULT_BASS_NOTE, "bass note substituted");
            DEFAULT_BASS_NOTE.frequency()
        });
        self.synthesize((), Strike::note(frequency, velocity, start_frame, hold))
    }
}

impl VoiceFactory for BassEngine {
    type Variant = ();

    fn channel(&self) -> Channel {
        Channel::Bass
    }

    fn timing(&self) -> VoiceTiming {
        self.timing
    }

    fn patch(&self, _: ()) -> Patch {
        voices::bass(self.tone)
    }
}

/// Synthesizes piano notes and chords in one tone.
#[derive(Debug, Clone)]
pub struct PianoEngine {
    tone: PianoTone,
    timing: VoiceTiming,
}

impl PianoEngine {
    pub fn new(tone: PianoTone, timing: VoiceTiming) -> Self {
        Self { tone, timing }
    }

    pub fn tone(&self) -> PianoTone {
        self.tone
    }

    pub fn set_tone(&mut self, tone: PianoTone) {
        self.tone = tone;
    }

    pub fn note(&self, note: Note, velocity: f32, start_frame: u64, hold: f32) -> Voice {
        self.synthesize(
            (),
            Strike::note(note.frequency(), velocity, start_frame, hold),
        )
    }

    /// Unknown names play C4 instead.
    pub fn note_named(&self, name: &str, velocity: f32, start_frame: u64, hold: f32) -> Voice {
        let frequency = note_frequency(name).unwrap_or_else(|err| {
            warn!(%err, fallback = %DEFAULT_PIANO_NOTE, "piano note substituted");
            DEFAULT_PIANO_NOTE.frequency()
        });
        self.synthesize((), Strike::note(frequency, velocity, start_frame, hold))
    }

    /// Root-position chord with its root in `octave`, one voice per tone.
    pub fn chord(
        &self,
        chord: Chord,
        octave: i32,
        velocity: f32,
        start_frame: u64,
        hold: f32,
    ) -> Vec<Voice> {
        // Spread the level so a four-note chord is not four times as loud
        let tones = chord.voicing(octave);
        let per_note = velocity / (tones.len() as f32).sqrt();
        tones
            .into_iter()
            .map(|note| self.note(note, per_note, start_frame, hold))
            .collect()
    }
}

impl VoiceFactory for PianoEngine {
    type Variant = ();

    fn channel(&self) -> Channel {
        Channel::Piano
    }

    fn timing(&self) -> VoiceTiming {
        self.timing
    }

    fn patch(&self, _: ()) -> Patch {
        voices::piano(self.tone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::ChordQuality;

    fn timing() -> VoiceTiming {
        VoiceTiming::new(48_000.0)
    }

    #[test]
    fn drum_hits_route_to_drum_channel() {
        let drums = DrumEngine::new(DrumKit::Rock, timing());
        let voice = drums
            .hit(Instrument::Kick, Articulation::Normal, 0.9, 480)
            .unwrap();
        assert_eq!(voice.channel(), Channel::Drums);
        assert_eq!(voice.start_frame(), 480);
        assert!(drums
            .hit(Instrument::Piano, Articulation::Normal, 0.9, 0)
            .is_none());
    }

    #[test]
    fn ghost_notes_are_quieter() {
        let drums = DrumEngine::new(DrumKit::Acoustic, timing());
        let normal = drums.hit(Instrument::Snare, Articulation::Normal, 0.8, 0).unwrap();
        let ghost = drums.hit(Instrument::Snare, Articulation::Ghost, 0.8, 0).unwrap();
        assert!(ghost.velocity() < normal.velocity());
    }

    #[test]
    fn unknown_bass_note_falls_back_to_a1() {
        let bass = BassEngine::new(BassTone::Fingerstyle, timing());
        let voice = bass.note_named("H9", 0.8, 0, 0.5);
        assert_eq!(voice.frequency(), 55.0);
        assert_eq!(voice.channel(), Channel::Bass);

        let voice = bass.note_named("C999999999", 0.8, 0, 0.5);
        assert_eq!(voice.frequency(), 55.0);

        let voice = bass.note_named("E1", 0.8, 0, 0.5);
        assert!((voice.frequency() - 41.2).abs() < 0.01);
    }

    #[test]
    fn unknown_piano_note_falls_back_to_middle_c() {
        let piano = PianoEngine::new(PianoTone::Grand, timing());
        for name in ["", "C999999999"] {
            let voice = piano.note_named(name, 0.8, 0, 0.5);
            assert!((voice.frequency() - 261.63).abs() < 0.01, "'{name}'");
        }
    }

    #[test]
    fn chord_plays_every_tone() {
        let piano = PianoEngine::new(PianoTone::Electric, timing());
        let chord = Chord::new(PitchClass::A, ChordQuality::Minor7);
        let voices = piano.chord(chord, 3, 0.8, 100, 1.0);

        assert_eq!(voices.len(), 4);
        assert!((voices[0].frequency() - 220.0).abs() < 0.01);
        assert!(voices.iter().all(|v| v.start_frame() == 100));
        assert!(voices.iter().all(|v| v.channel() == Channel::Piano));
    }

    #[test]
    fn hold_extends_the_gate() {
        let bass = BassEngine::new(BassTone::Pick, timing());
        let short = bass.note(Note::A4, 0.8, 0, 0.0);
        let long = bass.note(Note::A4, 0.8, 0, 1.0);
        assert_eq!(long.release_frame(), 48_000);
        assert!(short.release_frame() < long.release_frame());
    }
}
