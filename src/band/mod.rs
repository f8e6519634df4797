//! The band: a style, a chord progression and three instruments on one clock.
//!
//! [`Band`] is the control-side coordinator. It owns a [`Session`] (scheduler,
//! instrument engines, mixer desk and the engine's command queue) behind a
//! mutex shared with the tick thread. Nothing here is global: every band is
//! built by its caller and two bands share only the immutable style library.
//!
//! ```ignore
//! let (engine, renderer) = saavy_band::engine::create(EngineConfig::default());
//! let _output = OutputDevice::open(renderer)?;
//! let mut band = Band::new(Arc::new(StyleLibrary::reference()?), engine, BandConfig::default());
//! band.play("jazz", 1, 140.0, Some("Dm7 G7 Cmaj7".parse()?));
//! ```

pub mod arrangement;
pub mod bass_line;
mod driver;
pub mod mixer;

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tracing::{debug, info, warn};

pub use self::{
    arrangement::{Arrangement, Cue},
    bass_line::{bass_line, BassMode, BassNote, MeasureSlot},
    mixer::{Mixer, MixerChannel},
};
use self::driver::TickDriver;
use crate::{
    engine::{AudioClock, Channel, EngineHandle, LevelMeters, Levels, Scheduler, SchedulerConfig},
    sequencing::{Style, StyleKey, StyleLibrary},
    synth::{BassEngine, DrumEngine, EngineCommand, PianoEngine, Voice},
    theory::{Chord, ChordProgression},
    voices::{BassTone, DrumKit, PianoTone},
};

pub const MIN_BPM: f32 = 40.0;
pub const MAX_BPM: f32 = 240.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandConfig {
    /// Measures each chord of the progression lasts.
    pub measures_per_chord: u64,
    pub kit: DrumKit,
    pub bass_tone: BassTone,
    pub piano_tone: PianoTone,
    pub bass_mode: BassMode,
    pub bass_octave: i32,
    pub piano_octave: i32,
    pub scheduler: SchedulerConfig,
    /// Run the tick thread while playing. Turn off to drive [`Band::tick`]
    /// by hand (offline rendering, tests).
    pub drive_ticks: bool,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            measures_per_chord: 1,
            kit: DrumKit::default(),
            bass_tone: BassTone::default(),
            piano_tone: PianoTone::default(),
            bass_mode: BassMode::default(),
            bass_octave: 2,
            piano_octave: 4,
            scheduler: SchedulerConfig::default(),
            drive_ticks: true,
        }
    }
}

impl BandConfig {
    pub fn with_measures_per_chord(mut self, measures: u64) -> Self {
        self.measures_per_chord = measures.max(1);
        self
    }

    pub fn with_kit(mut self, kit: DrumKit) -> Self {
        self.kit = kit;
        self
    }

    pub fn with_bass_tone(mut self, tone: BassTone) -> Self {
        self.bass_tone = tone;
        self
    }

    pub fn with_piano_tone(mut self, tone: PianoTone) -> Self {
        self.piano_tone = tone;
        self
    }

    pub fn with_bass_mode(mut self, mode: BassMode) -> Self {
        self.bass_mode = mode;
        self
    }

    pub fn with_octaves(mut self, bass: i32, piano: i32) -> Self {
        self.bass_octave = bass;
        self.piano_octave = piano;
        self
    }

    pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_drive_ticks(mut self, drive: bool) -> Self {
        self.drive_ticks = drive;
        self
    }
}

/// Read-only view of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportSnapshot {
    pub bpm: f32,
    pub playing: bool,
    pub measure: u64,
    pub beat: f64,
    pub bass_mode: BassMode,
    pub chord: Option<Chord>,
    pub style: Option<StyleKey>,
    pub style_name: Option<String>,
}

/// A cue that was turned into sound by a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Onset {
    /// Exact intended time, seconds on the audio clock.
    pub time: f64,
    pub start_frame: u64,
    pub measure: u64,
    pub beat: f64,
    pub cue: Cue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub onsets: Vec<Onset>,
    /// Events skipped because they were already in the past.
    pub stale: usize,
    /// Events not synthesized because their channel was muted.
    pub muted: usize,
}

struct Playing {
    scheduler: Scheduler<Cue>,
    arrangement: Arrangement,
    style: Style,
}

/// Everything the control thread and the tick thread share.
pub(crate) struct Session {
    engine: EngineHandle,
    drums: DrumEngine,
    bass: BassEngine,
    piano: PianoEngine,
    mixer: Mixer,
    bpm: f32,
    bass_mode: BassMode,
    piano_octave: i32,
    playing: Option<Playing>,
}

pub(crate) fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Session {
    pub(crate) fn now(&self) -> f64 {
        self.engine.clock().now()
    }

    fn send_all(&mut self, commands: Vec<EngineCommand>) {
        for command in commands {
            self.engine.send(command);
        }
    }

    /// Drop the scheduler and cut everything the renderer still holds.
    fn halt(&mut self) -> bool {
        if self.playing.take().is_none() {
            return false;
        }
        self.engine.send(EngineCommand::Silence);
        self.engine.collect_garbage();
        true
    }

    pub(crate) fn tick(&mut self, now: f64) -> TickReport {
        self.engine.collect_garbage();
        let Some(playing) = self.playing.as_mut() else {
            return TickReport::default();
        };

        let outcome = playing.scheduler.tick(now, &mut playing.arrangement);
        let mut report = TickReport {
            stale: outcome.stale,
            ..TickReport::default()
        };
        if outcome.stale > 0 {
            warn!(skipped = outcome.stale, now, "scheduler fell behind, skipped stale events");
        }

        let sample_rate = self.engine.sample_rate() as f64;
        for dispatch in outcome.due {
            if self.mixer.is_muted(dispatch.cue.channel()) {
                report.muted += 1;
                continue;
            }
            let start_frame = (dispatch.time * sample_rate).round().max(0.0) as u64;
            let voices = self.voices_for(&dispatch.cue, start_frame, dispatch.seconds_per_beat);
            for voice in voices {
                self.engine.send(EngineCommand::Trigger(voice));
            }
            report.onsets.push(Onset {
                time: dispatch.time,
                start_frame,
                measure: dispatch.measure,
                beat: dispatch.beat,
                cue: dispatch.cue,
            });
        }
        report
    }

    fn voices_for(&self, cue: &Cue, start_frame: u64, seconds_per_beat: f64) -> Vec<Voice> {
        let hold = |beats: f64| (beats * seconds_per_beat) as f32;
        match *cue {
            Cue::Drum {
                instrument,
                articulation,
                velocity,
            } => self
                .drums
                .hit(instrument, articulation, velocity, start_frame)
                .into_iter()
                .collect(),
            Cue::Bass {
                note,
                velocity,
                beats,
            } => vec![self.bass.note(note, velocity, start_frame, hold(beats))],
            Cue::Piano {
                chord,
                velocity,
                beats,
            } => self
                .piano
                .chord(chord, self.piano_octave, velocity, start_frame, hold(beats)),
        }
    }
}

/// Tempo in range, quietly.
pub fn clamp_bpm(bpm: f32) -> f32 {
    let clamped = if bpm.is_nan() {
        MIN_BPM
    } else {
        bpm.clamp(MIN_BPM, MAX_BPM)
    };
    if clamped != bpm {
        debug!(requested = bpm, bpm = clamped, "tempo clamped");
    }
    clamped
}

/// A playable backing band.
pub struct Band {
    session: Arc<Mutex<Session>>,
    library: Arc<StyleLibrary>,
    config: BandConfig,
    clock: AudioClock,
    meters: Arc<LevelMeters>,
    driver: Option<TickDriver>,
}

impl Band {
    pub fn new(library: Arc<StyleLibrary>, engine: EngineHandle, config: BandConfig) -> Self {
        let timing = engine.config().voice_timing();
        let clock = engine.clock().clone();
        let meters = Arc::clone(engine.meters());

        let mut session = Session {
            engine,
            drums: DrumEngine::new(config.kit, timing),
            bass: BassEngine::new(config.bass_tone, timing),
            piano: PianoEngine::new(config.piano_tone, timing),
            mixer: Mixer::default(),
            bpm: clamp_bpm(120.0),
            bass_mode: config.bass_mode,
            piano_octave: config.piano_octave,
            playing: None,
        };
        let commands = session.mixer.commands();
        session.send_all(commands);

        Self {
            session: Arc::new(Mutex::new(session)),
            library,
            config,
            clock,
            meters,
            driver: None,
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        lock(&self.session)
    }

    pub fn library(&self) -> &Arc<StyleLibrary> {
        &self.library
    }

    pub fn config(&self) -> &BandConfig {
        &self.config
    }

    pub fn clock(&self) -> &AudioClock {
        &self.clock
    }

    /// Start playing a style. Unknown styles fall back to the library
    /// default; the tempo is clamped to 40..=240. Playing again while
    /// already playing restarts from the first measure.
    pub fn play(
        &mut self,
        genre: &str,
        style_id: u8,
        bpm: f32,
        progression: Option<ChordProgression>,
    ) -> StyleKey {
        self.stop_driver();
        let style = self.library.resolve(genre, style_id).clone();
        let bpm = clamp_bpm(bpm);
        let mut progression = progression.unwrap_or_default();
        progression.reset();

        {
            let mut session = self.session();
            session.halt();

            let commands = session.mixer.commands();
            session.send_all(commands);

            let mut arrangement = Arrangement::new(
                Arc::clone(&style.pattern),
                progression,
                self.config.measures_per_chord,
                session.bass_mode,
                self.config.bass_octave,
            );
            let now = session.now();
            let scheduler =
                Scheduler::start(self.config.scheduler, now, bpm as f64, &mut arrangement);
            info!(style = %style.key, name = %style.name, bpm, "band playing");

            session.bpm = bpm;
            session.playing = Some(Playing {
                scheduler,
                arrangement,
                style: style.clone(),
            });
        }

        if self.config.drive_ticks {
            self.driver = Some(TickDriver::spawn(
                Arc::clone(&self.session),
                self.config.scheduler.tick_interval,
            ));
        }
        style.key
    }

    /// Stop playing. Voices not yet started are dropped and sounding ones
    /// are released. Does nothing when already stopped.
    pub fn stop(&mut self) {
        self.stop_driver();
        if self.session().halt() {
            info!("band stopped");
        }
    }

    fn stop_driver(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            driver.stop();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.session().playing.is_some()
    }

    /// Dispatch everything due by `now` (seconds on the audio clock).
    ///
    /// The tick thread calls this every tick interval; call it by hand when
    /// the band was configured without one.
    pub fn tick(&self, now: f64) -> TickReport {
        self.session().tick(now)
    }

    /// Takes effect at the next measure boundary. Returns the clamped tempo.
    pub fn set_bpm(&self, bpm: f32) -> f32 {
        let bpm = clamp_bpm(bpm);
        let mut session = self.session();
        session.bpm = bpm;
        if let Some(playing) = session.playing.as_mut() {
            playing.scheduler.set_bpm(bpm as f64);
        }
        bpm
    }

    pub fn bpm(&self) -> f32 {
        self.session().bpm
    }

    /// Takes effect from the next planned measure.
    pub fn set_bass_mode(&self, mode: BassMode) {
        let mut session = self.session();
        session.bass_mode = mode;
        if let Some(playing) = session.playing.as_mut() {
            playing.arrangement.set_bass_mode(mode);
        }
    }

    pub fn bass_mode(&self) -> BassMode {
        self.session().bass_mode
    }

    pub fn set_kit(&self, kit: DrumKit) {
        self.session().drums.set_kit(kit);
    }

    pub fn set_bass_tone(&self, tone: BassTone) {
        self.session().bass.set_tone(tone);
    }

    pub fn set_piano_tone(&self, tone: PianoTone) {
        self.session().piano.set_tone(tone);
    }

    /// Returns the clamped volume.
    pub fn set_channel_volume(&self, channel: Channel, volume: f32) -> f32 {
        let mut session = self.session();
        let gain = session.mixer.set_volume(channel, volume);
        session.engine.send(EngineCommand::SetGain { channel, gain });
        gain
    }

    pub fn set_mute(&self, channel: Channel, muted: bool) -> bool {
        let mut session = self.session();
        session.mixer.set_mute(channel, muted);
        session.engine.send(EngineCommand::SetMute { channel, muted });
        muted
    }

    /// Returns the new mute state.
    pub fn toggle_mute(&self, channel: Channel) -> bool {
        let mut session = self.session();
        let muted = session.mixer.toggle_mute(channel);
        session.engine.send(EngineCommand::SetMute { channel, muted });
        muted
    }

    pub fn set_master_volume(&self, volume: f32) -> f32 {
        let mut session = self.session();
        let gain = session.mixer.set_master(volume);
        session.engine.send(EngineCommand::SetMaster(gain));
        gain
    }

    pub fn mixer(&self) -> Mixer {
        self.session().mixer
    }

    pub fn transport(&self) -> TransportSnapshot {
        let session = self.session();
        let now = session.now();
        let mut snapshot = TransportSnapshot {
            bpm: session.bpm,
            playing: false,
            measure: 0,
            beat: 0.0,
            bass_mode: session.bass_mode,
            chord: None,
            style: None,
            style_name: None,
        };
        if let Some(playing) = session.playing.as_ref() {
            let (measure, beat) = playing.scheduler.position(now);
            snapshot.playing = true;
            snapshot.measure = measure;
            snapshot.beat = beat;
            snapshot.chord = Some(
                playing
                    .arrangement
                    .chord_for(measure)
                    .unwrap_or_else(|| playing.arrangement.current_chord()),
            );
            snapshot.style = Some(playing.style.key.clone());
            snapshot.style_name = Some(playing.style.name.clone());
        }
        snapshot
    }

    /// Per-channel and master RMS from the last render call.
    pub fn levels(&self) -> Levels {
        self.meters.snapshot()
    }

    pub fn tick_interval(&self) -> Duration {
        self.config.scheduler.tick_interval
    }
}

impl Drop for Band {
    fn drop(&mut self) {
        self.stop_driver();
    }
}
