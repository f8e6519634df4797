//! The real-time half of the band and its control-side handle.
//!
//! [`create`] builds a connected pair: an [`EngineHandle`] for the control
//! thread and a [`Renderer`] for the audio callback. They talk through two
//! lock-free SPSC queues (commands in, finished voices out) and share only
//! atomics (the frame clock and the level meters).

pub mod allocator;
pub mod channel;
pub mod meters;
pub mod renderer;
pub mod scheduler;

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::warn;

pub use self::{
    channel::{Channel, GainStage},
    meters::{AudioClock, LevelMeters, Levels},
    renderer::Renderer,
    scheduler::{Dispatch, MeasurePlan, MeasureSource, Scheduler, SchedulerConfig, TickOutcome},
};
use crate::synth::{factory::VoiceTiming, message::EngineCommand, voice::Voice};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Arena size; beyond this, voices are stolen.
    pub max_voices: usize,
    /// Command queue slots.
    pub command_capacity: usize,
    /// Seconds a gain change takes to reach its target.
    pub gain_smoothing: f32,
    /// Seconds after a release tail at which a voice is reaped regardless.
    pub voice_grace: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            max_voices: 64,
            command_capacity: 1_024,
            gain_smoothing: 0.005,
            voice_grace: VoiceTiming::DEFAULT_GRACE,
        }
    }
}

impl EngineConfig {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    pub fn with_max_voices(mut self, voices: usize) -> Self {
        self.max_voices = voices.max(1);
        self
    }

    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }

    pub fn with_gain_smoothing(mut self, seconds: f32) -> Self {
        self.gain_smoothing = seconds.max(0.0);
        self
    }

    pub fn with_voice_grace(mut self, seconds: f32) -> Self {
        self.voice_grace = seconds.max(0.0);
        self
    }

    pub fn voice_timing(&self) -> VoiceTiming {
        VoiceTiming::new(self.sample_rate).with_grace(self.voice_grace)
    }
}

/// Control-side end of the engine.
pub struct EngineHandle {
    commands: Producer<EngineCommand>,
    retired: Consumer<Voice>,
    clock: AudioClock,
    meters: Arc<LevelMeters>,
    config: EngineConfig,
}

/// Build a connected handle and renderer.
pub fn create(config: EngineConfig) -> (EngineHandle, Renderer) {
    let (commands, command_rx) = RingBuffer::new(config.command_capacity);
    // Every voice arrives as a command, so this many slots never fill while
    // the control side keeps collecting.
    let (retire_tx, retired) = RingBuffer::new(config.command_capacity + config.max_voices);

    let clock = AudioClock::new(config.sample_rate);
    let meters = Arc::new(LevelMeters::default());
    let ramp = (config.gain_smoothing * config.sample_rate).round() as u32;

    let renderer = Renderer::new(
        command_rx,
        retire_tx,
        config.max_voices,
        config.command_capacity,
        ramp,
        clock.clone(),
        Arc::clone(&meters),
    );

    let handle = EngineHandle {
        commands,
        retired,
        clock,
        meters,
        config,
    };
    (handle, renderer)
}

impl EngineHandle {
    /// Queue a command for the renderer. Returns false (and logs) when the
    /// queue is full and the command was dropped.
    pub fn send(&mut self, command: EngineCommand) -> bool {
        match self.commands.push(command) {
            Ok(()) => true,
            Err(rtrb::PushError::Full(command)) => {
                warn!(?command, "engine command queue full, dropping command");
                false
            }
        }
    }

    /// Free voices the renderer has finished with. Returns how many.
    pub fn collect_garbage(&mut self) -> usize {
        let mut count = 0;
        while let Ok(voice) = self.retired.pop() {
            drop(voice);
            count += 1;
        }
        count
    }

    pub fn clock(&self) -> &AudioClock {
        &self.clock
    }

    pub fn meters(&self) -> &Arc<LevelMeters> {
        &self.meters
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    /// Free command slots right now.
    pub fn capacity_left(&self) -> usize {
        self.commands.slots()
    }
}
