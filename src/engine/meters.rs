use std::sync::{
    atomic::{AtomicU32, AtomicU64, Ordering},
    Arc,
};

use crate::engine::channel::Channel;

/// Frame counter published by the renderer.
///
/// The renderer is the only writer. Everything else reads it to timestamp
/// events against the audio the device has actually been asked to play.
#[derive(Debug, Clone)]
pub struct AudioClock {
    frames: Arc<AtomicU64>,
    sample_rate: f32,
}

impl AudioClock {
    pub(crate) fn new(sample_rate: f32) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Seconds of audio rendered so far.
    pub fn now(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub(crate) fn publish(&self, frames: u64) {
        self.frames.store(frames, Ordering::Release);
    }
}

/// RMS per channel bus and for the master output, one value per render call.
///
/// Values are f32 bit patterns in atomics so the renderer never locks.
#[derive(Debug, Default)]
pub struct LevelMeters {
    channels: [AtomicU32; Channel::COUNT],
    master: AtomicU32,
}

/// A snapshot of [`LevelMeters`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Levels {
    pub drums: f32,
    pub bass: f32,
    pub piano: f32,
    pub master: f32,
}

impl Levels {
    pub fn channel(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Drums => self.drums,
            Channel::Bass => self.bass,
            Channel::Piano => self.piano,
        }
    }
}

impl LevelMeters {
    pub fn channel(&self, channel: Channel) -> f32 {
        f32::from_bits(self.channels[channel.index()].load(Ordering::Relaxed))
    }

    pub fn master(&self) -> f32 {
        f32::from_bits(self.master.load(Ordering::Relaxed))
    }

    pub fn snapshot(&self) -> Levels {
        Levels {
            drums: self.channel(Channel::Drums),
            bass: self.channel(Channel::Bass),
            piano: self.channel(Channel::Piano),
            master: self.master(),
        }
    }

    pub(crate) fn store_channel(&self, channel: Channel, rms: f32) {
        self.channels[channel.index()].store(rms.to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn store_master(&self, rms: f32) {
        self.master.store(rms.to_bits(), Ordering::Relaxed);
    }
}

/// Running sum of squares, turned into RMS at the end of a render call.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RmsAccumulator {
    sum: f64,
    count: usize,
}

impl RmsAccumulator {
    #[inline]
    pub fn add(&mut self, samples: &[f32]) {
        self.sum += samples.iter().map(|&s| (s * s) as f64).sum::<f64>();
        self.count += samples.len();
    }

    pub fn take(&mut self) -> f32 {
        let rms = if self.count == 0 {
            0.0
        } else {
            (self.sum / self.count as f64).sqrt() as f32
        };
        *self = Self::default();
        rms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_converts_frames_to_seconds() {
        let clock = AudioClock::new(48_000.0);
        clock.publish(24_000);
        assert_eq!(clock.frames(), 24_000);
        assert_eq!(clock.now(), 0.5);

        let shared = clock.clone();
        clock.publish(48_000);
        assert_eq!(shared.now(), 1.0);
    }

    #[test]
    fn rms_of_full_scale_square_is_one() {
        let mut acc = RmsAccumulator::default();
        acc.add(&[1.0, -1.0, 1.0, -1.0]);
        assert_eq!(acc.take(), 1.0);
        assert_eq!(acc.take(), 0.0);
    }

    #[test]
    fn meters_store_levels_per_channel() {
        let meters = LevelMeters::default();
        meters.store_channel(Channel::Bass, 0.25);
        meters.store_master(0.5);

        let levels = meters.snapshot();
        assert_eq!(levels.bass, 0.25);
        assert_eq!(levels.drums, 0.0);
        assert_eq!(levels.channel(Channel::Bass), 0.25);
        assert_eq!(levels.master, 0.5);
    }
}
