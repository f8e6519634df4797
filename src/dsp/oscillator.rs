use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Phase Accumulator
=================

Every periodic waveform here is a function of a normalized phase in [0, 1):

    phase[n+1] = fract(phase[n] + frequency / sample_rate)

  Sine      sin(2π · phase)
  Sawtooth  2 · phase - 1                 ramps -1 → +1, jumps back
  Square    +1 while phase < 0.5, else -1
  Triangle  1 - 4 · |phase - 0.5|          -1 at 0, +1 at 0.5

The waveforms are naive (not band-limited). Voices here sit low in the
spectrum and go through a lowpass before reaching the bus, so aliasing from
the upper partials of saw/square stays well below the filtered body.

Noise ignores phase entirely and draws uniform samples in [-1, 1) from a
seeded generator, so renders are reproducible.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    Square,
    Triangle,
    Noise,
}

const NOISE_SEED: u64 = 0x5AA7_B0A7;

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
    rng: fastrand::Rng,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            rng: fastrand::Rng::with_seed(NOISE_SEED),
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn noise() -> Self {
        Self::new(OscillatorWaveform::Noise)
    }

    /// Reseed the noise generator (no effect on periodic waveforms).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    /// Restart the cycle from phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn next_sample(&mut self, increment: f32) -> f32 {
        let value = match self.waveform {
            OscillatorWaveform::Sine => (TAU * self.phase).sin(),
            OscillatorWaveform::Saw => 2.0 * self.phase - 1.0,
            OscillatorWaveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            OscillatorWaveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
            OscillatorWaveform::Noise => self.rng.f32() * 2.0 - 1.0,
        };

        self.phase += increment;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        value
    }

    pub fn render(&mut self, destination: &mut [f32], ctx: &RenderCtx) {
        let increment = (ctx.frequency / ctx.sample_rate).max(0.0);
        for sample in destination.iter_mut() {
            *sample = self.next_sample(increment);
        }
    }
}
