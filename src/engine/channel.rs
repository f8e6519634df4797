#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

use crate::error::{BandError, Result};

/*
Mixer Channels and Gain Stages
==============================

Every voice is routed to one of three channel buses. Each bus has a gain
stage, and the three buses sum into the master stage:

  drum voices  ──→ [Drums gain] ──┐
  bass voices  ──→ [Bass gain]  ──┼──→ [Master gain] ──→ tanh ──→ device
  piano voices ──→ [Piano gain] ──┘

Because gain lives on the bus, a volume change affects every voice that is
already sounding as well as every future one, without re-synthesis.

Gain changes ramp linearly to the new target over a fixed number of samples
(5 ms by default). A jump from 1.0 to 0.0 in one sample is an audible click;
spread over a few hundred samples it is not. Mute is a gain target of zero
that remembers the fader position underneath.
*/

/// Mixer bus a voice is routed to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Drums,
    Bass,
    Piano,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Drums, Channel::Bass, Channel::Piano];
    pub const COUNT: usize = 3;

    pub fn index(self) -> usize {
        match self {
            Channel::Drums => 0,
            Channel::Bass => 1,
            Channel::Piano => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Drums => "drums",
            Channel::Bass => "bass",
            Channel::Piano => "piano",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.name() == s)
            .ok_or_else(|| BandError::invalid(format!("unknown channel '{s}'")))
    }
}

/// Smoothed gain with a mute switch. Realtime-safe.
#[derive(Debug, Clone)]
pub struct GainStage {
    gain: f32,
    muted: bool,
    current: f32,
    step: f32,
    remaining: u32,
    ramp_samples: u32,
}

impl GainStage {
    pub fn new(gain: f32, ramp_samples: u32) -> Self {
        let gain = gain.clamp(0.0, 1.0);
        Self {
            gain,
            muted: false,
            current: gain,
            step: 0.0,
            remaining: 0,
            ramp_samples: ramp_samples.max(1),
        }
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
        self.retarget();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.retarget();
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level the ramp is heading for.
    pub fn target(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.gain
        }
    }

    /// Level applied to the most recent sample.
    pub fn current(&self) -> f32 {
        self.current
    }

    fn retarget(&mut self) {
        self.remaining = self.ramp_samples;
        self.step = (self.target() - self.current) / self.ramp_samples as f32;
    }

    #[inline]
    pub fn next_gain(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target()
            } else {
                self.current + self.step
            };
        }
        self.current
    }

    /// Apply the (ramping) gain in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        if self.remaining == 0 {
            let gain = self.current;
            if gain != 1.0 {
                buffer.iter_mut().for_each(|s| *s *= gain);
            }
            return;
        }
        for sample in buffer.iter_mut() {
            *sample *= self.next_gain();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(channel.name().parse::<Channel>().unwrap(), channel);
        }
        assert_eq!(
            "horns".parse::<Channel>(),
            Err(BandError::InvalidParameter("unknown channel 'horns'".into()))
        );
    }

    #[test]
    fn gain_ramps_over_configured_samples() {
        let mut stage = GainStage::new(1.0, 240);
        stage.set_gain(0.0);

        let mut buffer = vec![1.0f32; 480];
        stage.process(&mut buffer);

        assert!(buffer[0] > 0.99, "ramp starts near the old gain");
        assert!(buffer[120] > 0.4 && buffer[120] < 0.6);
        assert!(buffer[239..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn mute_remembers_fader_position() {
        let mut stage = GainStage::new(0.8, 10);
        stage.set_muted(true);
        assert_eq!(stage.target(), 0.0);
        stage.set_muted(false);
        assert_eq!(stage.target(), 0.8);
        assert_eq!(stage.gain(), 0.8);
    }
}
