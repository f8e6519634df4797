#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{engine::Channel, synth::EngineCommand};

/// One channel strip: fader position and mute switch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerChannel {
    pub gain: f32,
    pub muted: bool,
}

impl MixerChannel {
    pub fn new(gain: f32) -> Self {
        Self {
            gain: gain.clamp(0.0, 1.0),
            muted: false,
        }
    }
}

/// Control-side mixer state.
///
/// The renderer owns the gain stages that actually shape the audio; this is
/// the desk the control thread reads and writes. Every setter returns the
/// value it settled on and [`commands`](Self::commands) turns the whole desk
/// into the messages that bring a renderer in line with it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    channels: [MixerChannel; Channel::COUNT],
    master: f32,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            channels: [
                MixerChannel::new(0.9),
                MixerChannel::new(0.8),
                MixerChannel::new(0.7),
            ],
            master: 0.8,
        }
    }
}

impl Mixer {
    pub fn channel(&self, channel: Channel) -> MixerChannel {
        self.channels[channel.index()]
    }

    pub fn volume(&self, channel: Channel) -> f32 {
        self.channels[channel.index()].gain
    }

    pub fn is_muted(&self, channel: Channel) -> bool {
        self.channels[channel.index()].muted
    }

    pub fn master(&self) -> f32 {
        self.master
    }

    /// Clamped to 0..=1. Returns the stored gain.
    pub fn set_volume(&mut self, channel: Channel, volume: f32) -> f32 {
        let gain = clamp_unit(volume);
        self.channels[channel.index()].gain = gain;
        gain
    }

    pub fn set_mute(&mut self, channel: Channel, muted: bool) -> bool {
        self.channels[channel.index()].muted = muted;
        muted
    }

    /// Flip the mute switch and return the new state.
    pub fn toggle_mute(&mut self, channel: Channel) -> bool {
        let muted = !self.is_muted(channel);
        self.set_mute(channel, muted)
    }

    pub fn set_master(&mut self, volume: f32) -> f32 {
        self.master = clamp_unit(volume);
        self.master
    }

    /// Everything a fresh renderer needs to sound like this desk.
    pub fn commands(&self) -> Vec<EngineCommand> {
        let mut commands = Vec::with_capacity(Channel::COUNT * 2 + 1);
        for channel in Channel::ALL {
            let strip = self.channel(channel);
            commands.push(EngineCommand::SetGain {
                channel,
                gain: strip.gain,
            });
            commands.push(EngineCommand::SetMute {
                channel,
                muted: strip.muted,
            });
        }
        commands.push(EngineCommand::SetMaster(self.master));
        commands
    }
}

/// NaN reads as silence.
fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_is_clamped() {
        let mut mixer = Mixer::default();
        assert_eq!(mixer.set_volume(Channel::Bass, 1.7), 1.0);
        assert_eq!(mixer.set_volume(Channel::Bass, -0.2), 0.0);
        assert_eq!(mixer.set_volume(Channel::Bass, f32::NAN), 0.0);
        assert_eq!(mixer.set_master(0.5), 0.5);
    }

    #[test]
    fn toggle_returns_new_state_and_keeps_fader() {
        let mut mixer = Mixer::default();
        mixer.set_volume(Channel::Drums, 0.6);
        assert!(mixer.toggle_mute(Channel::Drums));
        assert!(mixer.is_muted(Channel::Drums));
        assert_eq!(mixer.volume(Channel::Drums), 0.6);
        assert!(!mixer.toggle_mute(Channel::Drums));
    }

    #[test]
    fn commands_cover_every_strip_and_master() {
        let mut mixer = Mixer::default();
        mixer.set_mute(Channel::Piano, true);
        let commands = mixer.commands();
        assert_eq!(commands.len(), 7);
        assert!(commands.iter().any(|c| matches!(
            c,
            EngineCommand::SetMute {
                channel: Channel::Piano,
                muted: true
            }
        )));
        assert!(matches!(commands.last(), Some(EngineCommand::SetMaster(_))));
    }
}
