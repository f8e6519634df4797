use crate::{
    engine::Channel,
    synth::voice::{Strike, Voice},
    voices::Patch,
};

/// Frame-rate facts every voice needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceTiming {
    pub sample_rate: f32,
    /// Seconds after the release tail at which a voice is reaped regardless.
    pub grace: f32,
}

impl VoiceTiming {
    pub const DEFAULT_GRACE: f32 = 0.05;

    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            grace: Self::DEFAULT_GRACE,
        }
    }

    pub fn with_grace(mut self, grace: f32) -> Self {
        self.grace = grace.max(0.0);
        self
    }
}

/// The instrument design layer: turns a variant into a patch, and a patch
/// plus a strike into a routed voice.
pub trait VoiceFactory: Send {
    type Variant;

    fn channel(&self) -> Channel;

    fn timing(&self) -> VoiceTiming;

    fn patch(&self, variant: Self::Variant) -> Patch;

    fn synthesize(&self, variant: Self::Variant, strike: Strike) -> Voice {
        let timing = self.timing();
        Voice::new(
            self.channel(),
            self.patch(variant),
            strike,
            timing.sample_rate,
            timing.grace,
        )
    }
}
