//! Kick drum.
//!
//! A sine body whose pitch drops from `base + sweep` to `base` in the first
//! few tens of milliseconds, plus a short highpassed noise click for the
//! beater. The kit decides how deep the drop is and how long the body rings.
//!
//! # How It Works
//!
//! 1. Fixed-frequency sine, pitch swept by a velocity-independent envelope
//! 2. Percussive amplitude envelope (decay to silence, no sustain)
//! 3. Noise click, highpassed, 8 ms long
//! 4. Lowpass over the whole thing to keep the click from getting harsh

use crate::{
    graph::{
        envelope::EnvNode,
        extensions::NodeExt,
        filter::FilterNode,
        oscillator::{OscNode, OscParam},
    },
    voices::{DrumKit, Patch},
};

const ATTACK: f32 = 0.001;
const RELEASE: f32 = 0.05;

/// Build a kick for the given kit. The note pitch is ignored.
pub fn kick(kit: DrumKit) -> Patch {
    let tuning = kit.tuning();

    let body = OscNode::sine()
        .with_frequency(tuning.kick_base)
        .modulate(
            EnvNode::sweep(tuning.kick_sweep_time),
            OscParam::Frequency,
            tuning.kick_sweep,
        )
        .amplify(EnvNode::percussive(ATTACK, tuning.kick_decay, RELEASE));

    let click = OscNode::noise_seeded(0x4B1C)
        .through(FilterNode::highpass(2_500.0))
        .amplify(EnvNode::percussive(0.0005, 0.008, 0.02));

    let graph = body
        .layer(click, tuning.kick_click)
        .through(FilterNode::lowpass(4_000.0 * tuning.brightness));

    Patch::new(graph, ATTACK + tuning.kick_decay, RELEASE)
}
