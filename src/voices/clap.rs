//! Hand clap.
//!
//! Three staggered noise bursts through a bandpass. Real claps are several
//! hands landing a few milliseconds apart; the bursts are offset by giving
//! each a slightly longer attack.

use crate::{
    graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode},
    voices::{DrumKit, Patch},
};

pub fn clap(kit: DrumKit) -> Patch {
    let tuning = kit.tuning();
    let decay = 0.12;
    let release = 0.1;

    let burst = |seed: u64, attack: f32| {
        OscNode::noise_seeded(seed).amplify(EnvNode::percussive(attack, 0.02, 0.02))
    };

    let graph = burst(0xC1A9, 0.001)
        .layer(burst(0xC1AA, 0.008), 0.8)
        .layer(burst(0xC1AB, 0.016), 0.7)
        .layer(
            OscNode::noise_seeded(0xC1AC).amplify(EnvNode::percussive(0.018, decay, release)),
            0.9,
        )
        .through(FilterNode::bandpass(1_200.0 * tuning.brightness).with_resonance(0.3));

    Patch::new(graph, 0.018 + decay, release)
}
