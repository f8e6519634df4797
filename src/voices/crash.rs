//! Crash cymbal: a long wash of highpassed noise and inharmonic squares.

use crate::{
    graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode},
    voices::{DrumKit, Patch},
};

pub fn crash(kit: DrumKit) -> Patch {
    let tuning = kit.tuning();
    let decay = 1.2;
    let release = 0.3;

    let metal = OscNode::square()
        .with_frequency(420.0)
        .layer(OscNode::square().with_frequency(593.0), 0.7)
        .layer(OscNode::square().with_frequency(871.0), 0.5);

    let graph = OscNode::noise_seeded(0xC8A5)
        .mix(metal, 0.25)
        .amplify(EnvNode::percussive(0.003, decay, release))
        .through(FilterNode::highpass(tuning.cymbal_cutoff * 0.6));

    Patch::new(graph, 0.003 + decay, release)
}
