//! Open hi-hat.
//!
//! Same metal as the closed hat, with a much longer decay and a bandpass
//! peak that gives the "tsss" its sizzle.

use crate::{
    graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode},
    voices::{DrumKit, Patch},
};

pub fn openhat(kit: DrumKit) -> Patch {
    let tuning = kit.tuning();
    let decay = 0.35;
    let release = 0.12;

    let metal = OscNode::square()
        .with_frequency(540.0)
        .layer(OscNode::square().with_frequency(800.0), 0.8)
        .layer(OscNode::square().with_frequency(1_160.0), 0.6);

    let graph = OscNode::noise_seeded(0x0BE7)
        .mix(metal, 0.35)
        .amplify(EnvNode::percussive(0.002, decay, release))
        .through(FilterNode::highpass(tuning.cymbal_cutoff * 0.85))
        .through(FilterNode::bandpass(tuning.cymbal_cutoff * 1.3).with_resonance(0.3));

    Patch::new(graph, 0.002 + decay, release)
}
