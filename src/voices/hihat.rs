//! Closed hi-hat.
//!
//! Highpassed noise with a very short decay, plus a cluster of detuned
//! squares for the metallic ring that plain noise lacks.

use crate::{
    graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode},
    voices::{DrumKit, Patch},
};

pub fn hihat(kit: DrumKit) -> Patch {
    let tuning = kit.tuning();
    let decay = 0.05;

    let metal = OscNode::square()
        .with_frequency(540.0)
        .layer(OscNode::square().with_frequency(800.0), 0.8)
        .layer(OscNode::square().with_frequency(1_160.0), 0.6);

    let graph = OscNode::noise_seeded(0x4A75)
        .mix(metal, 0.3)
        .amplify(EnvNode::percussive(0.001, decay, 0.03))
        .through(FilterNode::highpass(tuning.cymbal_cutoff));

    Patch::new(graph, 0.001 + decay, 0.03)
}
