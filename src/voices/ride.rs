//! Ride cymbal: a defined "ping" over a quieter wash.

use crate::{
    graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode},
    voices::{DrumKit, Patch},
};

pub fn ride(kit: DrumKit) -> Patch {
    let tuning = kit.tuning();
    let decay = 0.6;
    let release = 0.2;

    let ping = OscNode::sine()
        .with_frequency(3_150.0)
        .layer(OscNode::sine().with_frequency(4_720.0), 0.5)
        .amplify(EnvNode::percussive(0.001, 0.25, 0.1));

    let wash = OscNode::noise_seeded(0x121D)
        .amplify(EnvNode::percussive(0.002, decay, release))
        .through(FilterNode::highpass(tuning.cymbal_cutoff));

    Patch::new(ping.mix(wash, 0.55), 0.002 + decay, release)
}
