//! Tom.
//!
//! Like the kick but higher and with a gentler sweep. `High` and `Low`
//! articulations pick the rack and floor toms; anything else is the middle
//! tom.

use crate::{
    graph::{
        envelope::EnvNode,
        extensions::NodeExt,
        filter::FilterNode,
        oscillator::{OscNode, OscParam},
    },
    sequencing::Articulation,
    voices::{DrumKit, Patch},
};

const ATTACK: f32 = 0.001;
const RELEASE: f32 = 0.08;

pub fn tom(kit: DrumKit, articulation: Articulation) -> Patch {
    let tuning = kit.tuning();
    let (scale, decay) = match articulation {
        Articulation::High => (1.45, 0.18),
        Articulation::Low => (0.7, 0.32),
        _ => (1.0, 0.24),
    };
    let base = tuning.tom_base * scale;

    let graph = OscNode::sine()
        .with_frequency(base)
        .modulate(EnvNode::sweep(0.06), OscParam::Frequency, tuning.tom_sweep * scale)
        .layer(OscNode::triangle().with_frequency(base * 1.5), 0.15)
        .amplify(EnvNode::percussive(ATTACK, decay, RELEASE))
        .through(FilterNode::lowpass(base * 6.0 * tuning.brightness));

    Patch::new(graph, ATTACK + decay, RELEASE)
}
