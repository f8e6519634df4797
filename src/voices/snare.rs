//! Snare drum.
//!
//! A tonal head (triangle, pitch-dropping slightly) crossfaded with bandpassed
//! noise for the wires. Articulations:
//!
//! - `Normal`: full hit, wires dominant
//! - `Ghost`: short and dark, almost no wires; the engine also drops the level
//! - `Rim`: cross-stick, a hollow knock with a click and no wires

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

pub fn snare(kit: DrumKit, articulation: Articulation) -> Patch {
    let tuning = kit.tuning();

    if articulation == Articulation::Rim {
        return cross_stick(tuning.snare_body, tuning.brightness);
    }

    let (decay, wires) = match articulation {
        Articulation::Ghost => (tuning.snare_decay * 0.5, 0.35),
        _ => (tuning.snare_decay, 0.7),
    };

    let body = OscNode::triangle()
        .with_frequency(tuning.snare_body)
        .modulate(EnvNode::sweep(0.02), OscParam::Frequency, 60.0)
        .amplify(EnvNode::percussive(ATTACK, decay * 0.6, 0.05))
        .through(FilterNode::lowpass(600.0 * tuning.brightness));

    let rattle = OscNode::noise_seeded(0x5A4E)
        .amplify(EnvNode::percussive(ATTACK, decay, RELEASE))
        .through(FilterNode::bandpass(tuning.snare_wires).with_resonance(0.2));

    Patch::new(body.mix(rattle, wires), ATTACK + decay, RELEASE)
}

fn cross_stick(body_hz: f32, brightness: f32) -> Patch {
    let decay = 0.06;

    let knock = OscNode::triangle()
        .with_frequency(body_hz * 1.8)
        .amplify(EnvNode::percussive(ATTACK, decay, 0.03));

    let click = OscNode::noise_seeded(0x7215)
        .amplify(EnvNode::percussive(ATTACK, 0.015, 0.02))
        .through(FilterNode::bandpass(1_800.0 * brightness).with_resonance(0.5));

    let graph = knock.layer(click, 0.6);
    Patch::new(graph, ATTACK + decay, 0.03)
}
