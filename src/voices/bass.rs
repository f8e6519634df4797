//! Bass guitar and synth bass.
//!
//! All tones share one shape: a small harmonic stack that tracks the note,
//! one ADSR over the stack, an optional noise transient, and a lowpass. The
//! tone decides the attack, the harmonic balance and how the filter moves.
//!
//! | tone        | stack                         | transient      | filter                    |
//! |-------------|-------------------------------|----------------|---------------------------|
//! | Fingerstyle | triangle + 2nd                | soft thump     | static, dark              |
//! | Slap        | saw + 2nd + 3rd               | bright snap    | swept open, closes fast   |
//! | Pick        | saw + 2nd                     | pick scrape    | static, mid               |
//! | Synth       | saw + detuned square + sub    | none           | resonant, swept           |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

use crate::{
    error::{BandError, Result},
    graph::{
        envelope::EnvNode,
        extensions::NodeExt,
        filter::{FilterNode, FilterParam},
        oscillator::OscNode,
        GraphNode,
    },
    voices::Patch,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BassTone {
    #[default]
    Fingerstyle,
    Slap,
    Pick,
    Synth,
}

impl BassTone {
    pub const ALL: [BassTone; 4] = [
        BassTone::Fingerstyle,
        BassTone::Slap,
        BassTone::Pick,
        BassTone::Synth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BassTone::Fingerstyle => "fingerstyle",
            BassTone::Slap => "slap",
            BassTone::Pick => "pick",
            BassTone::Synth => "synth",
        }
    }
}

impl fmt::Display for BassTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BassTone {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self> {
        BassTone::ALL
            .into_iter()
            .find(|tone| tone.name() == s)
            .ok_or_else(|| BandError::invalid(format!("unknown bass tone '{s}'")))
    }
}

/// Build a bass note. Pitch comes from the render context.
pub fn bass(tone: BassTone) -> Patch {
    match tone {
        BassTone::Fingerstyle => {
            let (attack, decay, release) = (0.006, 0.25, 0.08);
            let string = OscNode::triangle()
                .layer(OscNode::sine().with_ratio(2.0), 0.3)
                .amplify(EnvNode::adsr(attack, decay, 0.6, release));
            let thump = transient(0xBA55, 400.0, 0.03);
            finish(string.layer(thump, 0.15), FilterNode::lowpass(900.0), attack + decay, release)
        }

        BassTone::Slap => {
            let (attack, decay, release) = (0.002, 0.18, 0.06);
            let string = OscNode::sawtooth()
                .layer(OscNode::sine().with_ratio(2.0), 0.5)
                .layer(OscNode::sine().with_ratio(3.0), 0.3)
                .amplify(EnvNode::adsr(attack, decay, 0.45, release));
            let snap = transient(0x51A9, 2_200.0, 0.015);
            let filter = FilterNode::lowpass(600.0)
                .with_resonance(0.3)
                .modulate(EnvNode::sweep(0.08), FilterParam::Cutoff, 2_400.0);
            finish(string.layer(snap, 0.4), filter, attack + decay, release)
        }

        BassTone::Pick => {
            let (attack, decay, release) = (0.003, 0.2, 0.07);
            let string = OscNode::sawtooth()
                .layer(OscNode::sine().with_ratio(2.0), 0.25)
                .amplify(EnvNode::adsr(attack, decay, 0.55, release));
            let scrape = transient(0x91C4, 3_000.0, 0.01);
            let filter = FilterNode::lowpass(1_400.0).with_resonance(0.15);
            finish(string.layer(scrape, 0.25), filter, attack + decay, release)
        }

        BassTone::Synth => {
            let (attack, decay, release) = (0.001, 0.3, 0.1);
            let stack = OscNode::sawtooth()
                .layer(OscNode::square().with_detune(7.0), 0.5)
                .layer(OscNode::sine().with_ratio(0.5), 0.6)
                .amplify(EnvNode::adsr(attack, decay, 0.7, release));
            let filter = FilterNode::lowpass(450.0)
                .with_resonance(0.6)
                .modulate(EnvNode::sweep(0.15), FilterParam::Cutoff, 1_800.0);
            finish(stack, filter, attack + decay, release)
        }
    }
}

/// Short bandpassed noise burst for the pluck, slap or pick.
fn transient(seed: u64, centre: f32, decay: f32) -> impl GraphNode {
    OscNode::noise_seeded(seed)
        .amplify(EnvNode::percussive(0.0005, decay, 0.02))
        .through(FilterNode::bandpass(centre).with_resonance(0.4))
}

fn finish<N, F>(source: N, filter: F, attack_decay: f32, release: f32) -> Patch
where
    N: GraphNode + 'static,
    F: GraphNode + 'static,
{
    Patch::new(source.through(filter), attack_decay, release)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RenderCtx;

    fn zero_crossings(buffer: &[f32]) -> usize {
        buffer
            .windows(2)
            .filter(|w| w[0] <= 0.0 && w[1] > 0.0)
            .count()
    }

    #[test]
    fn fingerstyle_tracks_note_pitch() {
        let ctx = RenderCtx::from_freq(48_000.0, 110.0, 1.0);
        let mut graph = bass(BassTone::Fingerstyle).into_graph();
        graph.note_on(&ctx);

        let mut buffer = vec![0.0f32; 48_000 / 2];
        for chunk in buffer.chunks_mut(64) {
            graph.render_block(chunk, &ctx);
        }
        // Half a second at 110 Hz
        let crossings = zero_crossings(&buffer[4_800..]) as f32 / 0.4;
        assert!((crossings - 110.0).abs() < 8.0, "got {crossings} Hz");
    }

    #[test]
    fn slap_attacks_faster_than_fingerstyle() {
        assert!(bass(BassTone::Slap).attack_decay() < bass(BassTone::Fingerstyle).attack_decay());
    }

    #[test]
    fn parses_tone_names() {
        assert_eq!("slap".parse::<BassTone>().unwrap(), BassTone::Slap);
        assert!("fretless".parse::<BassTone>().is_err());
    }
}
