//! Piano.
//!
//! Acoustic tones are a triangle fundamental with slightly stretched sine
//! partials (stiff strings are not perfectly harmonic) and a felt-hammer
//! noise burst. The electric tone is a sine pair with a short high "tine"
//! partial, the bell-like attack of a tine piano.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

use crate::{
    error::{BandError, Result},
    graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode},
    voices::Patch,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PianoTone {
    #[default]
    Grand,
    Bright,
    Electric,
}

impl PianoTone {
    pub const ALL: [PianoTone; 3] = [PianoTone::Grand, PianoTone::Bright, PianoTone::Electric];

    pub fn name(self) -> &'static str {
        match self {
            PianoTone::Grand => "grand",
            PianoTone::Bright => "bright",
            PianoTone::Electric => "electric",
        }
    }
}

impl fmt::Display for PianoTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PianoTone {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self> {
        PianoTone::ALL
            .into_iter()
            .find(|tone| tone.name() == s)
            .ok_or_else(|| BandError::invalid(format!("unknown piano tone '{s}'")))
    }
}

/// Build one piano string. Pitch comes from the render context.
pub fn piano(tone: PianoTone) -> Patch {
    match tone {
        PianoTone::Grand => acoustic(
            [0.45, 0.2, 0.1],
            0.12,
            3_500.0,
            (0.002, 0.9, 0.25, 0.3),
        ),
        PianoTone::Bright => acoustic(
            [0.6, 0.35, 0.2],
            0.2,
            6_500.0,
            (0.002, 0.7, 0.3, 0.25),
        ),
        PianoTone::Electric => electric(),
    }
}

fn acoustic(
    partials: [f32; 3],
    hammer_level: f32,
    cutoff: f32,
    (attack, decay, sustain, release): (f32, f32, f32, f32),
) -> Patch {
    let strings = OscNode::triangle()
        .layer(OscNode::sine().with_ratio(2.003), partials[0])
        .layer(OscNode::sine().with_ratio(3.009), partials[1])
        .layer(OscNode::sine().with_ratio(4.021), partials[2])
        .amplify(EnvNode::adsr(attack, decay, sustain, release));

    let hammer = OscNode::noise_seeded(0x9A40)
        .amplify(EnvNode::percussive(0.0005, 0.02, 0.02))
        .through(FilterNode::bandpass(2_500.0).with_resonance(0.3));

    let graph = strings
        .layer(hammer, hammer_level)
        .through(FilterNode::lowpass(cutoff));

    Patch::new(graph, attack + decay, release)
}

fn electric() -> Patch {
    let (attack, decay, release) = (0.003, 1.2, 0.25);

    let body = OscNode::sine()
        .layer(OscNode::sine().with_detune(4.0), 0.6)
        .amplify(EnvNode::adsr(attack, decay, 0.4, release));

    let tine = OscNode::sine()
        .with_ratio(14.0)
        .amplify(EnvNode::percussive(0.001, 0.05, 0.03));

    let graph = body
        .layer(tine, 0.12)
        .through(FilterNode::lowpass(2_500.0).with_resonance(0.1));

    Patch::new(graph, attack + decay, release)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphNode, RenderCtx};

    fn energy(tone: PianoTone, skip: usize) -> f32 {
        let ctx = RenderCtx::from_freq(48_000.0, 261.63, 0.8);
        let mut graph = piano(tone).into_graph();
        graph.note_on(&ctx);
        let mut buffer = vec![0.0f32; 9_600];
        for chunk in buffer.chunks_mut(64) {
            graph.render_block(chunk, &ctx);
        }
        buffer[skip..].iter().map(|s| s * s).sum::<f32>()
    }

    #[test]
    fn notes_decay_towards_sustain() {
        let early = energy(PianoTone::Grand, 0) / 9_600.0;
        let late = energy(PianoTone::Grand, 7_200) / 2_400.0;
        assert!(late < early, "energy should fall: {early} -> {late}");
    }

    #[test]
    fn tones_parse_by_name() {
        assert_eq!("electric".parse::<PianoTone>().unwrap(), PianoTone::Electric);
        assert!("harpsichord".parse::<PianoTone>().is_err());
    }
}
