//! Instrument graphs for the band.
//!
//! Each builder returns a [`Patch`]: a ready-to-render node graph plus the
//! envelope timings the voice scheduler needs to know when the note may be
//! released and when it is guaranteed to be silent.
//!
//! # Example
//!
//! ```ignore
//! use saavy_band::voices::{self, DrumKit};
//! use saavy_band::sequencing::Articulation;
//!
//! let kick = voices::kick(DrumKit::Electronic);
//! let rim = voices::snare(DrumKit::Jazz, Articulation::Rim);
//! let bass = voices::bass(voices::BassTone::Slap);
//! let piano = voices::piano(voices::PianoTone::Electric);
//! ```

mod bass;
mod clap;
mod crash;
mod hihat;
mod kick;
mod kit;
mod openhat;
mod piano;
mod ride;
mod snare;
mod tom;

pub use bass::{bass, BassTone};
pub use clap::clap;
pub use crash::crash;
pub use hihat::hihat;
pub use kick::kick;
pub use kit::DrumKit;
pub use openhat::openhat;
pub use piano::{piano, PianoTone};
pub use ride::ride;
pub use snare::snare;
pub use tom::tom;

use crate::graph::GraphNode;

/// A voice graph and the timings of its loudest envelope.
///
/// `attack_decay` is how long the note takes to settle (onto its sustain, or
/// into silence for hits). `release` is the tail after note-off. Every
/// envelope inside the graph must fit inside these two numbers.
pub struct Patch {
    graph: Box<dyn GraphNode>,
    attack_decay: f32,
    release: f32,
}

impl Patch {
    pub fn new<N: GraphNode + 'static>(graph: N, attack_decay: f32, release: f32) -> Self {
        Self {
            graph: Box::new(graph),
            attack_decay: attack_decay.max(0.0),
            release: release.max(0.0),
        }
    }

    pub fn attack_decay(&self) -> f32 {
        self.attack_decay
    }

    pub fn release(&self) -> f32 {
        self.release
    }

    pub fn graph_mut(&mut self) -> &mut dyn GraphNode {
        self.graph.as_mut()
    }

    pub fn into_graph(self) -> Box<dyn GraphNode> {
        self.graph
    }
}

impl std::fmt::Debug for Patch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Patch")
            .field("attack_decay", &self.attack_decay)
            .field("release", &self.release)
            .finish_non_exhaustive()
    }
}

/// Longest release tail any patch in this module declares (seconds).
pub const MAX_RELEASE: f32 = 0.3;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::RenderCtx, sequencing::Articulation};

    fn peak_after_note_on(mut patch: Patch, frequency: f32) -> f32 {
        let ctx = RenderCtx::from_freq(48_000.0, frequency, 0.9);
        let graph = patch.graph_mut();
        graph.note_on(&ctx);
        let mut buffer = vec![0.0f32; 64];
        let mut peak = 0.0f32;
        for _ in 0..150 {
            graph.render_block(&mut buffer, &ctx);
            peak = buffer.iter().fold(peak, |acc, s| acc.max(s.abs()));
        }
        peak
    }

    fn all_patches() -> Vec<(String, Patch)> {
        let mut patches = Vec::new();
        for kit in DrumKit::ALL {
            patches.push((format!("{kit:?} kick"), kick(kit)));
            for articulation in [Articulation::Normal, Articulation::Ghost, Articulation::Rim] {
                patches.push((format!("{kit:?} snare {articulation:?}"), snare(kit, articulation)));
            }
            patches.push((format!("{kit:?} hat"), hihat(kit)));
            patches.push((format!("{kit:?} open hat"), openhat(kit)));
            patches.push((format!("{kit:?} clap"), clap(kit)));
            for articulation in [Articulation::Low, Articulation::Normal, Articulation::High] {
                patches.push((format!("{kit:?} tom {articulation:?}"), tom(kit, articulation)));
            }
            patches.push((format!("{kit:?} crash"), crash(kit)));
            patches.push((format!("{kit:?} ride"), ride(kit)));
        }
        for tone in BassTone::ALL {
            patches.push((format!("{tone:?} bass"), bass(tone)));
        }
        for tone in PianoTone::ALL {
            patches.push((format!("{tone:?} piano"), piano(tone)));
        }
        patches
    }

    #[test]
    fn every_patch_sounds_and_stays_bounded() {
        for (name, patch) in all_patches() {
            let peak = peak_after_note_on(patch, 110.0);
            assert!(peak > 0.01, "{name} is silent");
            assert!(peak < 4.0, "{name} peaks at {peak}");
        }
    }

    #[test]
    fn release_tails_fit_the_documented_maximum() {
        for (name, patch) in all_patches() {
            assert!(patch.release() >= 0.02, "{name} release too short");
            assert!(patch.release() <= MAX_RELEASE, "{name} release too long");
        }
    }

    #[test]
    fn graphs_fall_silent_after_release() {
        let ctx = RenderCtx::from_freq(48_000.0, 220.0, 1.0);
        for (name, patch) in all_patches() {
            let settle = patch.attack_decay();
            let release = patch.release();
            let mut graph = patch.into_graph();
            graph.note_on(&ctx);

            let mut buffer = vec![0.0f32; 64];
            let settle_blocks = (settle * 48_000.0 / 64.0).ceil() as usize;
            for _ in 0..settle_blocks {
                graph.render_block(&mut buffer, &ctx);
            }
            graph.note_off(&ctx);
            let release_blocks = (release * 48_000.0 / 64.0).ceil() as usize + 1;
            for _ in 0..release_blocks {
                graph.render_block(&mut buffer, &ctx);
            }
            assert!(!graph.is_active(), "{name} still active after its release");
        }
    }
}
