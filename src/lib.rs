//! Procedural backing band: synthesized drums, bass and piano sequenced
//! against a shared tempo clock, plus a live pitch analyzer for the player.
//!
//! Layers, leaves first:
//!
//! - `dsp`: allocation-free oscillator, envelope and filter primitives
//! - `graph`: composable nodes and the fluent `NodeExt` combinators
//! - `theory`: notes, chords and progressions
//! - `voices`: per-instrument graph builders
//! - `synth`: transient voices and the drum, bass and piano engines
//! - `engine`: real-time renderer, voice arena, gain stages, scheduler
//! - `sequencing`: patterns, styles and the style library
//! - `band`: the coordinator that ties a style to the engine
//! - `analysis`: pitch detection on live input
//! - `io`: cpal devices

pub mod analysis;
pub mod band;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod io;
pub mod sequencing; // Patterns, styles and the style library
pub mod synth; // Voices and instrument engines
pub mod theory;
pub mod voices;

pub use error::{BandError, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Frames per render quantum; block-rate modulation updates at this rate.
pub const RENDER_QUANTUM: usize = 64;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
