//! Composable building blocks for constructing voice graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what instrument design
//! needs: note events, modulation, layering and block-based rendering. The
//! `extensions` module adds fluent helpers so voices can be authored with a
//! chainable API.

/// Multiply two signals together (envelope × oscillator).
pub mod amplify;
/// Envelope generator node exposing ADSR state.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.layer()`, etc.).
pub mod extensions;
/// Topology-preserving filter node with multiple responses.
pub mod filter;
/// Weighted sum of any number of nodes (harmonic stacks).
pub mod layer;
/// Linear crossfade between two sources.
pub mod mix;
/// Connect control signals to node parameters.
pub mod modulate;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band oscillators and noise sources.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use node::{GraphNode, RenderCtx};
