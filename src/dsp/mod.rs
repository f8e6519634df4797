//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice graphs. They stay focused on the per-sample
//! math; orchestration (note events, modulation, layering) lives in `graph`.

/// Attack/decay/sustain/release envelope with exponential decay and release.
pub mod envelope;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Oscillator waveforms and noise sources.
pub mod oscillator;

pub use envelope::EnvelopeState;
