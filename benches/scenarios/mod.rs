//! Scenario benchmarks: what the audio callback and the tuner thread
//! actually run.

mod band;
mod pitch;
mod voices;

pub use band::bench_band;
pub use pitch::bench_pitch;
pub use voices::bench_voices;
