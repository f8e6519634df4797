//! Live input analysis: what note is the player playing, and how loud.

pub mod analyzer;
pub mod pitch;

pub use analyzer::{AnalyzerEvent, PitchAnalyzer, SampleSource};
pub use pitch::{PitchConfig, PitchDetector, PitchEstimate};
