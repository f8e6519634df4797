pub mod grooves;
pub mod library;
pub mod pattern;
pub mod time_signature;

pub use library::{Style, StyleKey, StyleLibrary};
pub use pattern::{Articulation, Instrument, Pattern, PatternBuilder, VoiceEvent};
pub use time_signature::TimeSignature;
