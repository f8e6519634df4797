//! Pitch, note and chord vocabulary shared by the engines and the analyzer.

pub mod chord;
pub mod note;

pub use chord::{Chord, ChordProgression, ChordQuality};
pub use note::{note_frequency, Note, PitchClass, C0_FREQUENCY};
