// Voices, the instrument engines that build them, and the messages that
// carry them to the renderer.

pub mod factory;
pub mod instruments;
pub mod message;
pub mod voice;

pub use factory::{VoiceFactory, VoiceTiming};
pub use instruments::{BassEngine, DrumEngine, PianoEngine};
pub use message::EngineCommand;
pub use voice::{Strike, Voice, VoiceState};
