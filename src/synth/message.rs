use rtrb::Consumer;

use crate::{engine::Channel, synth::voice::Voice};

/// Control-thread to renderer messages.
#[derive(Debug)]
pub enum EngineCommand {
    /// Hand a new voice to the renderer. It starts on its own start frame.
    Trigger(Voice),
    SetGain { channel: Channel, gain: f32 },
    SetMute { channel: Channel, muted: bool },
    SetMaster(f32),
    /// Drop every voice that has not started and release every sounding one.
    Silence,
}

/// Anything the renderer can pull commands from.
pub trait CommandReceiver: Send {
    fn pop(&mut self) -> Option<EngineCommand>;
}

impl CommandReceiver for Consumer<EngineCommand> {
    fn pop(&mut self) -> Option<EngineCommand> {
        Consumer::pop(self).ok()
    }
}
