use std::sync::Arc;

use rtrb::Producer;

use crate::{
    engine::{
        allocator::VoiceArena,
        channel::{Channel, GainStage},
        meters::{AudioClock, LevelMeters, RmsAccumulator},
    },
    synth::{
        message::{CommandReceiver, EngineCommand},
        voice::Voice,
    },
    MAX_BLOCK_SIZE, RENDER_QUANTUM,
};

/*
Renderer
========

The audio-thread half of the engine. Each call to `render`:

  1. drains the command queue (new voices, gain and mute changes, silence)
  2. renders every live voice, in 64-frame quanta, into its channel bus
  3. applies each channel's gain stage and sums the buses
  4. applies the master gain stage and a tanh soft clip
  5. hands finished voices back through the retire queue
  6. publishes the frame clock and per-channel RMS

Nothing here locks, allocates or frees. Voices arrive fully built and leave
through a queue; the control thread drops them. A voice stolen while the
retire queue is full is parked in a preallocated list until the queue has
room, and command draining pauses while that list is full.
*/

pub struct Renderer<R: CommandReceiver = rtrb::Consumer<EngineCommand>> {
    commands: R,
    retired: Producer<Voice>,
    parked: Vec<Voice>,
    park_limit: usize,
    arena: VoiceArena,
    channels: [GainStage; Channel::COUNT],
    master: GainStage,
    buses: [Vec<f32>; Channel::COUNT],
    scratch: Vec<f32>,
    mono: Vec<f32>,
    frame: u64,
    clock: AudioClock,
    meters: Arc<LevelMeters>,
    channel_rms: [RmsAccumulator; Channel::COUNT],
    master_rms: RmsAccumulator,
}

impl<R: CommandReceiver> Renderer<R> {
    pub(crate) fn new(
        commands: R,
        retired: Producer<Voice>,
        max_voices: usize,
        park_limit: usize,
        ramp_samples: u32,
        clock: AudioClock,
        meters: Arc<LevelMeters>,
    ) -> Self {
        Self {
            commands,
            retired,
            parked: Vec::with_capacity(park_limit.max(1)),
            park_limit: park_limit.max(1),
            arena: VoiceArena::new(max_voices),
            channels: std::array::from_fn(|_| GainStage::new(1.0, ramp_samples)),
            master: GainStage::new(1.0, ramp_samples),
            buses: std::array::from_fn(|_| vec![0.0; RENDER_QUANTUM]),
            scratch: vec![0.0; RENDER_QUANTUM],
            mono: vec![0.0; MAX_BLOCK_SIZE],
            frame: 0,
            clock,
            meters,
            channel_rms: Default::default(),
            master_rms: RmsAccumulator::default(),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate()
    }

    /// Frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Voices currently held, including ones waiting for their start frame.
    pub fn active_voices(&self) -> usize {
        self.arena.len()
    }

    /// Render mono output.
    pub fn render(&mut self, out: &mut [f32]) {
        self.flush_parked();
        self.drain_commands();

        for chunk in out.chunks_mut(RENDER_QUANTUM) {
            self.render_quantum(chunk);
        }

        self.retire_finished();
        self.publish();
    }

    /// Render into an interleaved buffer, copying the mono mix to every channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let mut mono = std::mem::take(&mut self.mono);
        for frames in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let len = frames.len() / channels;
            self.render(&mut mono[..len]);
            for (frame, sample) in frames.chunks_mut(channels).zip(&mono[..len]) {
                frame.fill(*sample);
            }
        }
        self.mono = mono;
    }

    /// Voices waiting for room in the retire queue.
    pub fn parked_voices(&self) -> usize {
        self.parked.len()
    }

    fn drain_commands(&mut self) {
        // Any trigger may steal a voice, so only drain while one can be parked
        while self.parked.len() < self.park_limit {
            let Some(command) = self.commands.pop() else {
                break;
            };
            match command {
                EngineCommand::Trigger(voice) => {
                    if let Some(stolen) = self.arena.insert(voice) {
                        if let Err(rtrb::PushError::Full(stolen)) = self.retired.push(stolen) {
                            self.parked.push(stolen);
                        }
                    }
                }
                EngineCommand::SetGain { channel, gain } => {
                    self.channels[channel.index()].set_gain(gain);
                }
                EngineCommand::SetMute { channel, muted } => {
                    self.channels[channel.index()].set_muted(muted);
                }
                EngineCommand::SetMaster(gain) => self.master.set_gain(gain),
                EngineCommand::Silence => {
                    let now = self.frame;
                    for voice in self.arena.iter_mut() {
                        voice.release_at(now);
                    }
                }
            }
        }
    }

    fn render_quantum(&mut self, out: &mut [f32]) {
        let len = out.len();
        for bus in self.buses.iter_mut() {
            bus[..len].fill(0.0);
        }

        let block_start = self.frame;
        let scratch = &mut self.scratch[..len];
        for voice in self.arena.iter_mut() {
            let bus = &mut self.buses[voice.channel().index()][..len];
            voice.render(block_start, bus, scratch);
        }

        out.fill(0.0);
        for channel in Channel::ALL {
            let idx = channel.index();
            let bus = &mut self.buses[idx][..len];
            self.channels[idx].process(bus);
            self.channel_rms[idx].add(bus);
            for (o, s) in out.iter_mut().zip(bus.iter()) {
                *o += *s;
            }
        }

        self.master.process(out);
        for sample in out.iter_mut() {
            *sample = sample.tanh();
        }
        self.master_rms.add(out);

        self.frame += len as u64;
    }

    fn retire_finished(&mut self) {
        while let Some(voice) = self.arena.take_finished() {
            if let Err(rtrb::PushError::Full(voice)) = self.retired.push(voice) {
                // The slot it just left is free, so it always fits back
                if let Some(voice) = self.arena.restore(voice) {
                    debug_assert!(false, "arena refused a voice it just released");
                    self.parked.push(voice);
                }
                break;
            }
        }
    }

    fn flush_parked(&mut self) {
        while let Some(voice) = self.parked.pop() {
            if let Err(rtrb::PushError::Full(voice)) = self.retired.push(voice) {
                self.parked.push(voice);
                break;
            }
        }
    }

    fn publish(&mut self) {
        self.clock.publish(self.frame);
        for channel in Channel::ALL {
            let rms = self.channel_rms[channel.index()].take();
            self.meters.store_channel(channel, rms);
        }
        self.meters.store_master(self.master_rms.take());
    }
}
