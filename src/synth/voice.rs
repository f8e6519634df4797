use crate::{
    engine::Channel,
    graph::node::{GraphNode, RenderCtx},
    voices::Patch,
};

/*
Voice Lifetime
==============

A voice is one note or hit: a graph plus the exact frames at which it starts,
is released, and is guaranteed gone.

  start_frame      note_on fires on this frame (sample-accurate)
  release_frame    start + max(attack + decay, hold); note_off fires here
  release_end      release_frame + release tail; the envelope is idle
  stop_frame       release_end + grace; reaped no matter what

         start          release        release_end   stop
  ─────────┼───────────────┼────────────────┼──────────┼────→ frames
  Pending  │   Sounding    │   Releasing    │  (grace) │ Finished

A voice is reaped once it is past `release_end` and its graph reports itself
inactive, or unconditionally at `stop_frame`. It is never reaped earlier, so
a voice can never be cut off before its tail has finished.

The renderer calls `render` once per quantum. Events inside a quantum are
honoured exactly: a voice starting 17 frames into the quantum renders 17
frames of nothing first, and a release that falls mid-quantum splits the
render at that frame.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    /// Waiting for its start frame.
    Pending,
    /// Started, gate high.
    Sounding,
    /// Gate low, release tail playing.
    Releasing,
    /// Done; ready to be handed back for deallocation.
    Finished,
}

/// When and how hard a voice plays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    /// Hz; ignored by fixed-pitch drum graphs.
    pub frequency: f32,
    /// 0.0 - 1.0
    pub velocity: f32,
    pub start_frame: u64,
    /// How long the gate stays high, in seconds. Zero for hits.
    pub hold: f32,
}

impl Strike {
    pub fn hit(velocity: f32, start_frame: u64) -> Self {
        Self {
            frequency: 0.0,
            velocity,
            start_frame,
            hold: 0.0,
        }
    }

    pub fn note(frequency: f32, velocity: f32, start_frame: u64, hold: f32) -> Self {
        Self {
            frequency,
            velocity,
            start_frame,
            hold,
        }
    }
}

/// A transient synthesis instance owned by the engine until it finishes.
pub struct Voice {
    channel: Channel,
    graph: Box<dyn GraphNode>,
    ctx: RenderCtx,
    state: VoiceState,
    start_frame: u64,
    release_frame: u64,
    release_frames: u64,
    grace_frames: u64,
    stop_frame: u64,
}

fn to_frames(seconds: f32, sample_rate: f32) -> u64 {
    (seconds.max(0.0) * sample_rate).round() as u64
}

impl Voice {
    pub fn new(channel: Channel, patch: Patch, strike: Strike, sample_rate: f32, grace: f32) -> Self {
        let gate = patch.attack_decay().max(strike.hold);
        let release_frames = to_frames(patch.release(), sample_rate);
        let grace_frames = to_frames(grace, sample_rate);
        let release_frame = strike.start_frame + to_frames(gate, sample_rate).max(1);

        Self {
            channel,
            graph: patch.into_graph(),
            ctx: RenderCtx::from_freq(
                sample_rate,
                strike.frequency,
                strike.velocity.clamp(0.0, 1.0),
            ),
            state: VoiceState::Pending,
            start_frame: strike.start_frame,
            release_frame,
            release_frames,
            grace_frames,
            stop_frame: release_frame + release_frames + grace_frames,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn frequency(&self) -> f32 {
        self.ctx.frequency
    }

    pub fn velocity(&self) -> f32 {
        self.ctx.velocity
    }

    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    pub fn release_frame(&self) -> u64 {
        self.release_frame
    }

    /// First frame at which the release tail is over.
    pub fn release_end(&self) -> u64 {
        self.release_frame + self.release_frames
    }

    pub fn stop_frame(&self) -> u64 {
        self.stop_frame
    }

    pub fn is_pending(&self) -> bool {
        self.state == VoiceState::Pending
    }

    pub fn is_finished(&self) -> bool {
        self.state == VoiceState::Finished
    }

    pub fn is_releasing(&self) -> bool {
        self.state == VoiceState::Releasing
    }

    pub fn get_envelope_level(&self) -> Option<f32> {
        self.graph.get_envelope_level()
    }

    /// Release at `frame` instead of the scheduled release frame.
    ///
    /// A voice that has not started yet never will; it finishes immediately.
    pub fn release_at(&mut self, frame: u64) {
        match self.state {
            VoiceState::Pending => self.state = VoiceState::Finished,
            VoiceState::Sounding => {
                self.graph.note_off(&self.ctx);
                self.state = VoiceState::Releasing;
                self.release_frame = frame;
                self.stop_frame = frame + self.release_frames + self.grace_frames;
            }
            VoiceState::Releasing | VoiceState::Finished => {}
        }
    }

    /// Add this voice's output for `[block_start, block_start + out.len())`
    /// into `out`. `scratch` must be at least as long as `out`.
    pub fn render(&mut self, block_start: u64, out: &mut [f32], scratch: &mut [f32]) {
        let block_end = block_start + out.len() as u64;
        if self.is_finished() || self.start_frame >= block_end {
            return;
        }

        let mut cursor = self.start_frame.saturating_sub(block_start) as usize;
        let limit = self.stop_frame.min(block_end).saturating_sub(block_start) as usize;

        if self.state == VoiceState::Pending {
            self.graph.note_on(&self.ctx);
            self.state = VoiceState::Sounding;
        }

        while cursor < limit {
            let frame = block_start + cursor as u64;
            if self.state == VoiceState::Sounding && frame >= self.release_frame {
                self.graph.note_off(&self.ctx);
                self.state = VoiceState::Releasing;
            }

            let end = if self.state == VoiceState::Sounding && self.release_frame < block_end {
                (self.release_frame - block_start) as usize
            } else {
                limit
            };

            let segment = &mut scratch[cursor..end];
            self.graph.render_block(segment, &self.ctx);
            self.ctx.advance(segment.len());
            for (o, s) in out[cursor..end].iter_mut().zip(segment.iter()) {
                *o += *s;
            }
            cursor = end;
        }

        let tail_over = self.state == VoiceState::Releasing
            && block_end >= self.release_end()
            && !self.graph.is_active();
        if tail_over || block_end >= self.stop_frame {
            self.state = VoiceState::Finished;
        }
    }
}

impl std::fmt::Debug for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Voice")
            .field("channel", &self.channel)
            .field("state", &self.state)
            .field("frequency", &self.ctx.frequency)
            .field("start_frame", &self.start_frame)
            .field("release_frame", &self.release_frame)
            .field("stop_frame", &self.stop_frame)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    const SAMPLE_RATE: f32 = 1_000.0;

    fn tone(release: f32) -> Patch {
        let graph = OscNode::square().amplify(EnvNode::adsr(0.001, 0.01, 1.0, release));
        Patch::new(graph, 0.011, release)
    }

    fn run(voice: &mut Voice, frames: u64) -> Vec<f32> {
        let mut out = vec![0.0f32; frames as usize];
        let mut scratch = vec![0.0f32; 64];
        for (i, chunk) in out.chunks_mut(64).enumerate() {
            voice.render(i as u64 * 64, chunk, &mut scratch[..chunk.len()]);
        }
        out
    }

    #[test]
    fn starts_on_its_exact_frame() {
        let strike = Strike::note(100.0, 1.0, 70, 0.5);
        let mut voice = Voice::new(Channel::Bass, tone(0.05), strike, SAMPLE_RATE, 0.05);
        let out = run(&mut voice, 128);

        assert!(out[..70].iter().all(|&s| s == 0.0));
        assert!(out[71] != 0.0);
    }

    #[test]
    fn lifetime_covers_hold_and_release() {
        let strike = Strike::note(100.0, 1.0, 0, 0.2);
        let voice = Voice::new(Channel::Piano, tone(0.1), strike, SAMPLE_RATE, 0.05);

        assert_eq!(voice.release_frame(), 200);
        assert_eq!(voice.release_end(), 300);
        assert_eq!(voice.stop_frame(), 350);
    }

    #[test]
    fn hits_release_after_attack_and_decay() {
        let voice = Voice::new(Channel::Drums, tone(0.05), Strike::hit(1.0, 10), SAMPLE_RATE, 0.05);
        assert_eq!(voice.release_frame(), 10 + 11);
    }

    #[test]
    fn not_reaped_before_release_end() {
        let strike = Strike::note(100.0, 1.0, 0, 0.1);
        let mut voice = Voice::new(Channel::Bass, tone(0.1), strike, SAMPLE_RATE, 0.05);

        run(&mut voice, 192);
        assert_eq!(voice.state(), VoiceState::Releasing);

        let mut scratch = vec![0.0f32; 64];
        let mut out = vec![0.0f32; 64];
        voice.render(192, &mut out, &mut scratch);
        assert!(voice.is_finished(), "tail over at 200, block ends at 256");
    }

    #[test]
    fn release_at_cancels_pending_and_releases_sounding() {
        let mut pending = Voice::new(Channel::Drums, tone(0.05), Strike::hit(1.0, 500), SAMPLE_RATE, 0.05);
        pending.release_at(10);
        assert!(pending.is_finished());

        let strike = Strike::note(100.0, 1.0, 0, 10.0);
        let mut sounding = Voice::new(Channel::Bass, tone(0.05), strike, SAMPLE_RATE, 0.05);
        run(&mut sounding, 64);
        sounding.release_at(64);
        assert!(sounding.is_releasing());
        assert_eq!(sounding.stop_frame(), 64 + 50 + 50);
    }
}
