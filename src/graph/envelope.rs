use crate::{
    dsp::envelope::Envelope,
    graph::node::{GraphNode, RenderCtx},
};

/// Envelope generator as a graph node.
///
/// Renders the envelope curve itself (0.0 to peak). Use it as the modulator
/// of `.amplify()` to shape loudness, or as the source of `.modulate()` to
/// sweep a parameter.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            env: Envelope::adsr(attack, decay, sustain, release),
        }
    }

    /// Hit-style envelope: no sustain, the tail is all decay.
    pub fn percussive(attack: f32, decay: f32, release: f32) -> Self {
        Self {
            env: Envelope::percussive(attack, decay, release),
        }
    }

    /// Instant 1.0 falling to 0.0 over `decay`, independent of velocity.
    ///
    /// Drives pitch drops and filter sweeps.
    pub fn sweep(decay: f32) -> Self {
        Self {
            env: Envelope::percussive(0.0, decay, 0.0).with_velocity_tracking(false),
        }
    }

    pub fn envelope(&self) -> &Envelope {
        &self.env
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.env.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.env.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        Some(self.env.level())
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_until_note_on() {
        let mut env = EnvNode::adsr(0.001, 0.01, 0.5, 0.01);
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);
        let mut buffer = vec![1.0f32; 64];

        assert!(!env.is_active());
        env.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().all(|&s| s == 0.0));

        env.note_on(&ctx);
        env.render_block(&mut buffer, &ctx);
        assert!(env.is_active());
        assert!(buffer.iter().any(|&s| s > 0.0));
    }

    #[test]
    fn sweep_ignores_velocity() {
        let mut env = EnvNode::sweep(0.05);
        let ctx = RenderCtx::from_freq(1_000.0, 440.0, 0.1);
        let mut buffer = [0.0f32; 1];
        env.note_on(&ctx);
        env.render_block(&mut buffer, &ctx);
        assert_eq!(buffer[0], 1.0);
    }
}
