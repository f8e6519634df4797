use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Sample-by-sample product of a signal and a modulator.
///
/// With an `EnvNode` as the modulator this is the VCA of every voice: the
/// envelope curve becomes the loudness contour of the oscillator.
pub struct Amplify<N, M> {
    signal: N,
    modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        // Slice temp buffer to match output size (RT-safe, no allocation)
        let frames = &mut self.temp_buffer[..out.len()];
        self.modulator.render_block(frames, ctx);

        for (o, m) in out.iter_mut().zip(frames.iter()) {
            *o *= *m;
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.signal.note_on(ctx);
        self.modulator.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.signal.note_off(ctx);
        self.modulator.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.modulator
            .get_envelope_level()
            .or_else(|| self.signal.get_envelope_level())
    }

    /// The modulator decides: a silent envelope silences any source.
    fn is_active(&self) -> bool {
        self.modulator.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    #[test]
    fn envelope_shapes_oscillator() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 0.5);
        let mut voice = OscNode::square().amplify(EnvNode::adsr(0.001, 0.01, 1.0, 0.01));
        voice.note_on(&ctx);

        let mut buffer = vec![0.0f32; 1_024];
        voice.render_block(&mut buffer, &ctx);

        // Square is ±1, envelope settles at velocity 0.5
        assert!((buffer[1_000].abs() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn inactive_once_envelope_finishes() {
        let ctx = RenderCtx::from_freq(1_000.0, 110.0, 1.0);
        let mut voice = OscNode::sine().amplify(EnvNode::percussive(0.001, 0.01, 0.01));
        voice.note_on(&ctx);
        voice.note_off(&ctx);

        let mut buffer = vec![0.0f32; 32];
        voice.render_block(&mut buffer, &ctx);
        assert!(!voice.is_active());
    }
}
