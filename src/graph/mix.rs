use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Parallel Signal Mixing
======================

Crossfades two sources linearly:

    output = A × (1 - balance) + B × balance

  balance = 0.0 → all A
  balance = 0.5 → half of each
  balance = 1.0 → all B

Use it for two-part voices where the parts trade off against each other,
like a snare's shell against its wires. For more than two parts at
independent levels, use `Layer`.
*/

pub struct Mix<A, B> {
    source_a: A,
    source_b: B,
    balance: f32,
    temp_buffer: Vec<f32>,
}

impl<A, B> Mix<A, B> {
    pub fn new(source_a: A, source_b: B, balance: f32) -> Self {
        Mix {
            source_a,
            source_b,
            balance: balance.clamp(0.0, 1.0),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<S: GraphNode, M: GraphNode> GraphNode for Mix<S, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source_a.render_block(out, ctx);

        let frames = &mut self.temp_buffer[..out.len()];
        self.source_b.render_block(frames, ctx);

        let weight_a = 1.0 - self.balance;
        let weight_b = self.balance;
        for (o, b) in out.iter_mut().zip(frames.iter()) {
            *o = (*o * weight_a) + (*b * weight_b);
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source_a.note_on(ctx);
        self.source_b.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source_a.note_off(ctx);
        self.source_b.note_off(ctx);
    }

    fn is_active(&self) -> bool {
        self.source_a.is_active() || self.source_b.is_active()
    }

    fn get_envelope_level(&self) -> Option<f32> {
        match (
            self.source_a.get_envelope_level(),
            self.source_b.get_envelope_level(),
        ) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    fn ctx() -> RenderCtx {
        RenderCtx::from_freq(48_000.0, 440.0, 1.0)
    }

    #[test]
    fn balance_extremes_select_one_source() {
        let mut only_a = OscNode::sine().mix(OscNode::square(), 0.0);
        let mut only_b = OscNode::sine().mix(OscNode::square(), 1.0);
        let mut a = vec![0.0f32; 256];
        let mut b = vec![0.0f32; 256];
        only_a.render_block(&mut a, &ctx());
        only_b.render_block(&mut b, &ctx());

        // Square is always ±1; sine passes through zero
        assert!(b.iter().all(|s| s.abs() == 1.0));
        assert_eq!(a[0], 0.0);
    }

    #[test]
    fn active_while_either_side_rings() {
        let mut mixed = OscNode::sine()
            .amplify(EnvNode::percussive(0.001, 0.01, 0.01))
            .mix(OscNode::noise().amplify(EnvNode::adsr(0.001, 0.01, 0.5, 0.5)), 0.5);
        mixed.note_on(&ctx());
        let mut buffer = vec![0.0f32; 2_048];
        mixed.render_block(&mut buffer, &ctx());
        mixed.note_off(&ctx());
        mixed.render_block(&mut buffer, &ctx());

        // The short side is done, the long release is not
        assert!(mixed.is_active());
    }
}
