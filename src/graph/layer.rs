use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Layered Sum
===========

Sums any number of nodes, each at its own gain:

    output = Σ node_i × gain_i

This is how harmonic stacks and transient layers are assembled:

  // Piano string: fundamental plus three decaying partials, plus hammer noise
  OscNode::triangle()
      .layer(OscNode::sine().with_ratio(2.003), 0.45)
      .layer(OscNode::sine().with_ratio(3.009), 0.2)
      .layer(hammer, 0.15)

The first node is added at unity gain. Layers are boxed so a voice builder
can add a variable number of partials without the type changing per variant.
*/

pub struct Layer {
    layers: Vec<(Box<dyn GraphNode>, f32)>,
    temp_buffer: Vec<f32>,
}

impl Layer {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Add a node at the given gain.
    pub fn with<N: GraphNode + 'static>(mut self, node: N, gain: f32) -> Self {
        self.layers.push((Box::new(node), gain));
        self
    }

    /// Same as `with`; lets `a.layer(b, g).layer(c, h)` stay one flat sum.
    pub fn layer<N: GraphNode + 'static>(self, node: N, gain: f32) -> Self {
        self.with(node, gain)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphNode for Layer {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        let frames = &mut self.temp_buffer[..out.len()];

        for (node, gain) in self.layers.iter_mut() {
            node.render_block(frames, ctx);
            for (o, s) in out.iter_mut().zip(frames.iter()) {
                *o += *s * *gain;
            }
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        for (node, _) in self.layers.iter_mut() {
            node.note_on(ctx);
        }
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        for (node, _) in self.layers.iter_mut() {
            node.note_off(ctx);
        }
    }

    fn is_active(&self) -> bool {
        self.layers.iter().any(|(node, _)| node.is_active())
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.layers
            .iter()
            .filter_map(|(node, _)| node.get_envelope_level())
            .reduce(f32::max)
    }
}
