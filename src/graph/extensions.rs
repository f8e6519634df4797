use crate::graph::{
    amplify::Amplify,
    layer::Layer,
    mix::Mix,
    modulate::Modulate,
    node::{GraphNode, Modulatable},
    through::Through,
};

/// Fluent combinators for building voice graphs.
pub trait NodeExt: GraphNode + Sized {
    /// Multiply by a modulator (usually an envelope).
    fn amplify<M>(self, modulator: M) -> Amplify<Self, M> {
        Amplify::new(self, modulator)
    }

    /// Feed this node's output through an effect.
    fn through<F: GraphNode>(self, effect: F) -> Through<Self, F> {
        Through::new(self, effect)
    }

    /// Drive one of this node's parameters from a control signal.
    fn modulate<M: GraphNode>(self, control: M, param: Self::Param, depth: f32) -> Modulate<Self, M>
    where
        Self: Modulatable,
    {
        Modulate::new(self, control, param, depth)
    }

    /// Crossfade with another source.
    fn mix<M: GraphNode>(self, source: M, balance: f32) -> Mix<Self, M> {
        Mix::new(self, source, balance)
    }

    /// Start a layered sum: this node at unity, `other` at `gain`.
    fn layer<M: GraphNode + 'static>(self, other: M, gain: f32) -> Layer
    where
        Self: 'static,
    {
        Layer::new().with(self, 1.0).with(other, gain)
    }
}

impl<T: GraphNode> NodeExt for T {}
