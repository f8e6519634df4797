use crate::{
    dsp::filter::{FilterType, SVFilter},
    graph::node::{GraphNode, Modulatable, RenderCtx},
};

/*
Filter Node
===========

Wraps the state-variable filter for use in voice graphs. Every voice in this
crate ends in one, and which response and cutoff it uses is most of what
separates one variant of an instrument from another:

  Lowpass    kick/tom bodies, bass tones, piano brightness
  Bandpass   snare wires, clap bursts, cross-stick knock
  Highpass   hats and cymbals (strip everything below the sizzle)

Resonance (0.0 - 0.98) adds a peak at the cutoff. A little resonance on a
bass lowpass gives the "wow" of a synth bass; on a bandpass it makes a snare
ring.

Cutoff can be swept with `.modulate()`, e.g. a slap bass opening bright and
closing down:

  FilterNode::lowpass(600.0)
      .with_resonance(0.3)
      .modulate(EnvNode::sweep(0.08), FilterParam::Cutoff, 2400.0)
*/

#[derive(Clone, Copy, Debug)]
pub enum FilterParam {
    Cutoff,
    Resonance,
}

pub struct FilterNode {
    filter: SVFilter,
    base_cutoff: f32,
    base_resonance: f32,
}

impl FilterNode {
    fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::new(filter_type, cutoff_hz),
            base_cutoff: cutoff_hz,
            base_resonance: 0.0,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz)
    }

    pub fn notch(cutoff_hz: f32) -> Self {
        Self::new(FilterType::Notch, cutoff_hz)
    }

    pub fn with_resonance(mut self, resonance: f32) -> Self {
        self.filter.set_resonance(resonance);
        self.base_resonance = self.filter.resonance();
        self
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff()
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            FilterParam::Cutoff => self.base_cutoff,
            FilterParam::Resonance => self.base_resonance,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        let value = base + modulation;
        match param {
            FilterParam::Cutoff => self.filter.set_cutoff(value.clamp(20.0, 20_000.0)),
            FilterParam::Resonance => self.filter.set_resonance(value),
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.filter.reset();
    }
}
