use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Audio Oscillator
================

The raw sound source of every voice. Which frequency an OscNode plays is
decided in one of two ways:

  Tracking (default)   frequency = note frequency × ratio
  Fixed                frequency = with_frequency(hz), ignores the note

Tracking with a ratio is how harmonic stacks are built. A bass note at 55 Hz
with partials at ratios 1, 2 and 3 gives 55, 110 and 165 Hz, and the same
graph transposes to any note because nothing in it is an absolute pitch:

  OscNode::sine()                         // fundamental
      .layer(OscNode::sine().with_ratio(2.0), 0.5)
      .layer(OscNode::sine().with_ratio(3.0), 0.25)

Slightly stretched ratios (2.003, 3.009, ...) mimic the inharmonicity of stiff
piano strings.

Fixed frequencies are for drums: a kick is tuned by its voice, not by a note.
Fixed oscillators can be swept with `.modulate()`:

  // Kick body: 150 Hz dropping to 50 Hz
  OscNode::sine()
      .with_frequency(50.0)
      .modulate(EnvNode::sweep(0.06), OscParam::Frequency, 100.0)

Waveform character:
  Sine      fundamental only - sub, kick body, electric piano tine
  Triangle  weak odd harmonics - soft bodies, snare shell
  Sawtooth  all harmonics - bright basses, synth bass
  Square    odd harmonics - hollow tones, metallic hat clusters
  Noise     no pitch - wires, clicks, breath, cymbal wash
*/

pub struct OscNode {
    osc: OscillatorBlock,
    /// Fixed frequency (Hz). If Some, ignores ctx.frequency.
    base_frequency: Option<f32>,
    /// Current frequency after modulation (only used when base_frequency is Some)
    current_frequency: f32,
    /// Multiple of the note frequency when tracking.
    ratio: f32,
    /// Detune in cents. 100 cents = 1 semitone.
    detune_cents: f32,
}

/// Parameters that can be modulated on an oscillator
#[derive(Clone, Copy, Debug)]
pub enum OscParam {
    /// Oscillator frequency in Hz (fixed-frequency oscillators only)
    Frequency,
    /// Detune in cents
    Detune,
}

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            base_frequency: None,
            current_frequency: 440.0,
            ratio: 1.0,
            detune_cents: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorBlock::sine())
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorBlock::sawtooth())
    }

    pub fn square() -> Self {
        Self::new(OscillatorBlock::square())
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorBlock::triangle())
    }

    pub fn noise() -> Self {
        Self::new(OscillatorBlock::noise())
    }

    /// Noise with its own seed, so layered noise sources decorrelate.
    pub fn noise_seeded(seed: u64) -> Self {
        Self::new(OscillatorBlock::noise().with_seed(seed))
    }

    /// Set a fixed frequency, ignoring the note pitch from RenderCtx.
    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.base_frequency = Some(freq);
        self.current_frequency = freq;
        self
    }

    /// Play a multiple of the note frequency (a harmonic partial).
    pub fn with_ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio.max(0.0);
        self
    }

    /// Set detune in cents (100 cents = 1 semitone).
    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    fn frequency(&self, ctx: &RenderCtx) -> f32 {
        let base = if self.base_frequency.is_some() {
            self.current_frequency
        } else {
            ctx.frequency * self.ratio
        };

        if self.detune_cents != 0.0 {
            base * 2.0_f32.powf(self.detune_cents / 1200.0)
        } else {
            base
        }
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let modified_ctx = RenderCtx {
            frequency: self.frequency(ctx),
            ..*ctx
        };
        self.osc.render(out, &modified_ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        // Each hit starts its cycle at zero so the attack transient is
        // identical from note to note.
        self.osc.reset();
        if let Some(base) = self.base_frequency {
            self.current_frequency = base;
        }
    }
}

impl Modulatable for OscNode {
    type Param = OscParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            OscParam::Frequency => self.base_frequency.unwrap_or(self.current_frequency),
            OscParam::Detune => self.detune_cents,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            OscParam::Frequency => {
                self.current_frequency = (base + modulation).clamp(20.0, 20_000.0);
            }
            OscParam::Detune => {
                self.detune_cents = (base + modulation).clamp(-200.0, 200.0);
            }
        }
    }
}
