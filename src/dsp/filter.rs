use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Topology-Preserving State-Variable Filter
=========================================

Two trapezoidal integrators in a loop. One pass per sample yields all four
responses at once, so switching type is free:

| type     | output             | passes          | rejects      |
| -------- | ------------------ | --------------- | ------------ |
| lowpass  | v2                 | below cutoff    | above cutoff |
| highpass | x - k·v1 - v2      | above cutoff    | below cutoff |
| bandpass | v1                 | around cutoff   | both sides   |
| notch    | x - k·v1           | away from cut   | at cutoff    |

  g = tan(π · fc / fs)           prewarped integrator gain
  k = 2 · (1 - resonance)        damping; k → 0 rings at the cutoff

Resonance is clamped to [0, MAX_RESONANCE] so k never reaches zero (a
self-oscillating drum filter is never what a pattern wants). The cutoff is
clamped below Nyquist because tan() explodes at fs/2, which matters when the
engine runs at low sample rates in offline tests.
*/

const MAX_RESONANCE: f32 = 0.98;
const MAX_CUTOFF_RATIO: f32 = 0.45;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

pub struct SVFilter {
    ic1eq: f32,
    ic2eq: f32,

    cutoff_hz: f32,
    resonance: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz: cutoff_hz.max(1.0),
            resonance: 0.0,
            filter_type,
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
        self.set_resonance(resonance);
        self
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    #[inline]
    fn integrator_gain(&self, sample_rate: f32) -> f32 {
        let cutoff = self.cutoff_hz.min(sample_rate * MAX_CUTOFF_RATIO);
        (PI * cutoff / sample_rate).tan()
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
            notch: sample - k * v1,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let g = self.integrator_gain(ctx.sample_rate);
        let k = 2.0 * (1.0 - self.resonance);

        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(*sample, k, g);

            *sample = match self.filter_type {
                FilterType::LowPass => outputs.lowpass,
                FilterType::HighPass => outputs.highpass,
                FilterType::BandPass => outputs.bandpass,
                FilterType::Notch => outputs.notch,
            }
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff.max(1.0);
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(0.0, MAX_RESONANCE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;

    const SAMPLE_RATE: f32 = 48_000.0;

    /// Peak of a filtered sine, ignoring the settling transient.
    fn filtered_peak(filter: &mut SVFilter, frequency: f32) -> f32 {
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, frequency, 1.0);
        let mut buffer = vec![0.0f32; 2_048];
        OscillatorBlock::sine().render(&mut buffer, &ctx);
        filter.render(&mut buffer, &ctx);
        buffer[512..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn lowpass_passes_dc_and_highpass_blocks_it() {
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, 0.0, 1.0);

        let mut lp = SVFilter::lowpass(500.0);
        let mut buffer = vec![1.0f32; 256];
        lp.render(&mut buffer, &ctx);
        assert!(buffer[255] > 0.99);

        let mut hp = SVFilter::highpass(500.0);
        let mut buffer = vec![1.0f32; 256];
        hp.render(&mut buffer, &ctx);
        assert!(buffer[255].abs() < 0.001);
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let mut filter = SVFilter::lowpass(500.0);
        let peak = filtered_peak(&mut filter, 5_000.0);
        assert!(peak < 0.05, "a decade above cutoff should be ~-40 dB, got {peak}");
    }

    #[test]
    fn bandpass_prefers_its_center() {
        let mut filter = SVFilter::bandpass(1_000.0).with_resonance(0.5);
        let center = filtered_peak(&mut filter, 1_000.0);
        filter.reset();
        let off = filtered_peak(&mut filter, 200.0);
        assert!(center > off * 2.0, "center {center}, off {off}");
    }

    #[test]
    fn notch_rejects_its_center() {
        let mut filter = SVFilter::notch(1_000.0).with_resonance(0.5);
        let center = filtered_peak(&mut filter, 1_000.0);
        filter.reset();
        let off = filtered_peak(&mut filter, 200.0);
        assert!(center * 2.0 < off, "center {center}, off {off}");
    }

    #[test]
    fn resonance_boosts_the_cutoff_region() {
        let mut flat = SVFilter::lowpass(1_000.0).with_resonance(0.1);
        let mut peaky = SVFilter::lowpass(1_000.0).with_resonance(0.8);
        assert!(filtered_peak(&mut peaky, 1_000.0) > filtered_peak(&mut flat, 1_000.0) * 1.5);
    }

    #[test]
    fn cutoff_above_nyquist_stays_stable() {
        let mut filter = SVFilter::lowpass(20_000.0);
        let ctx = RenderCtx::from_freq(8_000.0, 440.0, 1.0);
        let mut buffer = vec![0.0f32; 1_024];
        OscillatorBlock::sawtooth().render(&mut buffer, &ctx);
        filter.render(&mut buffer, &ctx);
        assert!(buffer.iter().all(|s| s.is_finite() && s.abs() < 4.0));
    }

    #[test]
    fn resonance_is_clamped() {
        let mut filter = SVFilter::lowpass(1_000.0);
        filter.set_resonance(5.0);
        assert_eq!(filter.resonance(), MAX_RESONANCE);
        filter.set_resonance(-1.0);
        assert_eq!(filter.resonance(), 0.0);
    }
}
