//! Oscillator cost per waveform, at the pitches the instruments play.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_band::dsp::oscillator::OscillatorBlock;
use saavy_band::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    // E1: bottom of the bass range
    let low = RenderCtx::from_freq(48_000.0, 41.2, 1.0);
    // C6: top of a piano voicing
    let high = RenderCtx::from_freq(48_000.0, 1_046.5, 1.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let cases: [(&str, OscillatorBlock, &RenderCtx); 5] = [
            ("sine_bass", OscillatorBlock::sine(), &low),
            ("sine_treble", OscillatorBlock::sine(), &high),
            ("saw_bass", OscillatorBlock::sawtooth(), &low),
            ("square_cluster", OscillatorBlock::square(), &high),
            ("noise_wires", OscillatorBlock::noise().with_seed(7), &high),
        ];
        for (name, mut osc, ctx) in cases {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| osc.render(black_box(&mut buffer), black_box(ctx)))
            });
        }
    }

    group.finish();
}
