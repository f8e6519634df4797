//! State-variable filter in the settings the drum and bass voices use.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_band::dsp::filter::SVFilter;
use saavy_band::graph::node::RenderCtx;
use saavy_band::RENDER_QUANTUM;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::from_freq(48_000.0, 110.0, 1.0);

    for &size in BLOCK_SIZES {
        let mut rng = fastrand::Rng::with_seed(42);
        let input: Vec<f32> = (0..size).map(|_| rng.f32() * 2.0 - 1.0).collect();
        let mut buffer = input.clone();

        let cases = [
            ("kick_lowpass", SVFilter::lowpass(200.0)),
            ("snare_bandpass", SVFilter::bandpass(3_000.0).with_resonance(0.2)),
            ("hat_highpass", SVFilter::highpass(7_000.0)),
        ];
        for (name, mut filter) in cases {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }

        // Slap bass: cutoff moved once per render quantum
        let mut filter = SVFilter::lowpass(600.0).with_resonance(0.3);
        let mut cutoff = 3_000.0f32;
        group.bench_with_input(BenchmarkId::new("swept_lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                for chunk in buffer.chunks_mut(RENDER_QUANTUM) {
                    cutoff = if cutoff > 600.0 { cutoff * 0.97 } else { 3_000.0 };
                    filter.set_cutoff(cutoff);
                    filter.render(black_box(chunk), black_box(&ctx));
                }
            })
        });
    }

    group.finish();
}
