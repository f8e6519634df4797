//! Envelope cost in each stage a voice spends time in.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_band::dsp::envelope::Envelope;
use saavy_band::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

fn advanced(mut env: Envelope, ctx: &RenderCtx, samples: usize) -> Envelope {
    env.note_on(ctx);
    for _ in 0..samples {
        env.next_sample(ctx);
    }
    env
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::from_freq(48_000.0, 220.0, 0.8);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Drum hit in its exponential decay
        let mut hit = advanced(Envelope::percussive(0.001, 0.4, 0.05), &ctx, 480);
        group.bench_with_input(BenchmarkId::new("percussive_decay", size), &size, |b, _| {
            b.iter(|| hit.render(black_box(&mut buffer), black_box(&ctx)))
        });

        // Held piano chord
        let mut held = advanced(Envelope::adsr(0.005, 0.3, 0.6, 0.3), &ctx, 48_000);
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| held.render(black_box(&mut buffer), black_box(&ctx)))
        });

        // Released note
        let mut released = advanced(Envelope::adsr(0.005, 0.1, 0.7, 0.3), &ctx, 4_800);
        released.note_off(&ctx);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| released.render(black_box(&mut buffer), black_box(&ctx)))
        });
    }

    group.finish();
}
