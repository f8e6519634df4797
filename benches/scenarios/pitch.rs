//! One pitch estimate per hop: the tuner thread's work.

use std::f32::consts::TAU;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_band::analysis::{PitchConfig, PitchDetector};

pub fn bench_pitch(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/pitch");
    let sample_rate = 48_000.0;

    for frame in [1024usize, 2048, 4096] {
        let config = PitchConfig::default().with_frame(frame, frame / 4);
        let mut detector = PitchDetector::new(sample_rate, config);
        // Low E with a strong second harmonic
        let signal: Vec<f32> = (0..frame)
            .map(|i| {
                let t = i as f32 / sample_rate;
                0.5 * (TAU * 82.4 * t).sin() + 0.3 * (TAU * 164.8 * t).sin()
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("nsdf", frame), &frame, |b, _| {
            b.iter(|| detector.detect(black_box(&signal)))
        });
    }

    group.finish();
}
