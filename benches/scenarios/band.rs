//! The full renderer with a band playing: what the audio callback costs.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use saavy_band::{
    band::{Band, BandConfig, BassMode},
    engine::{self, EngineConfig},
    sequencing::StyleLibrary,
};

use crate::BLOCK_SIZES;

pub fn bench_band(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/band");
    let library = Arc::new(StyleLibrary::reference().unwrap());

    for &size in BLOCK_SIZES {
        for (genre, style, bass_mode) in [
            ("rock", 2, BassMode::Root),
            ("jazz", 1, BassMode::Walking),
            ("latin", 1, BassMode::Melodic),
        ] {
            let (engine, mut renderer) = engine::create(EngineConfig::new(48_000.0));
            let config = BandConfig::default()
                .with_bass_mode(bass_mode)
                .with_drive_ticks(false);
            let mut band = Band::new(Arc::clone(&library), engine, config);
            band.play(genre, style, 130.0, Some("Dm7 G7 Cmaj7 A7".parse().unwrap()));

            let mut buffer = vec![0.0f32; size];
            group.bench_with_input(BenchmarkId::new(genre, size), &size, |b, _| {
                b.iter(|| {
                    band.tick(band.clock().now());
                    renderer.render(black_box(&mut buffer));
                })
            });
            band.stop();
        }
    }

    group.finish();
}
