use std::sync::Arc;

use saavy_band::{
    band::{Band, BandConfig},
    engine::{self, EngineConfig},
    sequencing::StyleLibrary,
};

const SAMPLE_RATE: f32 = 16_000.0;

#[test]
fn idle_engine_renders_silence() {
    let (_handle, mut renderer) = engine::create(EngineConfig::new(SAMPLE_RATE));
    let mut output = vec![1.0f32; 1_024];
    renderer.render(&mut output);
    assert!(output.iter().all(|&s| s == 0.0));
    assert_eq!(renderer.frame(), 1_024);
}

#[test]
fn every_genre_renders_bounded_audio() {
    let library = Arc::new(StyleLibrary::reference().unwrap());

    for genre in library.genres() {
        let (engine, mut renderer) = engine::create(EngineConfig::new(SAMPLE_RATE));
        let config = BandConfig::default().with_drive_ticks(false);
        let mut band = Band::new(Arc::clone(&library), engine, config);
        let key = band.play(genre, 1, 120.0, Some("C Am F G".parse().unwrap()));
        assert_eq!(key.genre, genre);

        let mut block = [0.0f32; 512];
        let mut peak = 0.0f32;
        for _ in 0..(2.0 * SAMPLE_RATE / 512.0) as usize {
            band.tick(band.clock().now());
            renderer.render(&mut block);
            for &s in &block {
                assert!(s.is_finite() && s.abs() <= 1.0, "{genre}: sample {s}");
                peak = peak.max(s.abs());
            }
        }
        assert!(peak > 0.01, "{genre} stayed silent");
    }
}
