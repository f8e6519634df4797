//! Pitch detection on synthetic tones, on the engine's own bass, and through
//! the threaded analyzer.

use std::{
    f32::consts::TAU,
    sync::{Arc, Mutex},
    thread,
    time::{Duration, Instant},
};

use saavy_band::{
    analysis::{AnalyzerEvent, PitchAnalyzer, PitchConfig, PitchDetector},
    engine::{self, EngineConfig},
    synth::{BassEngine, EngineCommand},
    theory::PitchClass,
    voices::BassTone,
};

fn sine(frequency: f32, sample_rate: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.5 * (TAU * frequency * i as f32 / sample_rate).sin())
        .collect()
}

#[test]
fn concert_a_reads_a4_at_common_rates() {
    for sample_rate in [44_100.0, 48_000.0] {
        let mut detector = PitchDetector::new(sample_rate, PitchConfig::default());
        let estimate = detector
            .detect(&sine(440.0, sample_rate, 4096))
            .expect("440 Hz should be detected");

        assert_eq!(estimate.pitch_class, PitchClass::A, "{sample_rate} Hz");
        assert_eq!(estimate.octave, 4);
        assert!(estimate.cents.abs() <= 3.0, "{} cents", estimate.cents);
        assert!(estimate.confidence >= 0.9, "confidence {}", estimate.confidence);
    }
}

#[test]
fn silence_has_no_pitch() {
    let mut detector = PitchDetector::new(48_000.0, PitchConfig::default());
    assert!(detector.detect(&vec![0.0; 4096]).is_none());
}

#[test]
fn tuner_hears_the_bass_engine() {
    let config = EngineConfig::new(48_000.0);
    let (mut handle, mut renderer) = engine::create(config);
    let bass = BassEngine::new(BassTone::Fingerstyle, config.voice_timing());
    assert!(handle.send(EngineCommand::Trigger(bass.note_named("A2", 1.0, 0, 1.0))));

    // Skip the pluck transient, then analyse one frame
    let mut audio = vec![0.0f32; 2048 + 4096];
    renderer.render(&mut audio[..2048]);
    renderer.render(&mut audio[2048..]);

    let mut detector = PitchDetector::new(48_000.0, PitchConfig::default());
    let estimate = detector.detect(&audio[2048..]).expect("bass note should be pitched");
    assert_eq!(estimate.pitch_class, PitchClass::A);
    assert_eq!(estimate.octave, 2);
}

#[test]
fn analyzer_thread_reports_through_the_listener() {
    let sample_rate = 48_000.0;
    let (mut producer, consumer) = rtrb::RingBuffer::<f32>::new(16_384);
    let events = Arc::new(Mutex::new(Vec::new()));

    let mut analyzer = PitchAnalyzer::new(sample_rate, PitchConfig::default());
    let sink = Arc::clone(&events);
    analyzer.set_listener(move |event| sink.lock().unwrap().push(event));
    analyzer.start_with_source(consumer, sample_rate);
    assert!(analyzer.is_running());

    for sample in sine(196.0, sample_rate, 12_288) {
        producer.push(sample).unwrap();
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    let pitched = loop {
        let found = events
            .lock()
            .unwrap()
            .iter()
            .find_map(|event| match event {
                AnalyzerEvent::Pitch(estimate) => Some(*estimate),
                AnalyzerEvent::Level { .. } => None,
            });
        if found.is_some() || Instant::now() > deadline {
            break found;
        }
        thread::sleep(Duration::from_millis(10));
    };

    analyzer.stop();
    assert!(!analyzer.is_running());

    let estimate = pitched.expect("analyzer should report G3");
    assert_eq!(estimate.pitch_class, PitchClass::G);
    assert_eq!(estimate.octave, 3);
}
