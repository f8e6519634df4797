//! Onset timing of a band driven by manual ticks, no audio device.

use std::sync::Arc;

use saavy_band::{
    band::{Band, BandConfig, BassMode, Cue, Onset},
    engine::{self, Channel, EngineConfig, Renderer, SchedulerConfig},
    sequencing::{Instrument, StyleLibrary},
    theory::PitchClass,
};

const SAMPLE_RATE: f32 = 16_000.0;
const TICK: f64 = 0.025;

fn band(config: BandConfig) -> (Band, Renderer) {
    let (engine, renderer) = engine::create(EngineConfig::new(SAMPLE_RATE));
    let library = Arc::new(StyleLibrary::reference().unwrap());
    (Band::new(library, engine, config.with_drive_ticks(false)), renderer)
}

/// Tick every 25 ms from `from` until `until`, collecting every onset.
fn run(band: &Band, from: f64, until: f64) -> Vec<Onset> {
    let mut onsets = Vec::new();
    let mut now = from;
    while now < until {
        onsets.extend(band.tick(now).onsets);
        now += TICK;
    }
    onsets
}

fn voice_label(cue: &Cue) -> &'static str {
    match cue {
        Cue::Drum { instrument, .. } => instrument.name(),
        Cue::Bass { .. } => "bass",
        Cue::Piano { .. } => "piano",
    }
}

fn kick_times(onsets: &[Onset]) -> Vec<f64> {
    onsets
        .iter()
        .filter(|o| o.cue.drum() == Some(Instrument::Kick))
        .map(|o| o.time)
        .collect()
}

#[test]
fn four_on_the_floor_kicks_land_one_beat_apart_at_every_tempo() {
    let mut tempos: Vec<f32> = (40..=240).step_by(20).map(|bpm| bpm as f32).collect();
    tempos.extend([97.0, 133.0, 177.0]);

    for bpm in tempos {
        let (mut band, _renderer) = band(BandConfig::default());
        band.play("rock", 1, bpm, None);
        let seconds_per_beat = 60.0 / bpm as f64;
        let onsets = run(&band, 0.0, 12.0 * seconds_per_beat);

        let kicks = kick_times(&onsets);
        assert!(kicks.len() >= 10, "{bpm} bpm: only {} kicks", kicks.len());
        for pair in kicks.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(
                (gap - seconds_per_beat).abs() < 0.002,
                "{bpm} bpm: kicks {gap:.6}s apart, expected {seconds_per_beat:.6}s"
            );
        }
    }
}

#[test]
fn straight_rock_onsets_are_exact_beat_multiples() {
    let scheduler = SchedulerConfig::default().with_start_delay(0.0);
    let (mut band, _renderer) = band(BandConfig::default().with_scheduler(scheduler));

    let key = band.play("rock", 1, 120.0, None);
    let style = band.library().resolve(&key.genre, key.style_id).clone();
    let beats_of = |instrument: Instrument| -> Vec<f64> {
        style
            .pattern
            .events()
            .iter()
            .filter(|e| e.instrument == instrument)
            .map(|e| e.beat)
            .collect()
    };
    assert_eq!(beats_of(Instrument::Kick), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(beats_of(Instrument::Snare), vec![1.0, 3.0]);

    let onsets = run(&band, 0.0, 2.0);
    let kick_at = |beat: f64| {
        onsets
            .iter()
            .find(|o| o.measure == 0 && o.beat == beat && o.cue.drum() == Some(Instrument::Kick))
            .map(|o| o.time)
    };
    assert_eq!(kick_at(2.0), Some(1.0));
    assert_eq!(kick_at(3.0), Some(1.5));
}

#[test]
fn tempo_change_never_crowds_an_instrument() {
    let (mut band, _renderer) = band(BandConfig::default());
    band.play("rock", 1, 120.0, None);

    // Change tempo halfway through the second measure
    let mut onsets = run(&band, 0.0, 3.0);
    assert_eq!(band.set_bpm(180.0), 180.0);
    onsets.extend(run(&band, 3.0, 8.0));

    // Finest grid in the style is a sixteenth; at the faster tempo that is
    // the tightest two onsets of one voice may ever sit.
    let min_gap = 0.25 * 60.0 / 180.0 - 1e-9;
    for label in ["kick", "snare", "hat", "bass", "piano"] {
        let times: Vec<f64> = onsets
            .iter()
            .filter(|o| voice_label(&o.cue) == label)
            .map(|o| o.time)
            .collect();
        for pair in times.windows(2) {
            assert!(
                pair[1] - pair[0] >= min_gap,
                "{label}: onsets {:.4}s and {:.4}s too close",
                pair[0],
                pair[1]
            );
        }
    }

    // New tempo took over at a measure boundary
    let kicks = kick_times(&onsets);
    let last_gap = kicks[kicks.len() - 1] - kicks[kicks.len() - 2];
    assert!((last_gap - 60.0 / 180.0).abs() < 1e-9);
}

#[test]
fn walking_bass_plays_four_notes_per_chord() {
    let config = BandConfig::default().with_bass_mode(BassMode::Walking);
    let (mut band, _renderer) = band(config);
    band.play("rock", 1, 120.0, Some("C F G C".parse().unwrap()));

    let onsets = run(&band, 0.0, 4.5);
    let measure_notes = |measure: u64| -> Vec<(f64, PitchClass)> {
        onsets
            .iter()
            .filter(|o| o.measure == measure)
            .filter_map(|o| match o.cue {
                Cue::Bass { note, .. } => Some((o.beat, note.pitch_class)),
                _ => None,
            })
            .collect()
    };

    // C into F: root, third, fifth, then a half step under F
    assert_eq!(
        measure_notes(0),
        vec![
            (0.0, PitchClass::C),
            (1.0, PitchClass::E),
            (2.0, PitchClass::G),
            (3.0, PitchClass::E),
        ]
    );
    // F into G
    assert_eq!(
        measure_notes(1),
        vec![
            (0.0, PitchClass::F),
            (1.0, PitchClass::A),
            (2.0, PitchClass::C),
            (3.0, PitchClass::FSharp),
        ]
    );
    assert!(onsets
        .iter()
        .filter(|o| o.cue.channel() == Channel::Bass)
        .all(|o| o.cue.velocity() > 0.0));
}

#[test]
fn walking_bass_spreads_over_long_chords() {
    let config = BandConfig::default()
        .with_bass_mode(BassMode::Walking)
        .with_measures_per_chord(2);
    let (mut band, _renderer) = band(config);
    band.play("rock", 1, 120.0, Some("A D".parse().unwrap()));

    // Two 4/4 measures per chord: one note every two beats
    let onsets = run(&band, 0.0, 4.5);
    let bass: Vec<(u64, f64, PitchClass)> = onsets
        .iter()
        .filter_map(|o| match o.cue {
            Cue::Bass { note, .. } if o.measure < 2 => Some((o.measure, o.beat, note.pitch_class)),
            _ => None,
        })
        .collect();
    assert_eq!(
        bass,
        vec![
            (0, 0.0, PitchClass::A),
            (0, 2.0, PitchClass::CSharp),
            (1, 0.0, PitchClass::E),
            (1, 2.0, PitchClass::CSharp),
        ]
    );
}
