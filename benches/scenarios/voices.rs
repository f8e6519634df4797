//! One instrument voice at a time, rendered in render quanta the way the
//! engine drives them.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_band::{
    graph::node::{GraphNode, RenderCtx},
    sequencing::Articulation,
    theory::Note,
    voices::{self, BassTone, DrumKit, Patch, PianoTone},
    RENDER_QUANTUM,
};

use crate::BLOCK_SIZES;

fn render(patch: &mut Patch, buffer: &mut [f32], ctx: &RenderCtx) {
    for chunk in buffer.chunks_mut(RENDER_QUANTUM) {
        patch.graph_mut().render_block(chunk, ctx);
    }
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let drum_ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);
    let bass_ctx = RenderCtx::from_note(48_000.0, "A1".parse::<Note>().unwrap(), 0.9);
    let piano_ctx = RenderCtx::from_note(48_000.0, "C4".parse::<Note>().unwrap(), 0.8);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let cases: Vec<(&str, Patch, &RenderCtx)> = vec![
            ("kick", voices::kick(DrumKit::Acoustic), &drum_ctx),
            ("snare", voices::snare(DrumKit::Rock, Articulation::Normal), &drum_ctx),
            ("hihat", voices::hihat(DrumKit::Electronic), &drum_ctx),
            ("ride", voices::ride(DrumKit::Jazz), &drum_ctx),
            ("bass_slap", voices::bass(BassTone::Slap), &bass_ctx),
            ("bass_synth", voices::bass(BassTone::Synth), &bass_ctx),
            ("piano_grand", voices::piano(PianoTone::Grand), &piano_ctx),
            ("piano_electric", voices::piano(PianoTone::Electric), &piano_ctx),
        ];

        for (name, mut patch, ctx) in cases {
            patch.graph_mut().note_on(ctx);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| render(&mut patch, black_box(&mut buffer), black_box(ctx)))
            });
        }
    }

    group.finish();
}
