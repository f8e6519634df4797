use crate::{graph::node::RenderCtx, MIN_TIME};

/*
ADSR Envelope Implementation
============================

Amplitude envelope with a linear attack and exponential decay and release,
the shape acoustic instruments actually follow: energy bleeds away as a
fraction of what is left, not as a fixed amount per second.

Vocabulary
----------

  peak        Level reached at the end of the attack. Tracks note velocity
              (0.0 - 1.0) unless velocity tracking is disabled, in which case
              it is always 1.0 (used for pitch sweeps that must not depend
              on how hard a drum is hit).

  sustain     A RATIO of the peak, not an absolute level. A soft note
              sustains proportionally quieter than a hard one.

  distance    How far the level still is from the current stage target.
              Exponential stages shrink this by a constant factor per sample.


The Shape
---------

  Level
   peak ┐   ╱╲
        │  ╱  ╲.
        │ ╱     `-.____________
 S·peak │╱                     \.
        │                        `-._
    0.0 └──────────────────────────────→ Time
        A    D        hold        R

Attack is a straight ramp (1-5 ms for every voice here, so curvature would be
inaudible). Decay and release are exponential.


The Math: Exact-Length Exponentials
-----------------------------------

A pure exponential never reaches its target. We make each exponential stage
last exactly its configured time by choosing the per-sample coefficient so the
distance has fallen to -60 dB (1/1000) when the stage time runs out, then
snapping to the target:

    coef     = exp(-ln(1000) / stage_samples)
    distance = distance · coef                     (every sample)
    level    = target + distance

    after stage_samples samples: distance = start · 0.001 → snap to target

This keeps voice lifetimes deterministic: a note triggered at frame 0 and
released at frame H goes Idle at exactly frame H + release_samples. The voice
arena relies on that to reap voices on time.


The State Machine
-----------------

    Idle ──note_on──→ Attack ──peak──→ Decay ──S·peak──→ Sustain
      ↑                  │               │                  │
      │                  └──── note_off ─┴──── note_off ────┘
      │                                  ↓
      └────────── release done ────── Release

note_off from any active stage starts the release from the CURRENT level, so
releasing mid-attack does not click.
*/

/// -60 dB expressed as a natural-log decay amount.
const LN_1000: f32 = 6.907_755;

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_ratio: f32,
    release_time: f32,
    velocity_tracking: bool,

    stage: EnvelopeState,
    level: f32,
    peak: f32,
    distance: f32,
    coef: f32,
    stage_samples: u32,
    stage_elapsed: u32,
}

fn stage_samples(time: f32, sample_rate: f32) -> u32 {
    (time * sample_rate).round().max(1.0) as u32
}

fn exp_coef(samples: u32) -> f32 {
    (-LN_1000 / samples as f32).exp()
}

impl Envelope {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            sustain_ratio: sustain.clamp(0.0, 1.0),
            release_time: release.max(MIN_TIME),
            velocity_tracking: true,

            stage: EnvelopeState::Idle,
            level: 0.0,
            peak: 1.0,
            distance: 0.0,
            coef: 0.0,
            stage_samples: 1,
            stage_elapsed: 0,
        }
    }

    /// Attack, decay to silence, then a release tail for an early note-off.
    pub fn percussive(attack: f32, decay: f32, release: f32) -> Self {
        Self::adsr(attack, decay, 0.0, release)
    }

    /// Fix the peak at 1.0 regardless of note velocity.
    pub fn with_velocity_tracking(mut self, enabled: bool) -> Self {
        self.velocity_tracking = enabled;
        self
    }

    pub fn attack_time(&self) -> f32 {
        self.attack_time
    }

    pub fn decay_time(&self) -> f32 {
        self.decay_time
    }

    pub fn release_time(&self) -> f32 {
        self.release_time
    }

    /// Gate high: restart the attack from zero.
    pub fn note_on(&mut self, ctx: &RenderCtx) {
        self.peak = if self.velocity_tracking {
            ctx.velocity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.level = 0.0;
        self.stage = EnvelopeState::Attack;
        self.stage_samples = stage_samples(self.attack_time, ctx.sample_rate);
        self.stage_elapsed = 0;
    }

    /// Gate low: release from the current level.
    pub fn note_off(&mut self, ctx: &RenderCtx) {
        if matches!(self.stage, EnvelopeState::Idle | EnvelopeState::Release) {
            return;
        }

        self.stage_samples = stage_samples(self.release_time, ctx.sample_rate);
        self.enter_exponential(EnvelopeState::Release, self.level);
    }

    fn sustain_level(&self) -> f32 {
        self.peak * self.sustain_ratio
    }

    fn enter_exponential(&mut self, stage: EnvelopeState, distance: f32) {
        self.stage = stage;
        self.distance = distance;
        self.coef = exp_coef(self.stage_samples);
        self.stage_elapsed = 0;
    }

    /// Advance the envelope by one sample and return the new level.
    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.stage_elapsed += 1;
                self.level = self.peak * self.stage_elapsed as f32 / self.stage_samples as f32;

                if self.stage_elapsed >= self.stage_samples {
                    self.level = self.peak;
                    self.stage_samples = stage_samples(self.decay_time, ctx.sample_rate);
                    let distance = self.peak - self.sustain_level();
                    self.enter_exponential(EnvelopeState::Decay, distance);
                }
            }

            EnvelopeState::Decay => {
                self.stage_elapsed += 1;
                self.distance *= self.coef;
                self.level = self.sustain_level() + self.distance;

                if self.stage_elapsed >= self.stage_samples {
                    self.level = self.sustain_level();
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_level();
            }

            EnvelopeState::Release => {
                self.stage_elapsed += 1;
                self.distance *= self.coef;
                self.level = self.distance;

                if self.stage_elapsed >= self.stage_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(ctx);
        }
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.distance = 0.0;
        self.stage_elapsed = 0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn ctx(velocity: f32) -> RenderCtx {
        RenderCtx::from_freq(SAMPLE_RATE, 440.0, velocity)
    }

    fn render_samples(env: &mut Envelope, samples: usize, velocity: f32) {
        let ctx = ctx(velocity);
        for _ in 0..samples {
            env.next_sample(&ctx);
        }
    }

    #[test]
    fn attack_reaches_velocity_peak() {
        let mut env = Envelope::adsr(0.01, 0.1, 0.7, 0.2);
        env.note_on(&ctx(0.8));
        render_samples(&mut env, 10, 0.8);

        assert!((env.level() - 0.8).abs() < 1e-6);
        assert_eq!(env.state(), EnvelopeState::Decay);
    }

    #[test]
    fn sustain_is_proportional_to_velocity() {
        for velocity in [0.25, 0.5, 1.0] {
            let mut env = Envelope::adsr(0.005, 0.05, 0.6, 0.2);
            env.note_on(&ctx(velocity));
            render_samples(&mut env, 60, velocity);

            assert_eq!(env.state(), EnvelopeState::Sustain);
            assert!((env.level() - 0.6 * velocity).abs() < 1e-6);
        }
    }

    #[test]
    fn decay_is_exponential_not_linear() {
        let mut env = Envelope::adsr(0.001, 0.1, 0.0, 0.1);
        env.note_on(&ctx(1.0));
        // 1 sample attack, then halfway through a 100 sample decay
        render_samples(&mut env, 1 + 50, 1.0);

        // exp(-ln(1000) * 0.5) = 1/sqrt(1000) ≈ 0.0316, far below the linear 0.5
        assert!((env.level() - 0.031_6).abs() < 0.002, "level {}", env.level());
    }

    #[test]
    fn release_lasts_exactly_its_time() {
        let mut env = Envelope::adsr(0.002, 0.01, 0.5, 0.03);
        env.note_on(&ctx(1.0));
        render_samples(&mut env, 40, 1.0);

        env.note_off(&ctx(1.0));
        render_samples(&mut env, 29, 1.0);
        assert!(env.is_active());
        assert!(env.level() > 0.0);

        render_samples(&mut env, 1, 1.0);
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn note_off_during_attack_releases_from_current_level() {
        let mut env = Envelope::adsr(0.1, 0.1, 0.5, 0.05);
        env.note_on(&ctx(1.0));
        render_samples(&mut env, 50, 1.0);
        let before = env.level();

        env.note_off(&ctx(1.0));
        let first = env.next_sample(&ctx(1.0));
        assert!(first < before && first > before * 0.8, "jumped from {before} to {first}");
    }

    #[test]
    fn untracked_velocity_always_peaks_at_one() {
        let mut env = Envelope::percussive(0.001, 0.05, 0.01).with_velocity_tracking(false);
        env.note_on(&ctx(0.2));
        render_samples(&mut env, 1, 0.2);
        assert_eq!(env.level(), 1.0);
    }
}
