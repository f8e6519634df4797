use std::{collections::VecDeque, time::Duration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Lookahead Scheduler
===================

A timer thread cannot fire at sample-accurate times, but it can run often and
look ahead. Every `tick_interval` (25 ms) the scheduler hands out every event
whose exact time falls before `now + lookahead` (100 ms). Each event carries
its own exact time; the renderer starts the voice on that frame, so tick
jitter never reaches the audio.

  now                 now + lookahead
   │◄──── window ──────►│
   ├──●────●───────●────┤──●──     ● = event, dispatched when inside window
   tick                    next tick picks this one up

Event times are always computed from the start of their measure:

    time = measure_start + beat × 60 / bpm

and measure starts advance by whole measures, so rounding never accumulates
into drift however long the band plays.

Tempo changes wait for the next measure boundary. The current measure keeps
the tempo it was planned at; nothing already handed out moves.

Events that are already more than `stale_threshold` in the past (the machine
stalled, or the app was suspended) are skipped and counted instead of being
fired in a burst.
*/

/// Timing configuration for the scheduler and its tick thread.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    pub tick_interval: Duration,
    /// Seconds ahead of now that events are dispatched.
    pub lookahead: f64,
    /// Seconds between `start` and the first downbeat.
    pub start_delay: f64,
    /// Events older than this (seconds) are skipped.
    pub stale_threshold: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(25),
            lookahead: 0.1,
            start_delay: 0.05,
            stale_threshold: 0.05,
        }
    }
}

impl SchedulerConfig {
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_lookahead(mut self, seconds: f64) -> Self {
        self.lookahead = seconds.max(0.0);
        self
    }

    pub fn with_start_delay(mut self, seconds: f64) -> Self {
        self.start_delay = seconds.max(0.0);
        self
    }

    pub fn with_stale_threshold(mut self, seconds: f64) -> Self {
        self.stale_threshold = seconds.max(0.0);
        self
    }
}

/// One measure's worth of cues, in beats from the downbeat.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurePlan<C> {
    pub beats: f64,
    pub events: Vec<(f64, C)>,
}

impl<C> MeasurePlan<C> {
    pub fn new(beats: f64) -> Self {
        Self {
            beats,
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, beat: f64, cue: C) {
        self.events.push((beat, cue));
    }
}

/// Plans measures on demand, one at a time, as the scheduler reaches them.
pub trait MeasureSource<C> {
    fn plan_measure(&mut self, index: u64) -> MeasurePlan<C>;
}

/// A cue handed out by `tick`, stamped with its exact time.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch<C> {
    /// Seconds on the audio clock.
    pub time: f64,
    pub measure: u64,
    pub beat: f64,
    /// Tempo the measure was planned at.
    pub seconds_per_beat: f64,
    pub cue: C,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome<C> {
    pub due: Vec<Dispatch<C>>,
    /// Events skipped because they were already too far in the past.
    pub stale: usize,
}

impl<C> Default for TickOutcome<C> {
    fn default() -> Self {
        Self {
            due: Vec::new(),
            stale: 0,
        }
    }
}

#[derive(Debug)]
pub struct Scheduler<C> {
    config: SchedulerConfig,
    bpm: f64,
    pending_bpm: Option<f64>,
    measure: u64,
    measure_start: f64,
    measure_beats: f64,
    /// Start, length in beats and tempo of the measure before `measure`.
    previous: Option<(f64, f64, f64)>,
    events: VecDeque<(f64, C)>,
}

impl<C> Scheduler<C> {
    /// Start the transport: measure 0 begins `start_delay` after `now`.
    pub fn start<S: MeasureSource<C>>(
        config: SchedulerConfig,
        now: f64,
        bpm: f64,
        source: &mut S,
    ) -> Self {
        let mut scheduler = Self {
            config,
            bpm,
            pending_bpm: None,
            measure: 0,
            measure_start: now + config.start_delay,
            measure_beats: 0.0,
            previous: None,
            events: VecDeque::new(),
        };
        scheduler.load(source.plan_measure(0));
        scheduler
    }

    fn load(&mut self, plan: MeasurePlan<C>) {
        let mut events = plan.events;
        events.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.measure_beats = plan.beats;
        self.events = events.into();
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Tempo of the measure currently playing.
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Tempo that takes over at the next measure boundary, if any.
    pub fn pending_bpm(&self) -> Option<f64> {
        self.pending_bpm
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.pending_bpm = Some(bpm);
    }

    pub fn measure(&self) -> u64 {
        self.measure
    }

    pub fn measure_start(&self) -> f64 {
        self.measure_start
    }

    /// Measure and beat position at `now`, relative to the planned measure.
    ///
    /// Before the first downbeat this is `(0, 0.0)`. Between planning a
    /// measure and its downbeat the previous measure is still sounding.
    pub fn position(&self, now: f64) -> (u64, f64) {
        if let Some((start, beats, bpm)) = self.previous {
            if now < self.measure_start && self.measure > 0 {
                let beat = ((now - start) / (60.0 / bpm)).clamp(0.0, beats);
                return (self.measure - 1, beat);
            }
        }
        let seconds_per_beat = 60.0 / self.bpm;
        let beat = ((now - self.measure_start) / seconds_per_beat).max(0.0);
        if beat >= self.measure_beats && self.measure_beats > 0.0 {
            // Lookahead has not reached the next plan yet
            let extra = (beat / self.measure_beats).floor();
            return (
                self.measure + extra as u64,
                beat - extra * self.measure_beats,
            );
        }
        (self.measure, beat)
    }

    /// Hand out every event due before `now + lookahead`.
    pub fn tick<S: MeasureSource<C>>(&mut self, now: f64, source: &mut S) -> TickOutcome<C> {
        let mut outcome = TickOutcome::default();
        let horizon = now + self.config.lookahead;
        let oldest = now - self.config.stale_threshold;
        let mut seconds_per_beat = 60.0 / self.bpm;

        loop {
            while let Some((beat, _)) = self.events.front() {
                let time = self.measure_start + beat * seconds_per_beat;
                if time >= horizon {
                    return outcome;
                }
                let Some((beat, cue)) = self.events.pop_front() else {
                    break;
                };
                if time < oldest {
                    outcome.stale += 1;
                    continue;
                }
                outcome.due.push(Dispatch {
                    time,
                    measure: self.measure,
                    beat,
                    seconds_per_beat,
                    cue,
                });
            }

            let measure_end = self.measure_start + self.measure_beats * seconds_per_beat;
            if measure_end >= horizon || self.measure_beats <= 0.0 {
                return outcome;
            }

            self.previous = Some((self.measure_start, self.measure_beats, self.bpm));
            self.measure += 1;
            self.measure_start = measure_end;
            if let Some(bpm) = self.pending_bpm.take() {
                self.bpm = bpm;
                seconds_per_beat = 60.0 / bpm;
            }
            self.load(source.plan_measure(self.measure));
        }
    }
}
