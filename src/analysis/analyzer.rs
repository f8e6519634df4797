use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use rtrb::Consumer;
use tracing::{debug, info, warn};

use crate::{
    analysis::pitch::{PitchConfig, PitchDetector, PitchEstimate},
    io::{InputStream, StreamGuard},
};

/*
Pitch Analyzer
==============

Turns a stream of input samples into level and pitch updates:

  input ──→ [frame buffer] ──→ every hop: ┬─→ Level { rms, peak }
             frame_size, hop              └─→ rms ≥ min_rms?
                                               └─→ detect ─→ confident?
                                                             └─→ Pitch(estimate)

Frames overlap: with the defaults (4096 frame, 1024 hop) each sample takes
part in four frames and an update arrives every ~21 ms at 48 kHz.

`start` moves the sample reader onto a worker thread and keeps the device
stream itself on the calling thread; `stop` joins the worker and then drops
the stream, which closes the device.
*/

/// Pause between polls when the source has nothing new.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Something the worker can pull mono samples from.
pub trait SampleSource: Send {
    /// Append whatever is available to `out`; returns how many samples.
    fn read(&mut self, out: &mut Vec<f32>) -> usize;
}

impl SampleSource for Consumer<f32> {
    fn read(&mut self, out: &mut Vec<f32>) -> usize {
        let available = self.slots();
        let Ok(chunk) = self.read_chunk(available) else {
            return 0;
        };
        let (first, second) = chunk.as_slices();
        out.extend_from_slice(first);
        out.extend_from_slice(second);
        chunk.commit_all();
        available
    }
}

/// Samples from an input device, reporting once when the device thread had
/// to drop some because the worker fell behind.
struct DeviceSource {
    samples: Consumer<f32>,
    overflow: Arc<AtomicBool>,
    reported: bool,
}

impl SampleSource for DeviceSource {
    fn read(&mut self, out: &mut Vec<f32>) -> usize {
        if !self.reported && self.overflow.load(Ordering::Relaxed) {
            self.reported = true;
            warn!("input buffer full, dropping samples");
        }
        self.samples.read(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalyzerEvent {
    /// Input level of the latest frame.
    Level { rms: f32, peak: f32 },
    Pitch(PitchEstimate),
}

type Listener = Box<dyn FnMut(AnalyzerEvent) + Send>;

/// Framing, gating and detection, independent of where samples come from.
struct Pipeline {
    config: PitchConfig,
    detector: PitchDetector,
    pending: Vec<f32>,
}

impl Pipeline {
    fn new(sample_rate: f32, config: PitchConfig) -> Self {
        let detector = PitchDetector::new(sample_rate, config);
        Self {
            pending: Vec::with_capacity(detector.frame_size() * 2),
            config,
            detector,
        }
    }

    fn push(&mut self, samples: &[f32], mut emit: impl FnMut(AnalyzerEvent)) {
        self.pending.extend_from_slice(samples);
        let frame_size = self.detector.frame_size();
        let hop = self.config.hop_size.clamp(1, frame_size);

        while self.pending.len() >= frame_size {
            let frame = &self.pending[..frame_size];
            let (rms, peak) = level(frame);
            emit(AnalyzerEvent::Level { rms, peak });

            if rms >= self.config.min_rms {
                if let Some(estimate) = self.detector.detect(frame) {
                    if estimate.confidence >= self.config.confidence_threshold {
                        emit(AnalyzerEvent::Pitch(estimate));
                    }
                }
            }
            self.pending.drain(..hop);
        }
    }
}

fn level(frame: &[f32]) -> (f32, f32) {
    if frame.is_empty() {
        return (0.0, 0.0);
    }
    let sum_sq: f32 = frame.iter().map(|s| s * s).sum();
    let peak = frame.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
    ((sum_sq / frame.len() as f32).sqrt(), peak)
}

struct Worker {
    running: Arc<AtomicBool>,
    thread: JoinHandle<()>,
    stream: Option<StreamGuard>,
}

/// Continuous pitch and level analysis of live input.
pub struct PitchAnalyzer {
    config: PitchConfig,
    sample_rate: f32,
    listener: Arc<Mutex<Option<Listener>>>,
    worker: Option<Worker>,
    inline: Option<Pipeline>,
}

impl PitchAnalyzer {
    pub fn new(sample_rate: f32, config: PitchConfig) -> Self {
        Self {
            config,
            sample_rate,
            listener: Arc::new(Mutex::new(None)),
            worker: None,
            inline: None,
        }
    }

    pub fn config(&self) -> &PitchConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Receive every level and pitch update. Replaces any earlier listener.
    ///
    /// Called on the worker thread while running.
    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: FnMut(AnalyzerEvent) + Send + 'static,
    {
        let mut slot = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Box::new(listener));
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Analyze a live input stream until [`stop`](Self::stop). Does nothing
    /// if already running.
    pub fn start(&mut self, input: InputStream) {
        if self.is_running() {
            debug!("pitch analyzer already running");
            return;
        }
        let sample_rate = input.sample_rate();
        let (guard, samples, overflow) = input.into_parts();
        let source = DeviceSource {
            samples,
            overflow,
            reported: false,
        };
        self.start_with_source(source, sample_rate);
        if let Some(worker) = self.worker.as_mut() {
            worker.stream = Some(guard);
        }
    }

    /// Analyze any sample source until [`stop`](Self::stop). Does nothing
    /// if already running.
    pub fn start_with_source<S: SampleSource + 'static>(&mut self, mut source: S, sample_rate: f32) {
        if self.is_running() {
            debug!("pitch analyzer already running");
            return;
        }
        self.sample_rate = sample_rate;

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let listener = Arc::clone(&self.listener);
        let mut pipeline = Pipeline::new(sample_rate, self.config);

        let thread = thread::spawn(move || {
            let mut buffer = Vec::with_capacity(pipeline.detector.frame_size());
            while flag.load(Ordering::Acquire) {
                buffer.clear();
                if source.read(&mut buffer) == 0 {
                    thread::sleep(POLL_INTERVAL);
                    continue;
                }
                let mut listener = listener.lock().unwrap_or_else(PoisonError::into_inner);
                pipeline.push(&buffer, |event| {
                    if let Some(listener) = listener.as_mut() {
                        listener(event);
                    }
                });
            }
        });

        info!(sample_rate, frame = self.config.frame_size, "pitch analyzer started");
        self.worker = Some(Worker {
            running,
            thread,
            stream: None,
        });
    }

    /// Stop analysis and release the input device. Does nothing if stopped.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.running.store(false, Ordering::Release);
        let _ = worker.thread.join();
        // Stream guard drops here, closing the device
        drop(worker.stream);
        info!("pitch analyzer stopped");
    }

    /// Run samples through the same pipeline on this thread.
    ///
    /// Samples carry over between calls, so feeding a stream in pieces gives
    /// the same events as feeding it whole. Events also go to the listener.
    pub fn process(&mut self, samples: &[f32]) -> Vec<AnalyzerEvent> {
        let (sample_rate, config) = (self.sample_rate, self.config);
        let pipeline = self
            .inline
            .get_or_insert_with(|| Pipeline::new(sample_rate, config));

        let mut events = Vec::new();
        let mut listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        pipeline.push(samples, |event| {
            if let Some(listener) = listener.as_mut() {
                listener(event);
            }
            events.push(event);
        });
        events
    }
}

impl Drop for PitchAnalyzer {
    fn drop(&mut self) {
        self.stop();
    }
}
