use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, Sample, SampleFormat, SampleRate, SizedSample, StreamConfig,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{error, info};

use crate::{
    engine::Renderer,
    error::{BandError, Result},
    MAX_BLOCK_SIZE,
};

/*
Audio Devices
=============

Output: the renderer is moved into the device callback. The callback renders
mono into a preallocated buffer and copies it to every output channel in
whatever sample format the device asks for (f32, i16 or u16).

Input: the device callback averages its channels down to mono and pushes f32
samples into an rtrb ring buffer. The consumer half goes to whoever analyzes
the signal; samples that find the buffer full are dropped rather than block
the device thread. The callback only raises a shared overflow flag; whoever
reads the samples decides whether to log it.

Both keep the cpal stream alive for as long as the returned value lives;
dropping it closes the device.
*/

/// The default output device's preferred sample rate.
///
/// Build the engine at this rate before opening the device.
pub fn default_output_sample_rate() -> Result<f32> {
    let device = cpal::default_host()
        .default_output_device()
        .ok_or_else(|| BandError::device("no default output device"))?;
    let config = device
        .default_output_config()
        .map_err(BandError::device)?;
    Ok(config.sample_rate().0 as f32)
}

/// A running output stream playing a [`Renderer`].
pub struct OutputDevice {
    _stream: cpal::Stream,
    sample_rate: f32,
    channels: usize,
    name: String,
}

impl OutputDevice {
    /// Open the default output device at the renderer's sample rate and start
    /// playing.
    pub fn open(renderer: Renderer) -> Result<Self> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| BandError::device("no default output device"))?;
        let supported = device
            .default_output_config()
            .map_err(BandError::device)?;
        let name = device.name().unwrap_or_else(|_| "unknown".into());

        let sample_rate = renderer.sample_rate();
        let config = StreamConfig {
            channels: supported.channels(),
            sample_rate: SampleRate(sample_rate as u32),
            buffer_size: cpal::BufferSize::Default,
        };
        let channels = config.channels as usize;

        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_output::<f32>(&device, &config, renderer),
            SampleFormat::I16 => build_output::<i16>(&device, &config, renderer),
            SampleFormat::U16 => build_output::<u16>(&device, &config, renderer),
            other => {
                return Err(BandError::device(format!(
                    "unsupported output sample format {other}"
                )))
            }
        }?;
        stream.play().map_err(BandError::device)?;

        info!(device = %name, sample_rate, channels, "output device open");
        Ok(Self {
            _stream: stream,
            sample_rate,
            channels,
            name,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn build_output<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut renderer: Renderer,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = (config.channels as usize).max(1);
    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frames in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    let len = frames.len() / channels;
                    let block = &mut mono[..len];
                    renderer.render(block);
                    for (frame, &sample) in frames.chunks_mut(channels).zip(block.iter()) {
                        frame.fill(T::from_sample(sample));
                    }
                }
            },
            |err| error!(%err, "output stream error"),
            None,
        )
        .map_err(BandError::device)
}

/// Keeps a cpal stream open. Dropping it closes the device.
pub struct StreamGuard {
    _stream: cpal::Stream,
}

/// Mono f32 samples arriving from an input device.
pub struct InputStream {
    guard: StreamGuard,
    samples: Consumer<f32>,
    sample_rate: f32,
    overflow: Arc<AtomicBool>,
}

impl InputStream {
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn samples(&mut self) -> &mut Consumer<f32> {
        &mut self.samples
    }

    /// Set once the device thread has had to drop samples.
    pub fn overflowed(&self) -> bool {
        self.overflow.load(Ordering::Relaxed)
    }

    /// Split into the device guard, the sample queue and the overflow flag.
    pub fn into_parts(self) -> (StreamGuard, Consumer<f32>, Arc<AtomicBool>) {
        (self.guard, self.samples, self.overflow)
    }
}

/// The default input device.
pub struct InputDevice;

impl InputDevice {
    /// Start capturing into a ring buffer of `capacity` samples.
    pub fn open(capacity: usize) -> Result<InputStream> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or_else(|| BandError::device("no default input device"))?;
        let supported = device
            .default_input_config()
            .map_err(BandError::device)?;
        let name = device.name().unwrap_or_else(|_| "unknown".into());

        let config: StreamConfig = supported.config();
        let sample_rate = config.sample_rate.0 as f32;
        let (producer, samples) = RingBuffer::new(capacity.max(1));
        let overflow = Arc::new(AtomicBool::new(false));

        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_input::<f32>(&device, &config, producer, Arc::clone(&overflow)),
            SampleFormat::I16 => build_input::<i16>(&device, &config, producer, Arc::clone(&overflow)),
            SampleFormat::U16 => build_input::<u16>(&device, &config, producer, Arc::clone(&overflow)),
            other => {
                return Err(BandError::device(format!(
                    "unsupported input sample format {other}"
                )))
            }
        }?;
        stream.play().map_err(BandError::device)?;

        info!(device = %name, sample_rate, channels = config.channels, "input device open");
        Ok(InputStream {
            guard: StreamGuard { _stream: stream },
            samples,
            sample_rate,
            overflow,
        })
    }
}

fn build_input<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut producer: Producer<f32>,
    overflow: Arc<AtomicBool>,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = (config.channels as usize).max(1);

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                push_downmixed(&mut producer, data, channels, &overflow);
            },
            |err| error!(%err, "input stream error"),
            None,
        )
        .map_err(BandError::device)
}

/// Average each interleaved frame to one sample and queue it. Frames that
/// find the queue full are dropped and raise `overflow`.
fn push_downmixed<T>(producer: &mut Producer<f32>, data: &[T], channels: usize, overflow: &AtomicBool)
where
    T: Sample,
    f32: FromSample<T>,
{
    for frame in data.chunks(channels.max(1)) {
        let sum: f32 = frame.iter().map(|s| s.to_sample::<f32>()).sum();
        if producer.push(sum / frame.len() as f32).is_err() {
            overflow.store(true, Ordering::Relaxed);
        }
    }
}
