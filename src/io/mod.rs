//! Audio devices.

pub mod device;

pub use device::{default_output_sample_rate, InputDevice, InputStream, OutputDevice, StreamGuard};
