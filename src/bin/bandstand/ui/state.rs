//! Tuner readings accumulated from analyzer events

use saavy_band::analysis::{AnalyzerEvent, PitchEstimate};

/// Latest tuner reading.
#[derive(Clone, Copy, Debug, Default)]
pub struct TunerState {
    pub enabled: bool,
    /// Most recent confident estimate; kept while the input is sounding.
    pub estimate: Option<PitchEstimate>,
    pub rms: f32,
    pub peak: f32,
}

impl TunerState {
    /// Input below this RMS clears the displayed note.
    const SILENT_RMS: f32 = 0.005;

    pub fn apply(&mut self, event: AnalyzerEvent) {
        match event {
            AnalyzerEvent::Level { rms, peak } => {
                self.rms = rms;
                self.peak = peak;
                if rms < Self::SILENT_RMS {
                    self.estimate = None;
                }
            }
            AnalyzerEvent::Pitch(estimate) => self.estimate = Some(estimate),
        }
    }
}
