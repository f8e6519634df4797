#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

use crate::error::{BandError, Result};

/// Which drum set the band plays.
///
/// A kit changes tuning, not the parts: every kit has the same pieces, but a
/// jazz kick is small and boomy while an electronic kick is a long 808-style
/// sine sweep.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrumKit {
    #[default]
    Acoustic,
    Electronic,
    Rock,
    Jazz,
}

/// Per-kit numbers fed into the drum builders.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KitTuning {
    /// Kick settles at this frequency (Hz).
    pub kick_base: f32,
    /// Kick starts this many Hz above its base.
    pub kick_sweep: f32,
    /// How long the kick pitch takes to fall.
    pub kick_sweep_time: f32,
    pub kick_decay: f32,
    /// Beater click level layered on the kick.
    pub kick_click: f32,
    pub tom_base: f32,
    pub tom_sweep: f32,
    pub snare_body: f32,
    /// Bandpass centre of the snare wires.
    pub snare_wires: f32,
    pub snare_decay: f32,
    /// Highpass corner for hats and cymbals.
    pub cymbal_cutoff: f32,
    /// Scales every body lowpass; above 1.0 is brighter.
    pub brightness: f32,
}

impl DrumKit {
    pub const ALL: [DrumKit; 4] = [
        DrumKit::Acoustic,
        DrumKit::Electronic,
        DrumKit::Rock,
        DrumKit::Jazz,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DrumKit::Acoustic => "acoustic",
            DrumKit::Electronic => "electronic",
            DrumKit::Rock => "rock",
            DrumKit::Jazz => "jazz",
        }
    }

    pub(crate) fn tuning(self) -> KitTuning {
        match self {
            DrumKit::Acoustic => KitTuning {
                kick_base: 55.0,
                kick_sweep: 90.0,
                kick_sweep_time: 0.05,
                kick_decay: 0.35,
                kick_click: 0.25,
                tom_base: 110.0,
                tom_sweep: 70.0,
                snare_body: 190.0,
                snare_wires: 3_500.0,
                snare_decay: 0.18,
                cymbal_cutoff: 7_000.0,
                brightness: 1.0,
            },
            DrumKit::Electronic => KitTuning {
                kick_base: 45.0,
                kick_sweep: 160.0,
                kick_sweep_time: 0.08,
                kick_decay: 0.6,
                kick_click: 0.1,
                tom_base: 130.0,
                tom_sweep: 130.0,
                snare_body: 220.0,
                snare_wires: 5_000.0,
                snare_decay: 0.14,
                cymbal_cutoff: 9_000.0,
                brightness: 1.3,
            },
            DrumKit::Rock => KitTuning {
                kick_base: 60.0,
                kick_sweep: 110.0,
                kick_sweep_time: 0.04,
                kick_decay: 0.3,
                kick_click: 0.35,
                tom_base: 100.0,
                tom_sweep: 80.0,
                snare_body: 200.0,
                snare_wires: 3_000.0,
                snare_decay: 0.22,
                cymbal_cutoff: 6_500.0,
                brightness: 1.1,
            },
            DrumKit::Jazz => KitTuning {
                kick_base: 65.0,
                kick_sweep: 50.0,
                kick_sweep_time: 0.03,
                kick_decay: 0.4,
                kick_click: 0.15,
                tom_base: 140.0,
                tom_sweep: 40.0,
                snare_body: 240.0,
                snare_wires: 4_500.0,
                snare_decay: 0.15,
                cymbal_cutoff: 8_000.0,
                brightness: 0.85,
            },
        }
    }
}

impl fmt::Display for DrumKit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DrumKit {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self> {
        DrumKit::ALL
            .into_iter()
            .find(|kit| kit.name() == s)
            .ok_or_else(|| BandError::invalid(format!("unknown drum kit '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kit_names() {
        assert_eq!("jazz".parse::<DrumKit>().unwrap(), DrumKit::Jazz);
        assert!("marching".parse::<DrumKit>().is_err());
    }

    #[test]
    fn electronic_kick_sweeps_wider_than_jazz() {
        let electronic = DrumKit::Electronic.tuning();
        let jazz = DrumKit::Jazz.tuning();
        assert!(electronic.kick_sweep > jazz.kick_sweep);
        assert!(electronic.kick_decay > jazz.kick_decay);
    }
}
