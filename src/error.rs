use std::fmt;

/// Errors surfaced by the band engine.
///
/// Most playback paths never return these: unknown styles fall back to a
/// default groove and unknown note names fall back to a default pitch. They
/// exist for strict lookups and for device failures the caller must handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BandError {
    /// Audio output/input device unavailable, permission denied, or the
    /// stream could not be built or started.
    Device(String),
    /// Unknown channel name, malformed note/chord name, or malformed pattern.
    InvalidParameter(String),
}

impl BandError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        BandError::InvalidParameter(msg.into())
    }

    pub(crate) fn device(msg: impl fmt::Display) -> Self {
        BandError::Device(msg.to_string())
    }
}

impl fmt::Display for BandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandError::Device(msg) => write!(f, "audio device error: {msg}"),
            BandError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
        }
    }
}

impl std::error::Error for BandError {}

pub type Result<T> = std::result::Result<T, BandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failure_kind() {
        let err = BandError::invalid("unknown channel 'horns'");
        assert_eq!(err.to_string(), "invalid parameter: unknown channel 'horns'");

        let err = BandError::device("no default output device");
        assert_eq!(err.to_string(), "audio device error: no default output device");
    }
}
