use glitch_edit::SegmentId;
use glitch_timecode::{Timecode, TimecodeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("Segment {segment} is {length} long, slice of {slice} does not fit")]
    SegmentTooShort {
        segment: SegmentId,
        length: Timecode,
        slice: Timecode,
    },

    #[error("Capability '{capability}' is not available")]
    CapabilityUnavailable { capability: String },

    #[error("Capability '{capability}' failed: {message}")]
    Capability { capability: String, message: String },

    #[error("Invalid {effect} configuration: {message}")]
    InvalidConfig { effect: String, message: String },

    #[error(transparent)]
    Edit(#[from] glitch_edit::Error),

    #[error(transparent)]
    Timecode(#[from] TimecodeError),
}

impl FxError {
    pub fn unavailable(capability: &str) -> Self {
        Self::CapabilityUnavailable {
            capability: capability.into(),
        }
    }

    pub fn capability(capability: &str, message: impl Into<String>) -> Self {
        Self::Capability {
            capability: capability.into(),
            message: message.into(),
        }
    }

    pub fn invalid_config(effect: &str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            effect: effect.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FxError>;
