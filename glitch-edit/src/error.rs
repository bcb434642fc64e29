use glitch_timecode::{Timecode, TimecodeError};
use thiserror::Error;

use crate::segment::{SegmentId, TrackId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Position {position} is outside segment range [{start}, {end})")]
    OutOfRange {
        position: Timecode,
        start: Timecode,
        end: Timecode,
    },

    #[error("Range [{start}, {end}) overlaps segment {existing}")]
    Overlap {
        start: Timecode,
        end: Timecode,
        existing: SegmentId,
    },

    #[error("Segment {id} not found")]
    NotFound { id: SegmentId },

    #[error("Track {track} not found")]
    TrackNotFound { track: TrackId },

    #[error("Segment {id} is already on a track")]
    AlreadyTracked { id: SegmentId },

    #[error("Segment {id} has no length")]
    InvalidLength { id: SegmentId },

    #[error("Host rejected edit: {message}")]
    Host { message: String },

    #[error("Transaction '{label}' failed: {message}")]
    Transaction { label: String, message: String },

    #[error(transparent)]
    Timecode(#[from] TimecodeError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }

    pub fn transaction(label: &str, message: impl Into<String>) -> Self {
        Self::Transaction {
            label: label.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
