//! Frame rates and SMPTE-style display.
//!
//! Timeline arithmetic never depends on a frame rate; these helpers only
//! exist to render positions as `HH:MM:SS:FF` for edit decision lists.

use crate::error::{Result, TimecodeError};
use crate::timecode::{Timecode, TICKS_PER_SECOND};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common project frame rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrameRate {
    /// 24 fps (film)
    Fps24,
    /// 25 fps (PAL)
    Fps25,
    /// 30 fps
    #[default]
    Fps30,
    /// 50 fps (PAL)
    Fps50,
    /// 60 fps
    Fps60,
    /// Custom frame rate (numerator, denominator)
    Custom {
        /// Frame rate numerator.
        numerator: u32,
        /// Frame rate denominator.
        denominator: u32,
    },
}

impl FrameRate {
    /// Get the frame rate as a rational number (numerator, denominator).
    #[must_use]
    pub fn as_rational(&self) -> (u32, u32) {
        match self {
            Self::Fps24 => (24, 1),
            Self::Fps25 => (25, 1),
            Self::Fps30 => (30, 1),
            Self::Fps50 => (50, 1),
            Self::Fps60 => (60, 1),
            Self::Custom {
                numerator,
                denominator,
            } => (*numerator, *denominator),
        }
    }

    /// Integer frames per second used for the frame field of a timecode.
    #[must_use]
    pub fn nominal_fps(&self) -> u32 {
        let (num, den) = self.as_rational();
        ((num as f64) / (den as f64)).round().max(1.0) as u32
    }

    /// Get the frame rate as a floating point value.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        let (num, den) = self.as_rational();
        num as f64 / den as f64
    }

    /// Create a custom frame rate.
    pub fn custom(numerator: u32, denominator: u32) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(TimecodeError::invalid_frame_rate(numerator, denominator));
        }
        Ok(Self::from_rational(numerator, denominator))
    }

    /// Try to match a rational frame rate to a standard one.
    #[must_use]
    pub fn from_rational(numerator: u32, denominator: u32) -> Self {
        match (numerator, denominator) {
            (24, 1) => Self::Fps24,
            (25, 1) => Self::Fps25,
            (30, 1) => Self::Fps30,
            (50, 1) => Self::Fps50,
            (60, 1) => Self::Fps60,
            _ => Self::Custom {
                numerator,
                denominator,
            },
        }
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom {
                numerator,
                denominator,
            } => write!(f, "{}/{}", numerator, denominator),
            other => write!(f, "{}", other.nominal_fps()),
        }
    }
}

impl Timecode {
    /// Whole frames elapsed at `rate`, truncated.
    #[must_use]
    pub fn to_frames(&self, rate: FrameRate) -> u64 {
        let (num, den) = rate.as_rational();
        if den == 0 {
            return 0;
        }
        let frames =
            self.ticks() as u128 * num as u128 / (den as u128 * TICKS_PER_SECOND as u128);
        frames.min(u64::MAX as u128) as u64
    }

    /// Position of frame `frame` at `rate`.
    pub fn from_frames(frame: u64, rate: FrameRate) -> Result<Self> {
        let (num, den) = rate.as_rational();
        if num == 0 || den == 0 {
            return Err(TimecodeError::invalid_frame_rate(num, den));
        }
        let ticks = frame as u128 * den as u128 * TICKS_PER_SECOND as u128 / num as u128;
        u64::try_from(ticks)
            .map(Timecode::from_ticks)
            .map_err(|_| TimecodeError::Overflow)
    }

    /// Render as non-drop `HH:MM:SS:FF` at `rate`.
    #[must_use]
    pub fn to_smpte(&self, rate: FrameRate) -> String {
        let fps = rate.nominal_fps() as u64;
        let total_frames = self.to_frames(rate);
        let h = total_frames / (fps * 3600);
        let m = (total_frames / (fps * 60)) % 60;
        let s = (total_frames / fps) % 60;
        let f = total_frames % fps;
        format!("{:02}:{:02}:{:02}:{:02}", h, m, s, f)
    }
}
