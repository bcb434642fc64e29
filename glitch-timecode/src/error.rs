//! Error types for timecode operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for timecode operations.
pub type Result<T> = std::result::Result<T, TimecodeError>;

/// Errors that can occur during timecode arithmetic and conversion.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
pub enum TimecodeError {
    /// Subtraction or conversion would produce a position before zero.
    #[error("Timecode arithmetic went negative: {lhs} - {rhs} ticks")]
    NegativeResult {
        /// Left operand in ticks.
        lhs: u64,
        /// Right operand in ticks.
        rhs: u64,
    },

    /// Addition or scaling exceeded the representable range.
    #[error("Timecode overflow")]
    Overflow,

    /// Scale factor is negative, NaN or infinite.
    #[error("Invalid scale factor: {factor}")]
    InvalidScale {
        /// The rejected factor.
        factor: f64,
    },

    /// A millisecond value that cannot be represented (negative or NaN).
    #[error("Invalid millisecond value: {value}")]
    InvalidMillis {
        /// The rejected value.
        value: f64,
    },

    /// Invalid frame rate.
    #[error("Invalid frame rate: {numerator}/{denominator}")]
    InvalidFrameRate {
        /// Frame rate numerator.
        numerator: u32,
        /// Frame rate denominator.
        denominator: u32,
    },
}

impl TimecodeError {
    /// Create a negative result error from the two operands.
    pub fn negative(lhs: u64, rhs: u64) -> Self {
        Self::NegativeResult { lhs, rhs }
    }

    /// Create an invalid frame rate error.
    pub fn invalid_frame_rate(numerator: u32, denominator: u32) -> Self {
        Self::InvalidFrameRate {
            numerator,
            denominator,
        }
    }
}
