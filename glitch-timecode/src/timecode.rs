//! Timeline positions and durations.
//!
//! A [`Timecode`] is an unsigned tick count with 10 000 ticks per
//! millisecond. Conversions from milliseconds truncate toward zero.

use crate::error::{Result, TimecodeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Ticks in one millisecond (100 ns resolution).
pub const TICKS_PER_MILLISECOND: u64 = 10_000;

/// Ticks in one second.
pub const TICKS_PER_SECOND: u64 = TICKS_PER_MILLISECOND * 1_000;

/// A non-negative position or duration on a timeline.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timecode(u64);

impl Timecode {
    /// The timeline origin.
    pub const ZERO: Self = Self(0);

    /// Create a timecode from a raw tick count.
    #[must_use]
    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Raw tick count.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.0
    }

    /// Create a timecode from whole milliseconds.
    ///
    /// Saturates at the largest representable position.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(TICKS_PER_MILLISECOND))
    }

    /// Create a timecode from fractional milliseconds, truncating sub-tick
    /// remainders.
    pub fn from_millis_f64(millis: f64) -> Result<Self> {
        if !millis.is_finite() || millis < 0.0 {
            return Err(TimecodeError::InvalidMillis { value: millis });
        }
        let ticks = (millis * TICKS_PER_MILLISECOND as f64).trunc();
        if ticks >= u64::MAX as f64 {
            return Err(TimecodeError::Overflow);
        }
        Ok(Self(ticks as u64))
    }

    /// Whole milliseconds, truncated.
    #[must_use]
    pub const fn to_millis(&self) -> u64 {
        self.0 / TICKS_PER_MILLISECOND
    }

    /// Check if this is the timeline origin / an empty duration.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Add two timecodes, failing on overflow.
    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(TimecodeError::Overflow)
    }

    /// Subtract `other`, failing with [`TimecodeError::NegativeResult`] when
    /// the result would fall below zero.
    pub fn checked_sub(self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(TimecodeError::negative(self.0, other.0))
    }

    /// Subtract `other`, clamping at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiply by a non-negative factor, truncating to whole ticks.
    pub fn scale(self, factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(TimecodeError::InvalidScale { factor });
        }
        let ticks = (self.0 as f64 * factor).trunc();
        if ticks >= u64::MAX as f64 {
            return Err(TimecodeError::Overflow);
        }
        Ok(Self(ticks as u64))
    }
}

impl Add for Timecode {
    type Output = Self;

    /// Saturating addition. Use [`Timecode::checked_add`] to detect overflow.
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Timecode {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Timecode {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Timecode> for Timecode {
    fn sum<I: Iterator<Item = &'a Timecode>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Timecode {
    /// Formats as `HH:MM:SS.mmm`; hours are not wrapped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.to_millis();
        let hours = millis / 3_600_000;
        let minutes = (millis / 60_000) % 60;
        let seconds = (millis / 1_000) % 60;
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            hours,
            minutes,
            seconds,
            millis % 1_000
        )
    }
}
