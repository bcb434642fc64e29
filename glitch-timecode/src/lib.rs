//! Timeline timecode for the glitch editing engine.
//!
//! This crate provides the value type every other glitch crate computes
//! positions and durations with:
//!
//! - **Timecode**: unsigned tick count (100 ns per tick) with checked
//!   arithmetic and truncating millisecond conversion
//! - **FrameRate**: project rates used to render positions as `HH:MM:SS:FF`
//!
//! # Quick Start
//!
//! ```rust
//! use glitch_timecode::{Timecode, FrameRate};
//!
//! let start = Timecode::from_millis(1_000);
//! let slice = Timecode::from_millis(50);
//!
//! let end = start.checked_add(slice).unwrap();
//! assert_eq!(end.to_millis(), 1_050);
//!
//! // Going below zero is an error, not a wrap-around.
//! assert!(slice.checked_sub(end).is_err());
//!
//! assert_eq!(end.to_smpte(FrameRate::Fps30), "00:00:01:01");
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod smpte;
pub mod timecode;

pub use error::{Result, TimecodeError};
pub use smpte::FrameRate;
pub use timecode::{Timecode, TICKS_PER_MILLISECOND, TICKS_PER_SECOND};
