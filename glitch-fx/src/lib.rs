//! Randomized glitch effects.
//!
//! Every effect is a [`Compositor`] implemented by its parameter record. The
//! core effects (stutter, stutter-plus, scramble, dance/rave and reverse)
//! only use the segment store; the others hand envelopes, generators and
//! sample lookup to host [`Capabilities`].
//!
//! All randomness comes from one [`RandomStream`] passed through every call,
//! so the same seed always yields the same timeline.
//!
//! # Example
//!
//! ```
//! use glitch_edit::{MemoryProject, SegmentStore, TrackType};
//! use glitch_fx::{Compositor, NoCapabilities, RandomStream, StutterConfig};
//! use glitch_timecode::Timecode;
//!
//! let mut project = MemoryProject::new();
//! let v1 = project.add_track("V1", TrackType::Video);
//! let id = project
//!     .add_segment(v1, "clip.mp4", Timecode::ZERO, Timecode::from_millis(1_000))
//!     .unwrap();
//!
//! let mut store = SegmentStore::open(&mut project).unwrap();
//! let mut rng = RandomStream::new(42);
//! let stutter = StutterConfig { slice_ms: 100, repeats: 3, pitch_variance: 0.0 };
//! let copies = stutter.apply(&mut store, id, &mut rng, &mut NoCapabilities).unwrap();
//! assert_eq!(copies.len(), 3);
//! ```

mod error;
mod random;
mod config;
mod compositor;
mod capability;
mod stutter;
mod scramble;
mod rave;
mod overlay;
mod audio;
mod sample;

#[cfg(test)]
mod test_util;

pub use error::{FxError, Result};
pub use random::RandomStream;
pub use config::{
    sort_declared, AutoPanConfig, BleepConfig, DanceRaveConfig, EarRapeConfig, EffectConfig,
    EffectKind, MemeConfig, RandomSoundConfig, ReverseConfig, ScrambleConfig, SpadinnerConfig,
    StutterConfig, StutterPlusConfig, TechTextConfig, ZoomConfig,
};
pub use compositor::Compositor;
pub use capability::{
    is_audio_file, Capabilities, EnvelopePoint, NoCapabilities, SampleInfo, TextOverlay,
    ZoomKeyframe,
};
pub use overlay::TECH_WORDS;
