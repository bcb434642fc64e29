//! Transformation pipeline for the glitch editing engine.
//!
//! Runs a batch of target segments through the enabled effects inside one
//! host undo transaction and reports what happened per segment.
//!
//! # Example
//!
//! ```
//! use glitch_edit::{MemoryProject, TrackType};
//! use glitch_fx::NoCapabilities;
//! use glitch_pipeline::{apply_settings, GlitchSettings};
//! use glitch_timecode::Timecode;
//!
//! let mut project = MemoryProject::new();
//! let v1 = project.add_track("V1", TrackType::Video);
//! project
//!     .add_segment(v1, "clip.mp4", Timecode::ZERO, Timecode::from_millis(2_000))
//!     .unwrap();
//!
//! let settings = GlitchSettings::from_json(r#"{ "apply_to_all": true, "seed": 1 }"#).unwrap();
//! let summary = apply_settings(&mut project, &settings, &mut NoCapabilities).unwrap();
//! assert_eq!(summary.segments_processed, 1);
//! assert_eq!(summary.produced, 8);
//! ```

mod error;
mod pipeline;
mod select;
mod settings;

pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, PipelineConfig, PipelineState, PipelineSummary, SegmentFailure};
pub use select::{apply_settings, select_targets};
pub use settings::{GlitchSettings, Toggle};
