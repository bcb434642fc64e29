//! Host capabilities the non-core effects call into.
//!
//! Envelopes, generators and sample lookup belong to the host editor. Each
//! method defaults to [`FxError::CapabilityUnavailable`], so a host only
//! implements what it supports.

use glitch_edit::{MediaRef, Segment};
use glitch_timecode::Timecode;
use serde::{Deserialize, Serialize};

use crate::error::{FxError, Result};

/// One automation point at an absolute timeline position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePoint {
    pub position: Timecode,
    pub value: f64,
}

impl EnvelopePoint {
    pub fn new(position: Timecode, value: f64) -> Self {
        Self { position, value }
    }
}

/// Picture scale keyframe; 1.0 is the unzoomed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomKeyframe {
    pub position: Timecode,
    pub scale: f64,
}

/// A generated text event over part of a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub text: String,
    pub start: Timecode,
    pub length: Timecode,
}

/// A media file found by sample lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleInfo {
    pub path: String,
    pub length: Timecode,
}

/// Opaque host operations.
pub trait Capabilities {
    /// Add volume automation (values in dB relative to unity) to a segment.
    fn volume_envelope(&mut self, segment: &Segment, points: &[EnvelopePoint]) -> Result<()> {
        let _ = (segment, points);
        Err(FxError::unavailable("volume_envelope"))
    }

    /// Add pan automation (-1 left, +1 right) to a segment.
    fn pan_envelope(&mut self, segment: &Segment, points: &[EnvelopePoint]) -> Result<()> {
        let _ = (segment, points);
        Err(FxError::unavailable("pan_envelope"))
    }

    /// Create a text generator event above a segment.
    fn text_overlay(&mut self, segment: &Segment, overlay: &TextOverlay) -> Result<()> {
        let _ = (segment, overlay);
        Err(FxError::unavailable("text_overlay"))
    }

    /// Add pan/crop zoom keyframes to a segment.
    fn zoom(&mut self, segment: &Segment, keyframes: &[ZoomKeyframe]) -> Result<()> {
        let _ = (segment, keyframes);
        Err(FxError::unavailable("zoom"))
    }

    /// Produce a sine tone as new media.
    fn generate_tone(&mut self, frequency_hz: u32, length: Timecode) -> Result<MediaRef> {
        let _ = (frequency_hz, length);
        Err(FxError::unavailable("generate_tone"))
    }

    /// List files in `folder` with their lengths.
    fn list_samples(&mut self, folder: &str) -> Result<Vec<SampleInfo>> {
        let _ = folder;
        Err(FxError::unavailable("list_samples"))
    }
}

/// A host with no capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapabilities;

impl Capabilities for NoCapabilities {}

const AUDIO_EXTENSIONS: [&str; 6] = ["wav", "mp3", "aif", "aiff", "flac", "m4a"];

/// Whether `path` names an audio file, by extension.
pub fn is_audio_file(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
