//! Picture effects delegated to host generators: meme text, stare-down zoom
//! and tech text.

use glitch_edit::{Segment, SegmentId, SegmentStore};
use glitch_timecode::Timecode;
use tracing::debug;

use crate::capability::{Capabilities, TextOverlay, ZoomKeyframe};
use crate::compositor::Compositor;
use crate::config::{EffectKind, MemeConfig, TechTextConfig, ZoomConfig};
use crate::error::Result;
use crate::random::RandomStream;

/// Words the tech-text effect picks from.
pub const TECH_WORDS: [&str; 8] = [
    "ERROR",
    "ACCESS",
    "0xDEADBEEF",
    "404",
    "SYSTEM",
    "GLITCH",
    "PROCESS",
    "STREAM",
];

impl Compositor for MemeConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::MemeReplace
    }

    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        _rng: &mut RandomStream,
        caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        let seg = store.get(target)?;
        let overlay = TextOverlay {
            text: self.text.clone(),
            start: seg.start,
            length: Timecode::from_millis(self.duration_ms),
        };
        caps.text_overlay(seg, &overlay)?;
        debug!(segment = %target, text = %self.text, "Meme text placed");
        Ok(Vec::new())
    }
}

impl Compositor for ZoomConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::StareZoom
    }

    /// Ramp from the full frame at the segment start to `zoom_percent` after
    /// `duration_ms`, capped at the segment end.
    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        _rng: &mut RandomStream,
        caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        let seg = store.get(target)?;
        let ramp = Timecode::from_millis(self.duration_ms).min(seg.length);
        let keyframes = [
            ZoomKeyframe {
                position: seg.start,
                scale: 1.0,
            },
            ZoomKeyframe {
                position: seg.start + ramp,
                scale: f64::from(self.zoom_percent) / 100.0,
            },
        ];
        caps.zoom(seg, &keyframes)?;
        debug!(segment = %target, zoom_percent = self.zoom_percent, "Zoom keyframes added");
        Ok(Vec::new())
    }
}

impl Compositor for TechTextConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::TechText
    }

    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        rng: &mut RandomStream,
        caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        let seg = store.get(target)?;
        let span = i64::try_from(seg.length.to_millis()).unwrap_or(i64::MAX);
        for _ in 0..self.count {
            let text = TECH_WORDS[rng.index(TECH_WORDS.len())];
            let length = rng.range(150, 1200) as u64;
            let offset = rng.range(0, span) as u64;
            let overlay = TextOverlay {
                text: text.into(),
                start: seg.start + Timecode::from_millis(offset),
                length: Timecode::from_millis(length),
            };
            caps.text_overlay(seg, &overlay)?;
        }
        debug!(segment = %target, count = self.count, "Tech text placed");
        Ok(Vec::new())
    }
}
