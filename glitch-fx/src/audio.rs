//! Audio effects: ear-rape gain spike, bleep censor and auto-pan.

use glitch_edit::{ops, InsertMode, Segment, SegmentId, SegmentStore};
use glitch_timecode::Timecode;
use tracing::debug;

use crate::capability::{Capabilities, EnvelopePoint};
use crate::compositor::Compositor;
use crate::config::{AutoPanConfig, BleepConfig, EarRapeConfig, EffectKind};
use crate::error::{FxError, Result};
use crate::random::RandomStream;

/// Half-width of the ear-rape spike.
const SPIKE_RAMP: Timecode = Timecode::from_millis(50);

impl Compositor for EarRapeConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::EarRape
    }

    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        _rng: &mut RandomStream,
        caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        let seg = store.get(target)?;
        let half = seg.length.scale(0.5)?;
        let ramp = SPIKE_RAMP.min(seg.length.scale(0.25)?);
        let mid = seg.start + half;
        let points = [
            EnvelopePoint::new(mid.checked_sub(ramp)?, 0.0),
            EnvelopePoint::new(mid, self.db_boost),
            EnvelopePoint::new(mid + ramp, 0.0),
        ];
        caps.volume_envelope(seg, &points)?;
        debug!(segment = %target, db = self.db_boost, "Volume spike added");
        Ok(Vec::new())
    }
}

impl Compositor for BleepConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::Bleep
    }

    /// Overwrite the centre of the segment with a generated tone.
    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        _rng: &mut RandomStream,
        caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        let seg = store.get(target)?.clone();
        let length = Timecode::from_millis(self.duration_ms).min(seg.length);
        let lead = Timecode::from_ticks(seg.length.checked_sub(length)?.ticks() / 2);
        let position = seg.start + lead;

        let media = caps.generate_tone(self.frequency_hz, length)?;
        let id = store.allocate_id();
        let tone = Segment::new(id, &media.source, Timecode::ZERO, length).media(media.media_type);
        let placed = ops::reinsert_at(store, seg.track, tone, position, InsertMode::Overwrite)?;

        debug!(
            segment = %target,
            tone = %placed.id,
            frequency_hz = self.frequency_hz,
            position = %position,
            "Bleep inserted"
        );
        Ok(vec![placed])
    }
}

impl Compositor for AutoPanConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::AutoPan
    }

    /// Hard left on even cycles, hard right on odd ones.
    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        _rng: &mut RandomStream,
        caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        if self.cycle_ms == 0 {
            return Err(FxError::invalid_config("auto_pan", "cycle_ms must be positive"));
        }
        let seg = store.get(target)?;
        let cycle = Timecode::from_millis(self.cycle_ms);
        let mut points = Vec::new();
        let mut t = seg.start;
        while t < seg.end() {
            let value = if points.len() % 2 == 0 { -1.0 } else { 1.0 };
            points.push(EnvelopePoint::new(t, value));
            t = t.checked_add(cycle)?;
        }
        caps.pan_envelope(seg, &points)?;
        debug!(segment = %target, points = points.len(), "Pan envelope added");
        Ok(Vec::new())
    }
}
