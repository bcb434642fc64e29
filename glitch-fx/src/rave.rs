//! Dance/rave quick-cuts and reverse.

use glitch_edit::{ops, InsertMode, Segment, SegmentId, SegmentStore};
use glitch_timecode::Timecode;
use tracing::debug;

use crate::capability::Capabilities;
use crate::compositor::Compositor;
use crate::config::{DanceRaveConfig, EffectKind, ReverseConfig};
use crate::error::{FxError, Result};
use crate::random::RandomStream;

impl Compositor for DanceRaveConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::DanceRave
    }

    /// At every interval, lift a half-interval slice starting at a jittered
    /// point and drop it back in place. Material stays where it was; the
    /// track gains hard cut points.
    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        rng: &mut RandomStream,
        _caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        let interval = self.interval_ms;
        if interval == 0 {
            return Err(FxError::invalid_config("dance_rave", "interval_ms must be positive"));
        }
        let seg = store.get(target)?.clone();
        let end = seg.end();
        let half = Timecode::from_millis(interval / 2);
        let cuts = (seg.length.to_millis() / interval).max(1);
        let max_jitter = i64::try_from(interval / 3).unwrap_or(i64::MAX);

        let mut produced = Vec::new();
        for i in 0..cuts {
            let jitter = rng.range(0, max_jitter) as u64;
            let t = seg.start + Timecode::from_millis(i * interval + jitter);
            if t >= end || half.is_zero() {
                continue;
            }
            let Some(piece) = store.segment_at(seg.track, t)? else {
                continue;
            };
            let (piece_id, slice_end) = (piece.id, (t + half).min(end).min(piece.end()));
            let slice = ops::extract_slice(store, piece_id, t, slice_end)?;
            produced.push(ops::reinsert_at(
                store,
                seg.track,
                slice,
                t,
                InsertMode::Strict,
            )?);
        }

        debug!(segment = %target, cuts, produced = produced.len(), "Dance rave applied");
        Ok(produced)
    }
}

impl Compositor for ReverseConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::Reverse
    }

    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        _rng: &mut RandomStream,
        _caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        let seg = ops::reverse_in_place(store, target)?;
        debug!(segment = %target, reversed = seg.is_reversed(), "Reverse applied");
        Ok(Vec::new())
    }
}
