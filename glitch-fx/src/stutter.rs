//! Stutter and stutter-plus.

use glitch_edit::{ops, InsertMode, Segment, SegmentId, SegmentStore};
use glitch_timecode::Timecode;
use tracing::debug;

use crate::capability::Capabilities;
use crate::compositor::Compositor;
use crate::config::{EffectKind, StutterConfig, StutterPlusConfig};
use crate::error::{FxError, Result};
use crate::random::RandomStream;

/// Result of one stutter: the copies and the material left after them.
struct Burst {
    copies: Vec<Segment>,
    remainder: SegmentId,
}

/// Cut `slice` off the head of `target` and ripple `repeats` copies of it in
/// right after the cut.
///
/// Every copy draws one pitch factor from `[1 - variance/2, 1 + variance/2)`,
/// also when `variance` is zero, so the draw count never depends on it.
fn stutter_once(
    store: &mut SegmentStore<'_>,
    target: SegmentId,
    slice: Timecode,
    repeats: usize,
    variance: f64,
    rng: &mut RandomStream,
) -> Result<Burst> {
    let seg = store.get(target)?.clone();
    if slice >= seg.length {
        return Err(FxError::SegmentTooShort {
            segment: target,
            length: seg.length,
            slice,
        });
    }
    let (head, rest) = store.split(target, seg.start.checked_add(slice)?)?;
    let copies = ops::repeat_after(store, head.id, repeats, InsertMode::Ripple, |_, copy| {
        copy.pitch = head.pitch * (1.0 + (rng.next_f64() - 0.5) * variance);
    })?;
    Ok(Burst {
        copies,
        remainder: rest.id,
    })
}

impl Compositor for StutterConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::Stutter
    }

    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        rng: &mut RandomStream,
        _caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        let slice = Timecode::from_millis(self.slice_ms);
        let burst = stutter_once(store, target, slice, self.repeats, self.pitch_variance, rng)?;
        debug!(
            segment = %target,
            slice_ms = self.slice_ms,
            copies = burst.copies.len(),
            "Stutter applied"
        );
        Ok(burst.copies)
    }
}

impl Compositor for StutterPlusConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::StutterPlus
    }

    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        rng: &mut RandomStream,
        _caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        let iterations = rng.range(4, i64::from(self.max_repeats).max(5));
        let base = i64::try_from(self.base_ms).unwrap_or(i64::MAX);
        let mut current = target;
        let mut produced = Vec::new();

        for i in 0..iterations {
            let ms = base.saturating_add(rng.range(-base / 2, base / 2)).max(10);
            let repeats = rng.range(2, 8) as usize;
            let variance = 0.1 * rng.next_f64();
            let slice = Timecode::from_millis(ms as u64);

            // Later bursts run out of material; only the first one must fit.
            if i > 0 && store.get(current)?.length <= slice {
                debug!(segment = %target, iteration = i, "Stutter-plus out of material");
                break;
            }
            let burst = stutter_once(store, current, slice, repeats, variance, rng)?;
            produced.extend(burst.copies);
            current = burst.remainder;
        }

        debug!(
            segment = %target,
            iterations,
            copies = produced.len(),
            "Stutter-plus applied"
        );
        Ok(produced)
    }
}
