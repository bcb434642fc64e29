//! Sample drops picked from a folder the host can list.

use glitch_edit::{ops, InsertMode, MediaType, Segment, SegmentId, SegmentStore};
use glitch_timecode::Timecode;
use tracing::debug;

use crate::capability::{is_audio_file, Capabilities, SampleInfo};
use crate::compositor::Compositor;
use crate::config::{EffectKind, RandomSoundConfig, SpadinnerConfig};
use crate::error::Result;
use crate::random::RandomStream;

/// Pick one entry of `folder` accepted by `filter`. `None` when the folder is
/// unset or holds nothing usable; no value is drawn in that case.
fn pick_sample(
    folder: &str,
    filter: impl Fn(&SampleInfo) -> bool,
    rng: &mut RandomStream,
    caps: &mut dyn Capabilities,
) -> Result<Option<SampleInfo>> {
    if folder.is_empty() {
        return Ok(None);
    }
    let mut candidates: Vec<SampleInfo> = caps.list_samples(folder)?;
    candidates.retain(|s| filter(s));
    if candidates.is_empty() {
        return Ok(None);
    }
    let index = rng.index(candidates.len());
    Ok(Some(candidates.swap_remove(index)))
}

fn drop_sample(
    store: &mut SegmentStore<'_>,
    target: &Segment,
    sample: SampleInfo,
    media_type: MediaType,
    position: Timecode,
) -> Result<Segment> {
    let id = store.allocate_id();
    let segment = Segment::new(id, &sample.path, Timecode::ZERO, sample.length).media(media_type);
    Ok(ops::reinsert_at(
        store,
        target.track,
        segment,
        position,
        InsertMode::Ripple,
    )?)
}

impl Compositor for RandomSoundConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::RandomSound
    }

    /// Ripple a random audio file in at the segment start.
    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        rng: &mut RandomStream,
        caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        let seg = store.get(target)?.clone();
        let Some(sample) = pick_sample(&self.folder, |s| is_audio_file(&s.path), rng, caps)? else {
            debug!(segment = %target, folder = %self.folder, "No audio samples to insert");
            return Ok(Vec::new());
        };
        let placed = drop_sample(store, &seg, sample, MediaType::Audio, seg.start)?;
        debug!(segment = %target, sample = %placed.source(), "Random sound inserted");
        Ok(vec![placed])
    }
}

impl Compositor for SpadinnerConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::Spadinner
    }

    /// Ripple any random file in right after the segment.
    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        rng: &mut RandomStream,
        caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        let seg = store.get(target)?.clone();
        let Some(sample) = pick_sample(&self.folder, |_| true, rng, caps)? else {
            debug!(segment = %target, folder = %self.folder, "Nothing to insert");
            return Ok(Vec::new());
        };
        let media_type = if is_audio_file(&sample.path) {
            MediaType::Audio
        } else {
            MediaType::Both
        };
        let placed = drop_sample(store, &seg, sample, media_type, seg.end())?;
        debug!(segment = %target, sample = %placed.source(), "Spadinner inserted");
        Ok(vec![placed])
    }
}
