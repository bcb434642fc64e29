//! Effect primitives: stateless operations composed from store edits.

use glitch_timecode::Timecode;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;
use crate::segment::{Segment, SegmentId, TrackId};
use crate::store::{InsertMode, SegmentStore};

/// Primitive edits applied through a [`SegmentStore`], in application order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Cut a segment in two.
    Split { segment: SegmentId, at: Timecode },
    /// Cut a range out of a segment; `slice` is the id the range left with.
    Extract {
        segment: SegmentId,
        start: Timecode,
        end: Timecode,
        slice: SegmentId,
    },
    /// Freestanding copy of a tracked segment.
    Duplicate { source: SegmentId, copy: SegmentId },
    /// Place a freestanding segment.
    Insert {
        segment: SegmentId,
        track: TrackId,
        position: Timecode,
        mode: InsertMode,
    },
    /// Delete a segment.
    Remove { segment: SegmentId },
    /// Toggle playback direction.
    Reverse { segment: SegmentId },
    /// Change playback pitch.
    Pitch { segment: SegmentId, factor: f64 },
}

impl EditOp {
    /// The segment the operation was applied to.
    pub fn segment(&self) -> SegmentId {
        match self {
            Self::Split { segment, .. }
            | Self::Extract { segment, .. }
            | Self::Insert { segment, .. }
            | Self::Remove { segment }
            | Self::Reverse { segment }
            | Self::Pitch { segment, .. } => *segment,
            Self::Duplicate { source, .. } => *source,
        }
    }
}

/// Remove `[start, end)` from a tracked segment and return it freestanding.
pub fn extract_slice(
    store: &mut SegmentStore<'_>,
    id: SegmentId,
    start: Timecode,
    end: Timecode,
) -> Result<Segment> {
    store.extract_slice(id, start, end)
}

/// Freestanding copy of a tracked segment under a fresh id.
///
/// The copy keeps the position, takes and pitch of the original; nothing is
/// placed until it is reinserted.
pub fn duplicate(store: &mut SegmentStore<'_>, id: SegmentId) -> Result<Segment> {
    let mut copy = store.get(id)?.clone();
    copy.id = store.allocate_id();
    copy.selected = false;
    store.record(EditOp::Duplicate {
        source: id,
        copy: copy.id,
    });
    trace!(source = %id, copy = %copy.id, "Duplicated");
    Ok(copy)
}

/// Place a freestanding segment at `position` on `track`.
pub fn reinsert_at(
    store: &mut SegmentStore<'_>,
    track: TrackId,
    segment: Segment,
    position: Timecode,
    mode: InsertMode,
) -> Result<Segment> {
    store.insert_at_with(track, segment, position, mode)
}

/// Toggle the playback direction of every take of a segment.
pub fn reverse_in_place(store: &mut SegmentStore<'_>, id: SegmentId) -> Result<Segment> {
    store.reverse_in_place(id)
}

/// Lay `count` copies of a segment end to end directly after it.
///
/// `adjust` sees each copy (with its index) before it is placed, so callers
/// can vary per-copy attributes such as pitch. All copies land or none do.
pub fn repeat_after<F>(
    store: &mut SegmentStore<'_>,
    id: SegmentId,
    count: usize,
    mode: InsertMode,
    mut adjust: F,
) -> Result<Vec<Segment>>
where
    F: FnMut(usize, &mut Segment),
{
    store.atomically(|store| -> Result<Vec<Segment>> {
        let original = store.get(id)?.clone();
        let mut position = original.end();
        let mut placed = Vec::with_capacity(count);
        for i in 0..count {
            let mut copy = duplicate(store, id)?;
            adjust(i, &mut copy);
            let copy = reinsert_at(store, original.track, copy, position, mode)?;
            position = copy.end();
            placed.push(copy);
        }
        Ok(placed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryProject;
    use crate::track::TrackType;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Timecode {
        Timecode::from_millis(v)
    }

    #[test]
    fn test_duplicate_is_freestanding() {
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let id = project.add_segment(v1, "a.mp4", ms(0), ms(100)).unwrap();
        let mut store = SegmentStore::open(&mut project).unwrap();
        let copy = duplicate(&mut store, id).unwrap();
        assert_ne!(copy.id, id);
        assert_eq!(copy.length, ms(100));
        assert!(!store.contains(copy.id));
        assert_eq!(store.track(v1).unwrap().len(), 1);
    }

    #[test]
    fn test_repeat_after_ripples() {
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let id = project.add_segment(v1, "a.mp4", ms(0), ms(100)).unwrap();
        project.add_segment(v1, "b.mp4", ms(100), ms(50)).unwrap();
        let mut store = SegmentStore::open(&mut project).unwrap();
        let copies = repeat_after(&mut store, id, 3, InsertMode::Ripple, |i, seg| {
            seg.pitch = 1.0 + i as f64;
        })
        .unwrap();
        let starts: Vec<u64> = copies.iter().map(|s| s.start.to_millis()).collect();
        assert_eq!(starts, vec![100, 200, 300]);
        assert_eq!(copies[2].pitch, 3.0);
        let last = store.track(v1).unwrap().segments().last().unwrap().clone();
        assert_eq!(last.source(), "b.mp4");
        assert_eq!(last.start, ms(400));
    }

    #[test]
    fn test_repeat_after_strict_collides() {
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let id = project.add_segment(v1, "a.mp4", ms(0), ms(100)).unwrap();
        project.add_segment(v1, "b.mp4", ms(100), ms(50)).unwrap();
        let mut store = SegmentStore::open(&mut project).unwrap();
        assert!(repeat_after(&mut store, id, 1, InsertMode::Strict, |_, _| {}).is_err());
    }

    #[test]
    fn test_extract_then_reinsert_restores_layout() {
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let id = project.add_segment(v1, "a.mp4", ms(0), ms(300)).unwrap();
        let mut store = SegmentStore::open(&mut project).unwrap();
        let slice = extract_slice(&mut store, id, ms(100), ms(200)).unwrap();
        reinsert_at(&mut store, v1, slice, ms(100), InsertMode::Strict).unwrap();
        let track = store.track(v1).unwrap();
        assert_eq!(track.len(), 3);
        assert_eq!(track.material(), ms(300));
        assert!(track.validate().is_ok());
    }

    #[test]
    fn test_history_records_primitives() {
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let id = project.add_segment(v1, "a.mp4", ms(0), ms(300)).unwrap();
        let mut store = SegmentStore::open(&mut project).unwrap();
        reverse_in_place(&mut store, id).unwrap();
        duplicate(&mut store, id).unwrap();
        let ops: Vec<SegmentId> = store.history().iter().map(EditOp::segment).collect();
        assert_eq!(ops, vec![id, id]);
        assert!(matches!(store.history()[1], EditOp::Duplicate { .. }));
    }

    #[test]
    fn test_edit_op_serialization() {
        let op = EditOp::Insert {
            segment: SegmentId(4),
            track: TrackId(0),
            position: ms(10),
            mode: InsertMode::Overwrite,
        };
        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains("\"op\":\"insert\""));
        assert!(json.contains("\"overwrite\""));
        let back: EditOp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
    }
}
