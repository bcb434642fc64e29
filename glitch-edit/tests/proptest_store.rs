//! Property-based tests for the segment store.
//!
//! Uses proptest to check that store edits conserve material and keep every
//! track sorted and free of overlaps.

use glitch_edit::{Error, InsertMode, MemoryProject, Segment, SegmentStore, TrackType};
use glitch_timecode::Timecode;
use proptest::prelude::*;

fn ms(v: u64) -> Timecode {
    Timecode::from_millis(v)
}

// =============================================================================
// Split
// =============================================================================

proptest! {
    /// Splitting strictly inside a segment conserves its length and start.
    #[test]
    fn split_conserves_length(start in 0u64..10_000, len in 2u64..5_000, cut in 1u64..5_000) {
        prop_assume!(cut < len);
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let id = project.add_segment(v1, "a.mp4", ms(start), ms(len)).unwrap();
        let mut store = SegmentStore::open(&mut project).unwrap();

        let (left, right) = store.split(id, ms(start + cut)).unwrap();

        prop_assert_eq!(left.start, ms(start));
        prop_assert_eq!(left.length + right.length, ms(len));
        prop_assert_eq!(left.end(), right.start);
        prop_assert!(store.track(v1).unwrap().validate().is_ok());
    }

    /// Splitting at or outside the boundaries fails without touching the track.
    #[test]
    fn split_outside_fails(len in 1u64..5_000, past in 0u64..100) {
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let id = project.add_segment(v1, "a.mp4", ms(100), ms(len)).unwrap();
        let mut store = SegmentStore::open(&mut project).unwrap();

        let at_end = store.split(id, ms(100 + len + past));
        prop_assert!(matches!(at_end, Err(Error::OutOfRange { .. })), "expected OutOfRange");
        prop_assert!(store.split(id, ms(100)).is_err());
        prop_assert_eq!(store.track(v1).unwrap().len(), 1);
    }
}

// =============================================================================
// Reverse
// =============================================================================

proptest! {
    /// Reversing twice restores the direction and never moves the segment.
    #[test]
    fn reverse_is_an_involution(start in 0u64..10_000, len in 1u64..5_000) {
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let id = project.add_segment(v1, "a.mp4", ms(start), ms(len)).unwrap();
        let mut store = SegmentStore::open(&mut project).unwrap();
        let before = store.get(id).unwrap().clone();

        store.reverse_in_place(id).unwrap();
        let after = store.reverse_in_place(id).unwrap();

        prop_assert_eq!(after, before);
    }
}

// =============================================================================
// Insert and extract
// =============================================================================

proptest! {
    /// Ripple inserts anywhere keep the track ordered and add exactly the
    /// inserted material.
    #[test]
    fn ripple_insert_keeps_order(
        lengths in prop::collection::vec(1u64..500, 1..8),
        inserts in prop::collection::vec((0u64..4_000, 1u64..300), 1..6),
    ) {
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let mut cursor = 0;
        for len in &lengths {
            project.add_segment(v1, "a.mp4", ms(cursor), ms(*len)).unwrap();
            cursor += len;
        }
        let mut store = SegmentStore::open(&mut project).unwrap();
        let mut expected = ms(cursor);

        for (position, len) in inserts {
            let id = store.allocate_id();
            let seg = Segment::new(id, "b.mp4", Timecode::ZERO, ms(len));
            store.insert_at_with(v1, seg, ms(position), InsertMode::Ripple).unwrap();
            expected = expected + ms(len);
        }

        let track = store.track(v1).unwrap();
        prop_assert!(track.validate().is_ok());
        prop_assert_eq!(track.material(), expected);
    }

    /// Extracting any sub-range removes exactly that much material and keeps
    /// the source offset of the slice.
    #[test]
    fn extract_removes_exact_range(len in 2u64..5_000, a in 0u64..5_000, b in 0u64..5_000) {
        let (lo, hi) = (a.min(b), a.max(b));
        prop_assume!(lo < hi && hi <= len);
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let id = project.add_segment(v1, "a.mp4", ms(0), ms(len)).unwrap();
        let mut store = SegmentStore::open(&mut project).unwrap();

        let slice = store.extract_slice(id, ms(lo), ms(hi)).unwrap();

        prop_assert_eq!(slice.length, ms(hi - lo));
        prop_assert_eq!(slice.takes[0].offset, ms(lo));
        prop_assert!(!store.contains(slice.id));
        let track = store.track(v1).unwrap();
        prop_assert_eq!(track.material(), ms(len - (hi - lo)));
        prop_assert!(track.validate().is_ok());
    }

    /// Overwrite inserts never change the track's end when they land inside it.
    #[test]
    fn overwrite_inside_preserves_extent(len in 100u64..5_000, at in 0u64..5_000, ins in 1u64..100) {
        prop_assume!(at + ins <= len);
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        project.add_segment(v1, "a.mp4", ms(0), ms(len)).unwrap();
        let mut store = SegmentStore::open(&mut project).unwrap();

        let id = store.allocate_id();
        let seg = Segment::new(id, "tone.wav", Timecode::ZERO, ms(ins));
        store.insert_at_with(v1, seg, ms(at), InsertMode::Overwrite).unwrap();

        let track = store.track(v1).unwrap();
        prop_assert_eq!(track.duration(), ms(len));
        prop_assert_eq!(track.material(), ms(len));
        prop_assert!(track.validate().is_ok());
    }
}

// =============================================================================
// Fixed examples
// =============================================================================

#[test]
fn split_on_boundary_is_out_of_range() {
    let mut project = MemoryProject::new();
    let v1 = project.add_track("V1", TrackType::Video);
    let id = project.add_segment(v1, "a.mp4", ms(0), ms(500)).unwrap();
    let mut store = SegmentStore::open(&mut project).unwrap();
    assert!(matches!(
        store.split(id, ms(500)),
        Err(Error::OutOfRange { .. })
    ));
}

#[test]
fn strict_insert_into_occupied_range_overlaps() {
    let mut project = MemoryProject::new();
    let v1 = project.add_track("V1", TrackType::Video);
    project.add_segment(v1, "a.mp4", ms(0), ms(200)).unwrap();
    let mut store = SegmentStore::open(&mut project).unwrap();
    let id = store.allocate_id();
    let seg = Segment::new(id, "b.mp4", Timecode::ZERO, ms(50));
    assert!(matches!(
        store.insert_at_with(v1, seg, ms(100), InsertMode::Strict),
        Err(Error::Overlap { .. })
    ));
}

#[test]
fn edits_are_mirrored_on_host() {
    let mut project = MemoryProject::new();
    let v1 = project.add_track("V1", TrackType::Video);
    let id = project.add_segment(v1, "a.mp4", ms(0), ms(1_000)).unwrap();
    let mirrored = {
        let mut store = SegmentStore::open(&mut project).unwrap();
        store.extract_slice(id, ms(200), ms(400)).unwrap();
        let id2 = store.allocate_id();
        let seg = Segment::new(id2, "b.mp4", Timecode::ZERO, ms(100));
        store.insert_at(v1, seg, ms(50)).unwrap();
        store.track(v1).unwrap().clone()
    };
    assert_eq!(project.segments(v1).unwrap(), mirrored.segments());
}
