//! Shared fixtures for compositor tests.

use glitch_edit::{MemoryProject, SegmentId, SegmentStore, TrackId, TrackType};
use glitch_timecode::Timecode;

/// A project with one video track holding one `len_ms` segment at zero.
pub fn single_segment(len_ms: u64) -> (MemoryProject, TrackId, SegmentId) {
    let mut project = MemoryProject::new();
    let v1 = project.add_track("V1", TrackType::Video);
    let id = project
        .add_segment(v1, "clip.mp4", Timecode::ZERO, Timecode::from_millis(len_ms))
        .unwrap();
    (project, v1, id)
}

/// `(start_ms, length_ms)` of every segment on `track`.
pub fn layout(store: &SegmentStore<'_>, track: TrackId) -> Vec<(u64, u64)> {
    store
        .track(track)
        .unwrap()
        .segments()
        .iter()
        .map(|s| (s.start.to_millis(), s.length.to_millis()))
        .collect()
}
