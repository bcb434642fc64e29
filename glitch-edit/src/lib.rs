//! Segment store and editing primitives.
//!
//! Tracks are owned by a host project. This crate mirrors them in a
//! [`SegmentStore`] and offers the edits glitch effects are composed from:
//! split, slice extraction, duplication, reinsertion in ripple, strict or
//! overwrite mode, removal and reversal. Every edit is forwarded to the host
//! as a [`HostEdit`], so the host sees the same sequence a user would produce.
//!
//! # Example
//!
//! ```
//! use glitch_edit::{MemoryProject, SegmentStore, TrackType, ops};
//! use glitch_timecode::Timecode;
//!
//! let mut project = MemoryProject::new();
//! let v1 = project.add_track("V1", TrackType::Video);
//! let id = project
//!     .add_segment(v1, "clip.mp4", Timecode::ZERO, Timecode::from_millis(1_000))
//!     .unwrap();
//!
//! let mut store = SegmentStore::open(&mut project).unwrap();
//! let (left, right) = store.split(id, Timecode::from_millis(100)).unwrap();
//! assert_eq!(left.length + right.length, Timecode::from_millis(1_000));
//!
//! // Loop the first 100 ms twice, pushing the rest forward.
//! let copies = ops::repeat_after(&mut store, id, 2, Default::default(), |_, _| {}).unwrap();
//! assert_eq!(copies.len(), 2);
//! assert_eq!(store.get(right.id).unwrap().start, Timecode::from_millis(300));
//! ```

mod error;
mod segment;
mod track;
mod host;
mod store;
mod edl;

pub mod ops;

pub use error::{Error, Result};
pub use segment::{MediaRef, MediaType, Segment, SegmentId, Take, TrackId};
pub use track::{Track, TrackType};
pub use host::{HostEdit, HostProject, MemoryProject, TransactionBoundary, TransactionEvent};
pub use store::{InsertMode, SegmentStore, StoreConfig};
pub use ops::EditOp;
pub use edl::{EditDecisionList, EdlEntry, EdlFormat};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use glitch_timecode::Timecode;

    #[test]
    fn test_store_round_trip_through_host() {
        let mut project = MemoryProject::new();
        let a1 = project.add_track("A1", TrackType::Audio);
        let id = project
            .add_segment(a1, "loop.wav", Timecode::ZERO, Timecode::from_millis(400))
            .unwrap();
        {
            let mut store = SegmentStore::open(&mut project).unwrap();
            store.reverse_in_place(id).unwrap();
        }
        assert!(project.segments(a1).unwrap()[0].is_reversed());
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
