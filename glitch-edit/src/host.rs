//! Host project boundary.
//!
//! The engine never owns the project. It reads tracks through
//! [`HostProject`], writes back exclusively through [`HostEdit`]s, and
//! brackets a batch of edits with a [`TransactionBoundary`] so the host can
//! record one undo step. [`MemoryProject`] is a complete in-memory host used
//! for tests and for embedding the engine without an editor.

use glitch_timecode::Timecode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::segment::{Segment, SegmentId, TrackId};
use crate::track::{Track, TrackType};

/// A single mutation sent to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostEdit {
    /// Place a new segment.
    Insert { track: TrackId, segment: Segment },
    /// Replace an existing segment (same id) with new bounds or takes.
    Update { track: TrackId, segment: Segment },
    /// Delete a segment, leaving a gap.
    Remove { track: TrackId, id: SegmentId },
}

impl HostEdit {
    pub fn track(&self) -> TrackId {
        match self {
            Self::Insert { track, .. } | Self::Update { track, .. } | Self::Remove { track, .. } => {
                *track
            }
        }
    }
}

/// Read/write access to a host's tracks.
pub trait HostProject {
    /// Number of tracks in the project.
    fn track_count(&self) -> usize;

    /// Snapshot of one track.
    fn track(&self, id: TrackId) -> Result<Track>;

    /// Reserve an id for a segment about to be created.
    fn allocate_segment_id(&mut self) -> SegmentId;

    /// Apply one edit exactly as if the user had made it.
    fn apply(&mut self, edit: &HostEdit) -> Result<()>;
}

/// Undo grouping exposed by the host.
pub trait TransactionBoundary {
    fn begin_transaction(&mut self, label: &str) -> Result<()>;
    fn end_transaction(&mut self, label: &str) -> Result<()>;
}

/// Transaction bookkeeping recorded by [`MemoryProject`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionEvent {
    Begin(String),
    End(String),
}

/// In-memory host project.
#[derive(Debug, Clone, Default)]
pub struct MemoryProject {
    tracks: Vec<Track>,
    next_id: u64,
    journal: Vec<HostEdit>,
    transactions: Vec<TransactionEvent>,
    open_transaction: Option<String>,
    fail_begin: bool,
    fail_end: bool,
}

impl MemoryProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track and return its id.
    pub fn add_track(&mut self, name: &str, track_type: TrackType) -> TrackId {
        let id = TrackId(self.tracks.len());
        self.tracks.push(Track::new(id, name, track_type));
        id
    }

    /// Place a fresh segment of `source` on `track` without journaling.
    pub fn add_segment(
        &mut self,
        track: TrackId,
        source: &str,
        start: Timecode,
        length: Timecode,
    ) -> Result<SegmentId> {
        let id = self.allocate_segment_id();
        self.place(Segment::new(id, source, start, length).on_track(track))?;
        Ok(id)
    }

    /// Place a pre-built segment without journaling.
    pub fn place(&mut self, segment: Segment) -> Result<()> {
        self.next_id = self.next_id.max(segment.id.0 + 1);
        let track = segment.track;
        self.track_mut(track)?.apply(&HostEdit::Insert { track, segment })
    }

    pub fn select_segment(&mut self, id: SegmentId, selected: bool) -> Result<()> {
        let segment = self
            .tracks
            .iter_mut()
            .flat_map(|t| t.segments_mut())
            .find(|s| s.id == id)
            .ok_or(Error::NotFound { id })?;
        segment.selected = selected;
        Ok(())
    }

    pub fn select_track(&mut self, track: TrackId, selected: bool) -> Result<()> {
        self.track_mut(track)?.selected = selected;
        Ok(())
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn segments(&self, track: TrackId) -> Result<&[Segment]> {
        self.tracks
            .get(track.0)
            .map(Track::segments)
            .ok_or(Error::TrackNotFound { track })
    }

    /// Every edit applied through [`HostProject::apply`].
    pub fn journal(&self) -> &[HostEdit] {
        &self.journal
    }

    pub fn transactions(&self) -> &[TransactionEvent] {
        &self.transactions
    }

    pub fn in_transaction(&self) -> bool {
        self.open_transaction.is_some()
    }

    /// Make the next begin/end calls fail, to exercise error paths.
    pub fn fail_transactions(&mut self, begin: bool, end: bool) {
        self.fail_begin = begin;
        self.fail_end = end;
    }

    fn track_mut(&mut self, track: TrackId) -> Result<&mut Track> {
        self.tracks
            .get_mut(track.0)
            .ok_or(Error::TrackNotFound { track })
    }
}

impl HostProject for MemoryProject {
    fn track_count(&self) -> usize {
        self.tracks.len()
    }

    fn track(&self, id: TrackId) -> Result<Track> {
        self.tracks
            .get(id.0)
            .cloned()
            .ok_or(Error::TrackNotFound { track: id })
    }

    fn allocate_segment_id(&mut self) -> SegmentId {
        let id = SegmentId(self.next_id);
        self.next_id += 1;
        id
    }

    fn apply(&mut self, edit: &HostEdit) -> Result<()> {
        self.track_mut(edit.track())?.apply(edit)?;
        self.journal.push(edit.clone());
        Ok(())
    }
}

impl TransactionBoundary for MemoryProject {
    fn begin_transaction(&mut self, label: &str) -> Result<()> {
        if self.fail_begin {
            return Err(Error::transaction(label, "host refused to open transaction"));
        }
        if let Some(open) = &self.open_transaction {
            return Err(Error::transaction(
                label,
                format!("transaction '{}' is still open", open),
            ));
        }
        debug!(label, "Transaction opened");
        self.open_transaction = Some(label.into());
        self.transactions.push(TransactionEvent::Begin(label.into()));
        Ok(())
    }

    fn end_transaction(&mut self, label: &str) -> Result<()> {
        if self.fail_end {
            return Err(Error::transaction(label, "host refused to close transaction"));
        }
        match self.open_transaction.take() {
            Some(open) if open == label => {
                debug!(label, "Transaction closed");
                self.transactions.push(TransactionEvent::End(label.into()));
                Ok(())
            }
            other => {
                self.open_transaction = other;
                Err(Error::transaction(label, "no matching open transaction"))
            }
        }
    }
}
