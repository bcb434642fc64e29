//! Tracks and their ordered segment sequences.

use glitch_timecode::Timecode;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::host::HostEdit;
use crate::segment::{Segment, SegmentId, TrackId};

/// Type of content a track holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackType {
    Video,
    Audio,
}

/// A single track: segments sorted by start, never overlapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub track_type: TrackType,
    pub selected: bool,
    segments: Vec<Segment>,
}

impl Track {
    pub fn new(id: TrackId, name: &str, track_type: TrackType) -> Self {
        Self {
            id,
            name: name.into(),
            track_type,
            selected: false,
            segments: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Mutable access for attribute changes that cannot move a segment.
    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End of the last segment.
    pub fn duration(&self) -> Timecode {
        self.segments
            .last()
            .map(Segment::end)
            .unwrap_or(Timecode::ZERO)
    }

    /// Sum of segment lengths, gaps excluded.
    pub fn material(&self) -> Timecode {
        self.segments.iter().map(|s| s.length).sum()
    }

    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn position_of(&self, id: SegmentId) -> Option<usize> {
        self.segments.iter().position(|s| s.id == id)
    }

    /// Segment covering `position`, if any.
    pub fn segment_at(&self, position: Timecode) -> Option<&Segment> {
        let idx = self.segments.partition_point(|s| s.start <= position);
        idx.checked_sub(1)
            .map(|i| &self.segments[i])
            .filter(|s| s.contains(position))
    }

    /// Segments intersecting `[start, end)`, in timeline order.
    pub fn segments_in(&self, start: Timecode, end: Timecode) -> Vec<&Segment> {
        self.segments
            .iter()
            .skip_while(|s| s.end() <= start)
            .take_while(|s| s.start < end)
            .collect()
    }

    /// Check ordering, overlap and length invariants.
    pub fn validate(&self) -> Result<()> {
        for seg in &self.segments {
            seg.validate()?;
        }
        for pair in self.segments.windows(2) {
            if pair[1].start < pair[0].end() {
                return Err(Error::Overlap {
                    start: pair[1].start,
                    end: pair[1].end(),
                    existing: pair[0].id,
                });
            }
        }
        Ok(())
    }

    /// Apply one host edit, keeping the track's invariants.
    pub(crate) fn apply(&mut self, edit: &HostEdit) -> Result<()> {
        match edit {
            HostEdit::Insert { segment, .. } => {
                segment.validate()?;
                if self.get(segment.id).is_some() {
                    return Err(Error::AlreadyTracked { id: segment.id });
                }
                self.check_free(segment, None)?;
                let mut segment = segment.clone();
                segment.track = self.id;
                let idx = self.segments.partition_point(|s| s.start <= segment.start);
                self.segments.insert(idx, segment);
            }
            HostEdit::Update { segment, .. } => {
                segment.validate()?;
                let idx = self
                    .position_of(segment.id)
                    .ok_or(Error::NotFound { id: segment.id })?;
                self.check_free(segment, Some(segment.id))?;
                let mut segment = segment.clone();
                segment.track = self.id;
                self.segments[idx] = segment;
                self.segments.sort_by_key(|s| s.start);
            }
            HostEdit::Remove { id, .. } => {
                let idx = self.position_of(*id).ok_or(Error::NotFound { id: *id })?;
                self.segments.remove(idx);
            }
        }
        Ok(())
    }

    fn check_free(&self, segment: &Segment, ignore: Option<SegmentId>) -> Result<()> {
        let end = segment.end();
        match self
            .segments
            .iter()
            .find(|s| Some(s.id) != ignore && s.overlaps(segment.start, end))
        {
            Some(existing) => Err(Error::Overlap {
                start: segment.start,
                end,
                existing: existing.id,
            }),
            None => Ok(()),
        }
    }
}
