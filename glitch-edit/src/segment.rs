//! Segments, takes and media references.

use std::fmt;

use glitch_timecode::Timecode;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identity of a segment, assigned by the host project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub u64);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a track in the host project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub usize);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Type of media a source provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Video,
    Audio,
    Both,
}

/// A reference to source media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub source: String,
    pub media_type: MediaType,
}

impl MediaRef {
    pub fn new(source: &str, media_type: MediaType) -> Self {
        Self {
            source: source.into(),
            media_type,
        }
    }
}

/// One take of a segment: which media plays, from where, in which direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Take {
    pub media: MediaRef,
    /// Start of the covered source range.
    pub offset: Timecode,
    pub reversed: bool,
}

impl Take {
    pub fn new(media: MediaRef) -> Self {
        Self {
            media,
            offset: Timecode::ZERO,
            reversed: false,
        }
    }

    /// Take covering `len` of timeline material starting `from` into a
    /// segment of length `total`.
    ///
    /// A reversed take plays its source range backwards, so the head of the
    /// timeline range maps to the tail of the source range.
    fn sub_range(&self, from: Timecode, len: Timecode, total: Timecode) -> Self {
        let offset = if self.reversed {
            self.offset + total.saturating_sub(from + len)
        } else {
            self.offset + from
        };
        Self {
            media: self.media.clone(),
            offset,
            reversed: self.reversed,
        }
    }
}

/// A bounded reference to media content placed on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub track: TrackId,
    pub start: Timecode,
    pub length: Timecode,
    /// The first take is the active one.
    pub takes: Vec<Take>,
    /// Playback pitch/rate factor interpreted by the host (1.0 = unchanged).
    pub pitch: f64,
    pub selected: bool,
}

impl Segment {
    pub fn new(id: SegmentId, source: &str, start: Timecode, length: Timecode) -> Self {
        Self {
            id,
            track: TrackId(0),
            start,
            length,
            takes: vec![Take::new(MediaRef::new(source, MediaType::Both))],
            pitch: 1.0,
            selected: false,
        }
    }

    /// Set the media type of the active take.
    pub fn media(mut self, media_type: MediaType) -> Self {
        if let Some(take) = self.takes.first_mut() {
            take.media.media_type = media_type;
        }
        self
    }

    /// Set the source offset of the active take.
    pub fn offset(mut self, offset: Timecode) -> Self {
        if let Some(take) = self.takes.first_mut() {
            take.offset = offset;
        }
        self
    }

    /// Add an alternate take.
    pub fn take(mut self, take: Take) -> Self {
        self.takes.push(take);
        self
    }

    pub fn on_track(mut self, track: TrackId) -> Self {
        self.track = track;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Exclusive end position.
    pub fn end(&self) -> Timecode {
        self.start + self.length
    }

    /// Whether `position` falls in `[start, end)`.
    pub fn contains(&self, position: Timecode) -> bool {
        self.start <= position && position < self.end()
    }

    /// Whether this segment intersects `[start, end)`.
    pub fn overlaps(&self, start: Timecode, end: Timecode) -> bool {
        self.start < end && start < self.end()
    }

    pub fn active_take(&self) -> Option<&Take> {
        self.takes.first()
    }

    pub fn source(&self) -> &str {
        self.active_take()
            .map(|t| t.media.source.as_str())
            .unwrap_or_default()
    }

    pub fn is_reversed(&self) -> bool {
        self.active_take().map(|t| t.reversed).unwrap_or(false)
    }

    /// Check the segment's own invariants.
    pub fn validate(&self) -> Result<()> {
        if self.length.is_zero() || self.takes.is_empty() {
            return Err(Error::InvalidLength { id: self.id });
        }
        self.start.checked_add(self.length)?;
        Ok(())
    }

    /// The part of this segment covering `len` starting `from` into it,
    /// re-identified as `id`. Source offsets of every take follow.
    pub(crate) fn sub_range(&self, id: SegmentId, from: Timecode, len: Timecode) -> Self {
        Self {
            id,
            track: self.track,
            start: self.start + from,
            length: len,
            takes: self
                .takes
                .iter()
                .map(|t| t.sub_range(from, len, self.length))
                .collect(),
            pitch: self.pitch,
            selected: self.selected,
        }
    }

    /// Cut at the absolute position `at`, which must lie strictly inside.
    pub(crate) fn split_at(
        &self,
        at: Timecode,
        left_id: SegmentId,
        right_id: SegmentId,
    ) -> Result<(Self, Self)> {
        if at <= self.start || at >= self.end() {
            return Err(Error::OutOfRange {
                position: at,
                start: self.start,
                end: self.end(),
            });
        }
        let head = at.checked_sub(self.start)?;
        let tail = self.length.checked_sub(head)?;
        Ok((
            self.sub_range(left_id, Timecode::ZERO, head),
            self.sub_range(right_id, head, tail),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Timecode {
        Timecode::from_millis(v)
    }

    #[test]
    fn test_segment_defaults() {
        let seg = Segment::new(SegmentId(1), "clip.mp4", ms(0), ms(500));
        assert_eq!(seg.pitch, 1.0);
        assert_eq!(seg.source(), "clip.mp4");
        assert!(!seg.is_reversed());
        assert_eq!(seg.end(), ms(500));
        assert!(seg.validate().is_ok());
    }

    #[test]
    fn test_zero_length_invalid() {
        let seg = Segment::new(SegmentId(1), "clip.mp4", ms(10), Timecode::ZERO);
        assert!(matches!(seg.validate(), Err(Error::InvalidLength { .. })));
    }

    #[test]
    fn test_contains_half_open() {
        let seg = Segment::new(SegmentId(1), "a.wav", ms(100), ms(100));
        assert!(seg.contains(ms(100)));
        assert!(seg.contains(ms(199)));
        assert!(!seg.contains(ms(200)));
        assert!(seg.overlaps(ms(150), ms(250)));
        assert!(!seg.overlaps(ms(200), ms(250)));
    }

    #[test]
    fn test_split_forward_offsets() {
        let seg = Segment::new(SegmentId(1), "a.wav", ms(100), ms(500)).offset(ms(1_000));
        let (left, right) = seg.split_at(ms(300), SegmentId(1), SegmentId(2)).unwrap();
        assert_eq!(left.start, ms(100));
        assert_eq!(left.length, ms(200));
        assert_eq!(right.start, ms(300));
        assert_eq!(right.length, ms(300));
        assert_eq!(left.takes[0].offset, ms(1_000));
        assert_eq!(right.takes[0].offset, ms(1_200));
    }

    #[test]
    fn test_split_reversed_offsets() {
        let mut seg = Segment::new(SegmentId(1), "a.wav", ms(0), ms(500)).offset(ms(1_000));
        seg.takes[0].reversed = true;
        let (left, right) = seg.split_at(ms(200), SegmentId(1), SegmentId(2)).unwrap();
        // Reversed: the first 200 ms on the timeline play source 1300..1500.
        assert_eq!(left.takes[0].offset, ms(1_300));
        assert_eq!(right.takes[0].offset, ms(1_000));
        assert!(left.is_reversed() && right.is_reversed());
    }

    #[test]
    fn test_split_at_boundary_fails() {
        let seg = Segment::new(SegmentId(1), "a.wav", ms(0), ms(500));
        assert!(matches!(
            seg.split_at(ms(500), SegmentId(1), SegmentId(2)),
            Err(Error::OutOfRange { .. })
        ));
        assert!(seg.split_at(ms(0), SegmentId(1), SegmentId(2)).is_err());
    }

    #[test]
    fn test_alternate_takes_follow_split() {
        let seg = Segment::new(SegmentId(1), "a.mp4", ms(0), ms(400))
            .take(Take::new(MediaRef::new("b.mp4", MediaType::Video)));
        let (left, right) = seg.split_at(ms(100), SegmentId(1), SegmentId(2)).unwrap();
        assert_eq!(left.takes.len(), 2);
        assert_eq!(right.takes[1].offset, ms(100));
        assert_eq!(right.takes[1].media.source, "b.mp4");
    }
}
