//! The segment store.
//!
//! [`SegmentStore`] mirrors every host track in memory for the duration of a
//! run and is the only path through which segments change. Each public
//! operation validates against the mirror first, then forwards a sequence of
//! [`HostEdit`]s to the host and applies the same edits to the mirror, so the
//! two never disagree about which edits happened.
//!
//! Operations are all-or-nothing. When the host rejects an edit partway
//! through an operation, the edits already accepted are undone on both sides
//! in reverse order. [`SegmentStore::atomically`] extends the same guarantee
//! to a caller-defined group of operations.

use std::collections::HashMap;

use glitch_timecode::Timecode;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::host::{HostEdit, HostProject};
use crate::ops::EditOp;
use crate::segment::{Segment, SegmentId, TrackId};
use crate::track::Track;

/// How an insert treats material already on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// Push later material forward by the inserted length.
    #[default]
    Ripple,
    /// Fail with [`Error::Overlap`] if the range is occupied.
    Strict,
    /// Replace whatever the inserted range covers.
    Overwrite,
}

/// Store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Mode used by [`SegmentStore::insert_at`].
    #[serde(default)]
    pub default_mode: InsertMode,
}

/// Which half of a split keeps the original id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keep {
    Left,
    Right,
}

/// In-memory mirror of the host's tracks with host-forwarding edits.
pub struct SegmentStore<'a> {
    host: &'a mut dyn HostProject,
    config: StoreConfig,
    tracks: Vec<Track>,
    index: HashMap<SegmentId, TrackId>,
    history: Vec<EditOp>,
    /// Inverses of the edits applied inside the open atomic scope.
    undo: Vec<HostEdit>,
}

impl<'a> SegmentStore<'a> {
    /// Load every host track with the default configuration.
    pub fn open(host: &'a mut dyn HostProject) -> Result<Self> {
        Self::with_config(host, StoreConfig::default())
    }

    /// Load every host track.
    pub fn with_config(host: &'a mut dyn HostProject, config: StoreConfig) -> Result<Self> {
        let count = host.track_count();
        let mut tracks = Vec::with_capacity(count);
        let mut index = HashMap::new();
        for i in 0..count {
            let mut track = host.track(TrackId(i))?;
            track.id = TrackId(i);
            track.validate()?;
            for seg in track.segments() {
                if index.insert(seg.id, track.id).is_some() {
                    return Err(Error::AlreadyTracked { id: seg.id });
                }
            }
            tracks.push(track);
        }
        trace!(tracks = tracks.len(), segments = index.len(), "Segment store opened");
        Ok(Self {
            host,
            config,
            tracks,
            index,
            history: Vec::new(),
            undo: Vec::new(),
        })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Result<&Track> {
        self.tracks
            .get(id.0)
            .ok_or(Error::TrackNotFound { track: id })
    }

    pub fn contains(&self, id: SegmentId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: SegmentId) -> Result<&Segment> {
        let track = self.index.get(&id).ok_or(Error::NotFound { id })?;
        self.track(*track)?.get(id).ok_or(Error::NotFound { id })
    }

    /// Segment covering `position` on `track`.
    pub fn segment_at(&self, track: TrackId, position: Timecode) -> Result<Option<&Segment>> {
        Ok(self.track(track)?.segment_at(position))
    }

    /// Segments on `track` intersecting `[start, end)`.
    pub fn segments_in(
        &self,
        track: TrackId,
        start: Timecode,
        end: Timecode,
    ) -> Result<Vec<&Segment>> {
        Ok(self.track(track)?.segments_in(start, end))
    }

    /// Primitive operations applied so far, in order.
    pub fn history(&self) -> &[EditOp] {
        &self.history
    }

    pub(crate) fn record(&mut self, op: EditOp) {
        self.history.push(op);
    }

    /// Reserve a fresh id from the host.
    pub fn allocate_id(&mut self) -> SegmentId {
        self.host.allocate_segment_id()
    }

    /// Run `op` as one unit: if it fails, every edit it made is undone on the
    /// host and the mirror, and its history entries are dropped.
    ///
    /// Scopes nest; an inner failure only undoes the inner scope.
    pub fn atomically<T, E>(
        &mut self,
        op: impl FnOnce(&mut Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let undo_mark = self.undo.len();
        let history_mark = self.history.len();
        let outcome = op(self);
        if outcome.is_err() {
            self.rollback(undo_mark);
            self.history.truncate(history_mark);
        }
        if undo_mark == 0 {
            self.undo.clear();
        }
        outcome
    }

    /// Cut a segment in two at `at`, which must lie strictly inside it.
    ///
    /// The left piece keeps the original id.
    pub fn split(&mut self, id: SegmentId, at: Timecode) -> Result<(Segment, Segment)> {
        let pieces = self.split_keeping(id, at, Keep::Left)?;
        self.history.push(EditOp::Split { segment: id, at });
        Ok(pieces)
    }

    fn split_keeping(
        &mut self,
        id: SegmentId,
        at: Timecode,
        keep: Keep,
    ) -> Result<(Segment, Segment)> {
        let seg = self.get(id)?.clone();
        if at <= seg.start || at >= seg.end() {
            return Err(Error::OutOfRange {
                position: at,
                start: seg.start,
                end: seg.end(),
            });
        }
        let fresh = self.allocate_id();
        let (left_id, right_id) = match keep {
            Keep::Left => (id, fresh),
            Keep::Right => (fresh, id),
        };
        let (left, right) = seg.split_at(at, left_id, right_id)?;
        let track = seg.track;
        // The kept piece shrinks first so the new piece always lands in free space.
        let edits = match keep {
            Keep::Left => vec![
                HostEdit::Update {
                    track,
                    segment: left.clone(),
                },
                HostEdit::Insert {
                    track,
                    segment: right.clone(),
                },
            ],
            Keep::Right => vec![
                HostEdit::Update {
                    track,
                    segment: right.clone(),
                },
                HostEdit::Insert {
                    track,
                    segment: left.clone(),
                },
            ],
        };
        self.commit(edits)?;
        trace!(segment = %id, at = %at, left = %left.id, right = %right.id, "Split");
        Ok((left, right))
    }

    /// Cut `[start, end)` out of a segment and return it freestanding.
    ///
    /// The original id stays on the left remainder if there is one, otherwise
    /// on the right remainder, otherwise it travels with the slice.
    pub fn extract_slice(
        &mut self,
        id: SegmentId,
        start: Timecode,
        end: Timecode,
    ) -> Result<Segment> {
        self.atomically(|store| store.extract(id, start, end))
    }

    fn extract(&mut self, id: SegmentId, start: Timecode, end: Timecode) -> Result<Segment> {
        let seg = self.get(id)?.clone();
        if start < seg.start || start >= end {
            return Err(Error::OutOfRange {
                position: start,
                start: seg.start,
                end: seg.end(),
            });
        }
        if end > seg.end() {
            return Err(Error::OutOfRange {
                position: end,
                start: seg.start,
                end: seg.end(),
            });
        }

        let mut middle = id;
        if start > seg.start {
            let (_, right) = self.split_keeping(id, start, Keep::Left)?;
            middle = right.id;
        }
        if end < seg.end() {
            let keep = if middle == id { Keep::Right } else { Keep::Left };
            let (left, _) = self.split_keeping(middle, end, keep)?;
            middle = left.id;
        }

        let slice = self.get(middle)?.clone();
        self.commit(vec![HostEdit::Remove {
            track: slice.track,
            id: middle,
        }])?;
        self.history.push(EditOp::Extract {
            segment: id,
            start,
            end,
            slice: middle,
        });
        trace!(segment = %id, slice = %middle, start = %start, end = %end, "Extracted slice");
        Ok(slice)
    }

    /// Place a freestanding segment on `track` at `position` using the
    /// configured default mode.
    pub fn insert_at(
        &mut self,
        track: TrackId,
        segment: Segment,
        position: Timecode,
    ) -> Result<Segment> {
        let mode = self.config.default_mode;
        self.insert_at_with(track, segment, position, mode)
    }

    /// Place a freestanding segment on `track` at `position`.
    pub fn insert_at_with(
        &mut self,
        track: TrackId,
        segment: Segment,
        position: Timecode,
        mode: InsertMode,
    ) -> Result<Segment> {
        self.atomically(|store| store.place(track, segment, position, mode))
    }

    fn place(
        &mut self,
        track: TrackId,
        segment: Segment,
        position: Timecode,
        mode: InsertMode,
    ) -> Result<Segment> {
        self.track(track)?;
        if self.contains(segment.id) {
            return Err(Error::AlreadyTracked { id: segment.id });
        }
        let mut segment = segment;
        segment.track = track;
        segment.start = position;
        segment.validate()?;
        let length = segment.length;
        let end = position.checked_add(length)?;

        match mode {
            InsertMode::Strict => {
                if let Some(existing) = self.track(track)?.segments_in(position, end).first() {
                    return Err(Error::Overlap {
                        start: position,
                        end,
                        existing: existing.id,
                    });
                }
            }
            InsertMode::Ripple => self.make_room(track, position, length)?,
            InsertMode::Overwrite => self.clear_range(track, position, end)?,
        }

        let id = segment.id;
        self.commit(vec![HostEdit::Insert {
            track,
            segment: segment.clone(),
        }])?;
        self.history.push(EditOp::Insert {
            segment: id,
            track,
            position,
            mode,
        });
        trace!(segment = %id, track = %track, position = %position, mode = ?mode, "Inserted");
        Ok(segment)
    }

    /// Shift everything at or after `position` forward by `length`, cutting a
    /// segment that straddles `position`.
    fn make_room(&mut self, track: TrackId, position: Timecode, length: Timecode) -> Result<()> {
        let straddler = self
            .track(track)?
            .segment_at(position)
            .filter(|s| s.start < position)
            .map(|s| s.id);
        if let Some(id) = straddler {
            self.split_keeping(id, position, Keep::Left)?;
        }

        // Move the last segment first so no move lands on a neighbour.
        let later: Vec<Segment> = self
            .track(track)?
            .segments()
            .iter()
            .filter(|s| s.start >= position)
            .rev()
            .cloned()
            .collect();
        let mut edits = Vec::with_capacity(later.len());
        for mut seg in later {
            seg.start = seg.start.checked_add(length)?;
            edits.push(HostEdit::Update {
                track,
                segment: seg,
            });
        }
        self.commit(edits)
    }

    /// Remove all material inside `[start, end)`, trimming partial overlaps.
    fn clear_range(&mut self, track: TrackId, start: Timecode, end: Timecode) -> Result<()> {
        let covered: Vec<SegmentId> = self
            .track(track)?
            .segments_in(start, end)
            .iter()
            .map(|s| s.id)
            .collect();
        for id in covered {
            let seg = self.get(id)?.clone();
            let mut target = id;
            if seg.start < start {
                let (_, right) = self.split_keeping(id, start, Keep::Left)?;
                target = right.id;
            }
            if self.get(target)?.end() > end {
                self.split_keeping(target, end, Keep::Left)?;
            }
            self.commit(vec![HostEdit::Remove { track, id: target }])?;
        }
        Ok(())
    }

    /// Delete a segment from its track.
    pub fn remove(&mut self, id: SegmentId) -> Result<Segment> {
        let seg = self.get(id)?.clone();
        self.commit(vec![HostEdit::Remove {
            track: seg.track,
            id,
        }])?;
        self.history.push(EditOp::Remove { segment: id });
        trace!(segment = %id, "Removed");
        Ok(seg)
    }

    /// Toggle playback direction on every take of a segment.
    pub fn reverse_in_place(&mut self, id: SegmentId) -> Result<Segment> {
        let mut seg = self.get(id)?.clone();
        for take in &mut seg.takes {
            take.reversed = !take.reversed;
        }
        self.commit(vec![HostEdit::Update {
            track: seg.track,
            segment: seg.clone(),
        }])?;
        self.history.push(EditOp::Reverse { segment: id });
        trace!(segment = %id, reversed = seg.is_reversed(), "Reversed");
        Ok(seg)
    }

    /// Set the playback pitch factor of a segment.
    pub fn set_pitch(&mut self, id: SegmentId, factor: f64) -> Result<Segment> {
        let mut seg = self.get(id)?.clone();
        seg.pitch = factor;
        self.commit(vec![HostEdit::Update {
            track: seg.track,
            segment: seg.clone(),
        }])?;
        self.history.push(EditOp::Pitch { segment: id, factor });
        Ok(seg)
    }

    /// Forward edits to the host and mirror them. Nothing stays applied
    /// when one is rejected.
    fn commit(&mut self, edits: Vec<HostEdit>) -> Result<()> {
        self.atomically(|store| -> Result<()> {
            for edit in edits {
                let inverse = store.inverse(&edit)?;
                store.host.apply(&edit)?;
                if let Err(err) = store.mirror(&edit) {
                    // The host took this one; the scope's undo log does not have it yet.
                    if let Err(undo_err) = store.host.apply(&inverse) {
                        warn!(error = %undo_err, "Host kept an edit the mirror rejected");
                    }
                    return Err(err);
                }
                store.undo.push(inverse);
            }
            Ok(())
        })
    }

    /// The edit restoring what `edit` is about to change.
    fn inverse(&self, edit: &HostEdit) -> Result<HostEdit> {
        Ok(match edit {
            HostEdit::Insert { track, segment } => HostEdit::Remove {
                track: *track,
                id: segment.id,
            },
            HostEdit::Update { track, segment } => HostEdit::Update {
                track: *track,
                segment: self.get(segment.id)?.clone(),
            },
            HostEdit::Remove { track, id } => HostEdit::Insert {
                track: *track,
                segment: self.get(*id)?.clone(),
            },
        })
    }

    /// Apply an edit the host already accepted to the mirror and the index.
    fn mirror(&mut self, edit: &HostEdit) -> Result<()> {
        let track = edit.track();
        self.tracks
            .get_mut(track.0)
            .ok_or(Error::TrackNotFound { track })?
            .apply(edit)?;
        match edit {
            HostEdit::Insert { segment, .. } => {
                self.index.insert(segment.id, track);
            }
            HostEdit::Remove { id, .. } => {
                self.index.remove(id);
            }
            HostEdit::Update { .. } => {}
        }
        Ok(())
    }

    /// Undo every logged edit past `mark`, newest first.
    fn rollback(&mut self, mark: usize) {
        let undo = self.undo.split_off(mark);
        let count = undo.len();
        for edit in undo.into_iter().rev() {
            let restored = match self.host.apply(&edit) {
                Ok(()) => self.mirror(&edit),
                Err(err) => Err(err),
            };
            if let Err(err) = restored {
                warn!(error = %err, "Rollback edit failed");
            }
        }
        if count > 0 {
            trace!(edits = count, "Rolled back");
        }
    }
}
