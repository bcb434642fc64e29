//! Scramble: chop, thin out and shuffle.

use glitch_edit::{ops, InsertMode, Segment, SegmentId, SegmentStore};
use glitch_timecode::Timecode;
use tracing::debug;

use crate::capability::Capabilities;
use crate::compositor::Compositor;
use crate::config::{EffectKind, ScrambleConfig};
use crate::error::{FxError, Result};
use crate::random::RandomStream;

impl Compositor for ScrambleConfig {
    fn kind(&self) -> EffectKind {
        EffectKind::Scramble
    }

    /// Cut the segment into `slice_ms` pieces, keep each with probability
    /// `density`, shuffle the survivors and lay them back end to end from
    /// the original start.
    ///
    /// Material past the last whole slice stays where it is. Dropped slices
    /// leave a gap at the end of the vacated range.
    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        rng: &mut RandomStream,
        _caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        if self.slice_ms == 0 {
            return Err(FxError::invalid_config("scramble", "slice_ms must be positive"));
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(FxError::invalid_config("scramble", "density must lie in [0, 1]"));
        }
        let seg = store.get(target)?.clone();
        let slice = Timecode::from_millis(self.slice_ms);
        let count = (seg.length.to_millis() / self.slice_ms).max(1);
        let keep: Vec<bool> = (0..count).map(|_| rng.next_f64() < self.density).collect();

        let mut kept = Vec::new();
        let mut current = Some(target);
        for retain in keep {
            let Some(id) = current else { break };
            let piece = store.get(id)?;
            let start = piece.start;
            let end = start.checked_add(slice)?.min(piece.end());
            let taken = ops::extract_slice(store, id, start, end)?;
            // The id rides with the slice once nothing is left behind it.
            current = (taken.id != id).then_some(id);
            if retain {
                kept.push(taken);
            }
        }
        let dropped = count as usize - kept.len();

        rng.shuffle(&mut kept);
        if !store.contains(target) && !kept.iter().any(|s| s.id == target) {
            if let Some(first) = kept.first_mut() {
                first.id = target;
            }
        }

        let mut position = seg.start;
        let mut placed = Vec::with_capacity(kept.len());
        for piece in kept {
            let piece = ops::reinsert_at(store, seg.track, piece, position, InsertMode::Strict)?;
            position = piece.end();
            placed.push(piece);
        }

        debug!(
            segment = %target,
            slices = count,
            kept = placed.len(),
            dropped,
            "Scramble applied"
        );
        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::NoCapabilities;
    use crate::test_util::{layout, single_segment};
    use pretty_assertions::assert_eq;

    fn scramble(len_ms: u64, config: ScrambleConfig, seed: u64) -> (Vec<(u64, u64)>, Vec<Segment>, bool) {
        let (mut project, v1, id) = single_segment(len_ms);
        let mut store = SegmentStore::open(&mut project).unwrap();
        let placed = config
            .apply(&mut store, id, &mut RandomStream::new(seed), &mut NoCapabilities)
            .unwrap();
        assert!(store.track(v1).unwrap().validate().is_ok());
        (layout(&store, v1), placed, store.contains(id))
    }

    #[test]
    fn test_full_density_keeps_everything() {
        let config = ScrambleConfig {
            slice_ms: 100,
            density: 1.0,
        };
        let (layout, placed, target_alive) = scramble(1_000, config, 4);
        assert_eq!(placed.len(), 10);
        let expected: Vec<(u64, u64)> = (0..10).map(|i| (i * 100, 100)).collect();
        assert_eq!(layout, expected);
        assert!(target_alive);

        let mut offsets: Vec<u64> = placed.iter().map(|s| s.takes[0].offset.to_millis()).collect();
        offsets.sort_unstable();
        assert_eq!(offsets, (0..10).map(|i| i * 100).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_density_drops_everything() {
        let config = ScrambleConfig {
            slice_ms: 100,
            density: 0.0,
        };
        let (layout, placed, target_alive) = scramble(1_000, config, 4);
        assert!(placed.is_empty());
        assert!(layout.is_empty());
        assert!(!target_alive);
    }

    #[test]
    fn test_partial_tail_stays() {
        let config = ScrambleConfig {
            slice_ms: 100,
            density: 1.0,
        };
        let (layout, placed, _) = scramble(250, config, 8);
        assert_eq!(placed.len(), 2);
        assert_eq!(layout, vec![(0, 100), (100, 100), (200, 50)]);
    }

    #[test]
    fn test_short_segment_is_one_slice() {
        let config = ScrambleConfig {
            slice_ms: 100,
            density: 1.0,
        };
        let (layout, placed, target_alive) = scramble(60, config, 1);
        assert_eq!(placed.len(), 1);
        assert_eq!(layout, vec![(0, 60)]);
        assert!(target_alive);
    }

    #[test]
    fn test_survivors_are_packed_from_start() {
        let config = ScrambleConfig {
            slice_ms: 100,
            density: 0.5,
        };
        let (layout, placed, _) = scramble(2_000, config, 21);
        let total: u64 = layout.iter().map(|(_, len)| len).sum();
        assert_eq!(total, placed.len() as u64 * 100);
        for (i, (start, _)) in layout.iter().enumerate() {
            assert_eq!(*start, i as u64 * 100);
        }
    }

    #[test]
    fn test_same_seed_same_order() {
        let config = ScrambleConfig {
            slice_ms: 50,
            density: 0.8,
        };
        let offsets = |seed| {
            scramble(1_000, config.clone(), seed)
                .1
                .iter()
                .map(|s| s.takes[0].offset.to_millis())
                .collect::<Vec<_>>()
        };
        assert_eq!(offsets(77), offsets(77));
    }

    #[test]
    fn test_bad_parameters_rejected() {
        let (mut project, v1, id) = single_segment(1_000);
        let mut store = SegmentStore::open(&mut project).unwrap();
        for config in [
            ScrambleConfig {
                slice_ms: 0,
                density: 1.0,
            },
            ScrambleConfig {
                slice_ms: 100,
                density: 1.5,
            },
            ScrambleConfig {
                slice_ms: 100,
                density: f64::NAN,
            },
        ] {
            let mut rng = RandomStream::new(2);
            assert!(matches!(
                config.apply(&mut store, id, &mut rng, &mut NoCapabilities),
                Err(FxError::InvalidConfig { .. })
            ));
            assert_eq!(rng.draws(), 0);
        }
        assert_eq!(layout(&store, v1), vec![(0, 1_000)]);
    }
}
