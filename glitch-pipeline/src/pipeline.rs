//! The transformation pipeline.
//!
//! A run applies every enabled effect, in declared order, to every target
//! segment inside exactly one host transaction. Effect failures are recorded
//! per segment and never stop the batch; only transaction failures, a store
//! that cannot load, or invalid effect parameters end a run early.

use glitch_edit::{HostProject, SegmentId, SegmentStore, StoreConfig, TransactionBoundary};
use glitch_fx::{sort_declared, Capabilities, Compositor, EffectConfig, EffectKind, RandomStream};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};

/// Pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PipelineState {
    /// No run started yet.
    Idle,
    /// Host transaction opened, store not loaded yet.
    TransactionOpen,
    /// Applying effects to targets.
    Processing,
    /// Host transaction closed; the last run is over.
    TransactionClosed,
}

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Undo label shown by the host.
    pub label: String,
    /// Seed for the run's random stream.
    pub seed: u64,
    /// Segment store settings.
    pub store: StoreConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Apply glitch effects".into(),
            seed: 0,
            store: StoreConfig::default(),
        }
    }
}

/// One effect that failed on one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentFailure {
    pub segment: SegmentId,
    pub effect: EffectKind,
    pub message: String,
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Targets visited.
    pub segments_processed: usize,
    /// Targets with at least one failed effect.
    pub segments_failed: usize,
    /// Segments created by effects.
    pub produced: usize,
    /// Primitive edits applied through the store.
    pub edits: usize,
    pub failures: Vec<SegmentFailure>,
}

impl PipelineSummary {
    /// Whether every effect succeeded on every target.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies effects to batches of segments.
pub struct Pipeline {
    config: PipelineConfig,
    effects: Vec<EffectConfig>,
    state: PipelineState,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Pipeline {
    /// Create a pipeline with no effects.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            effects: Vec::new(),
            state: PipelineState::Idle,
        }
    }

    /// Enable one more effect.
    pub fn with_effect(mut self, effect: EffectConfig) -> Self {
        self.add_effect(effect);
        self
    }

    /// Enable several effects.
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = EffectConfig>) -> Self {
        for effect in effects {
            self.add_effect(effect);
        }
        self
    }

    /// Enable an effect, keeping the list in declared order.
    pub fn add_effect(&mut self, effect: EffectConfig) {
        self.effects.push(effect);
        sort_declared(&mut self.effects);
    }

    /// Enabled effects in application order.
    pub fn effects(&self) -> &[EffectConfig] {
        &self.effects
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Apply every enabled effect to every target inside one transaction.
    ///
    /// The transaction is closed exactly once whenever it was opened, also
    /// when the store fails to load. A close failure wins over any other
    /// error.
    pub fn run<H>(
        &mut self,
        host: &mut H,
        targets: &[SegmentId],
        caps: &mut dyn Capabilities,
    ) -> Result<PipelineSummary>
    where
        H: HostProject + TransactionBoundary,
    {
        if targets.is_empty() {
            return Err(PipelineError::NoTargets);
        }
        for effect in &self.effects {
            effect.validate()?;
        }

        let label = self.config.label.clone();
        host.begin_transaction(&label)
            .map_err(|e| PipelineError::transaction(&label, e))?;
        self.state = PipelineState::TransactionOpen;
        info!(
            label = %label,
            targets = targets.len(),
            effects = self.effects.len(),
            seed = self.config.seed,
            "Transaction opened"
        );

        let outcome = self.process(host, targets, caps);

        let closed = host.end_transaction(&label);
        self.state = PipelineState::TransactionClosed;
        closed.map_err(|e| PipelineError::transaction(&label, e))?;

        let summary = outcome?;
        info!(
            label = %label,
            processed = summary.segments_processed,
            failed = summary.segments_failed,
            produced = summary.produced,
            "Transaction closed"
        );
        Ok(summary)
    }

    fn process<H: HostProject>(
        &mut self,
        host: &mut H,
        targets: &[SegmentId],
        caps: &mut dyn Capabilities,
    ) -> Result<PipelineSummary> {
        let mut store = SegmentStore::with_config(host, self.config.store.clone())?;
        self.state = PipelineState::Processing;
        let mut rng = RandomStream::new(self.config.seed);
        let mut summary = PipelineSummary::default();

        for &target in targets {
            summary.segments_processed += 1;
            let mut failed = false;
            for effect in &self.effects {
                // A failed effect leaves the timeline as it found it.
                let outcome = store
                    .atomically(|store| effect.apply(store, target, &mut rng, &mut *caps));
                match outcome {
                    Ok(produced) => {
                        debug!(
                            segment = %target,
                            effect = %effect.kind(),
                            produced = produced.len(),
                            "Effect applied"
                        );
                        summary.produced += produced.len();
                    }
                    Err(err) => {
                        warn!(segment = %target, effect = %effect.kind(), error = %err, "Effect failed");
                        summary.failures.push(SegmentFailure {
                            segment: target,
                            effect: effect.kind(),
                            message: err.to_string(),
                        });
                        failed = true;
                    }
                }
            }
            if failed {
                summary.segments_failed += 1;
            }
        }

        summary.edits = store.history().len();
        debug!(draws = rng.draws(), edits = summary.edits, "Batch processed");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glitch_edit::{MemoryProject, TrackType, TransactionEvent};
    use glitch_fx::{NoCapabilities, StutterConfig};
    use glitch_timecode::Timecode;
    use pretty_assertions::assert_eq;

    fn project(len_ms: u64) -> (MemoryProject, SegmentId) {
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let id = project
            .add_segment(v1, "clip.mp4", Timecode::ZERO, Timecode::from_millis(len_ms))
            .unwrap();
        (project, id)
    }

    #[test]
    fn test_effects_sorted() {
        let pipeline = Pipeline::default()
            .with_effect(EffectConfig::default_for(EffectKind::Reverse))
            .with_effect(EffectConfig::default_for(EffectKind::Stutter));
        let kinds: Vec<EffectKind> = pipeline.effects().iter().map(EffectConfig::kind).collect();
        assert_eq!(kinds, vec![EffectKind::Stutter, EffectKind::Reverse]);
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[test]
    fn test_no_targets_opens_nothing() {
        let (mut project, _) = project(500);
        let mut pipeline = Pipeline::default();
        let err = pipeline.run(&mut project, &[], &mut NoCapabilities).unwrap_err();
        assert!(matches!(err, PipelineError::NoTargets));
        assert!(project.transactions().is_empty());
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[test]
    fn test_invalid_effect_rejected_before_transaction() {
        let (mut project, id) = project(500);
        let mut pipeline = Pipeline::default().with_effect(EffectConfig::Stutter(StutterConfig {
            slice_ms: 0,
            ..StutterConfig::default()
        }));
        let err = pipeline.run(&mut project, &[id], &mut NoCapabilities).unwrap_err();
        assert!(matches!(err, PipelineError::Fx(_)));
        assert!(project.transactions().is_empty());
    }

    #[test]
    fn test_run_brackets_transaction() {
        let (mut project, id) = project(1_000);
        let mut pipeline = Pipeline::new(PipelineConfig {
            label: "fx".into(),
            ..PipelineConfig::default()
        })
        .with_effect(EffectConfig::default_for(EffectKind::Reverse));
        let summary = pipeline.run(&mut project, &[id], &mut NoCapabilities).unwrap();
        assert!(summary.is_clean());
        assert_eq!(summary.segments_processed, 1);
        assert_eq!(summary.edits, 1);
        assert_eq!(pipeline.state(), PipelineState::TransactionClosed);
        assert_eq!(
            project.transactions(),
            &[
                TransactionEvent::Begin("fx".into()),
                TransactionEvent::End("fx".into())
            ]
        );
    }

    #[test]
    fn test_begin_failure_is_fatal() {
        let (mut project, id) = project(1_000);
        project.fail_transactions(true, false);
        let mut pipeline = Pipeline::default().with_effect(EffectConfig::default_for(EffectKind::Reverse));
        let err = pipeline.run(&mut project, &[id], &mut NoCapabilities).unwrap_err();
        assert!(matches!(err, PipelineError::Transaction { .. }));
        assert!(project.journal().is_empty());
    }
}
