//! Target selection and the single user-facing entry point.

use glitch_edit::{HostProject, SegmentId, TrackId, TransactionBoundary};
use glitch_fx::Capabilities;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::pipeline::{Pipeline, PipelineConfig, PipelineSummary};
use crate::settings::GlitchSettings;

/// Segments a run should process.
///
/// With `apply_to_all`, every segment of the first selected track (track 0
/// when none is selected). Otherwise every selected segment, track by track.
pub fn select_targets<H: HostProject + ?Sized>(host: &H, apply_to_all: bool) -> Result<Vec<SegmentId>> {
    let mut tracks = Vec::with_capacity(host.track_count());
    for i in 0..host.track_count() {
        tracks.push(host.track(TrackId(i))?);
    }

    let targets: Vec<SegmentId> = if apply_to_all {
        tracks
            .iter()
            .find(|t| t.selected)
            .or_else(|| tracks.first())
            .map(|t| t.segments().iter().map(|s| s.id).collect())
            .unwrap_or_default()
    } else {
        tracks
            .iter()
            .flat_map(|t| t.segments())
            .filter(|s| s.selected)
            .map(|s| s.id)
            .collect()
    };
    debug!(apply_to_all, targets = targets.len(), "Targets selected");
    Ok(targets)
}

/// Select targets from `settings` and run every enabled effect on them.
pub fn apply_settings<H>(
    host: &mut H,
    settings: &GlitchSettings,
    caps: &mut dyn Capabilities,
) -> Result<PipelineSummary>
where
    H: HostProject + TransactionBoundary,
{
    settings.validate()?;
    let targets = select_targets(host, settings.apply_to_all)?;
    if targets.is_empty() {
        return Err(PipelineError::NoTargets);
    }
    let mut config = PipelineConfig {
        seed: settings.resolve_seed(),
        ..PipelineConfig::default()
    };
    if let Some(label) = &settings.label {
        config.label = label.clone();
    }
    Pipeline::new(config)
        .with_effects(settings.enabled_effects())
        .run(host, &targets, caps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glitch_edit::{MemoryProject, TrackType};
    use glitch_timecode::Timecode;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Timecode {
        Timecode::from_millis(v)
    }

    fn two_tracks() -> (MemoryProject, Vec<SegmentId>) {
        let mut project = MemoryProject::new();
        let v1 = project.add_track("V1", TrackType::Video);
        let a1 = project.add_track("A1", TrackType::Audio);
        let ids = vec![
            project.add_segment(v1, "a.mp4", ms(0), ms(500)).unwrap(),
            project.add_segment(v1, "b.mp4", ms(500), ms(500)).unwrap(),
            project.add_segment(a1, "c.wav", ms(0), ms(800)).unwrap(),
        ];
        (project, ids)
    }

    #[test]
    fn test_selected_segments() {
        let (mut project, ids) = two_tracks();
        project.select_segment(ids[1], true).unwrap();
        project.select_segment(ids[2], true).unwrap();
        assert_eq!(select_targets(&project, false).unwrap(), vec![ids[1], ids[2]]);
    }

    #[test]
    fn test_apply_to_all_uses_selected_track() {
        let (mut project, ids) = two_tracks();
        assert_eq!(select_targets(&project, true).unwrap(), vec![ids[0], ids[1]]);
        project.select_track(TrackId(1), true).unwrap();
        assert_eq!(select_targets(&project, true).unwrap(), vec![ids[2]]);
    }

    #[test]
    fn test_nothing_selected() {
        let (mut project, _) = two_tracks();
        assert!(select_targets(&project, false).unwrap().is_empty());
        let err = apply_settings(&mut project, &GlitchSettings::default(), &mut glitch_fx::NoCapabilities)
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoTargets));
        assert!(project.transactions().is_empty());
    }
}
