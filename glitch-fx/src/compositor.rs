//! The compositor contract.

use glitch_edit::{Segment, SegmentId, SegmentStore};

use crate::capability::Capabilities;
use crate::config::{EffectConfig, EffectKind};
use crate::error::Result;
use crate::random::RandomStream;

/// A randomized effect built from store edits.
///
/// `apply` returns the segments it created, for reporting. Errors are
/// returned untouched; deciding whether to continue is the caller's job.
pub trait Compositor {
    fn kind(&self) -> EffectKind;

    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        rng: &mut RandomStream,
        caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>>;
}

impl EffectConfig {
    /// The compositor for these parameters.
    pub fn compositor(&self) -> &dyn Compositor {
        match self {
            Self::Stutter(c) => c,
            Self::StutterPlus(c) => c,
            Self::Scramble(c) => c,
            Self::DanceRave(c) => c,
            Self::Reverse(c) => c,
            Self::MemeReplace(c) => c,
            Self::StareZoom(c) => c,
            Self::EarRape(c) => c,
            Self::Bleep(c) => c,
            Self::RandomSound(c) => c,
            Self::AutoPan(c) => c,
            Self::TechText(c) => c,
            Self::Spadinner(c) => c,
        }
    }
}

impl Compositor for EffectConfig {
    fn kind(&self) -> EffectKind {
        EffectConfig::kind(self)
    }

    fn apply(
        &self,
        store: &mut SegmentStore<'_>,
        target: SegmentId,
        rng: &mut RandomStream,
        caps: &mut dyn Capabilities,
    ) -> Result<Vec<Segment>> {
        self.validate()?;
        self.compositor().apply(store, target, rng, caps)
    }
}
