//! Effect parameter records.
//!
//! Each compositor has one immutable record. Defaults match the values the
//! settings dialog starts with.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FxError, Result};

/// Every effect, in the order a pipeline applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Stutter,
    StutterPlus,
    Scramble,
    DanceRave,
    Reverse,
    MemeReplace,
    StareZoom,
    EarRape,
    Bleep,
    RandomSound,
    AutoPan,
    TechText,
    Spadinner,
}

impl EffectKind {
    /// Declared application order.
    pub const ORDER: [EffectKind; 13] = [
        Self::Stutter,
        Self::StutterPlus,
        Self::Scramble,
        Self::DanceRave,
        Self::Reverse,
        Self::MemeReplace,
        Self::StareZoom,
        Self::EarRape,
        Self::Bleep,
        Self::RandomSound,
        Self::AutoPan,
        Self::TechText,
        Self::Spadinner,
    ];

    /// Position in [`EffectKind::ORDER`].
    pub fn rank(self) -> usize {
        Self::ORDER.iter().position(|k| *k == self).unwrap_or(Self::ORDER.len())
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Stutter => "stutter",
            Self::StutterPlus => "stutter_plus",
            Self::Scramble => "scramble",
            Self::DanceRave => "dance_rave",
            Self::Reverse => "reverse",
            Self::MemeReplace => "meme_replace",
            Self::StareZoom => "stare_zoom",
            Self::EarRape => "ear_rape",
            Self::Bleep => "bleep",
            Self::RandomSound => "random_sound",
            Self::AutoPan => "auto_pan",
            Self::TechText => "tech_text",
            Self::Spadinner => "spadinner",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loop the head of a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StutterConfig {
    pub slice_ms: u64,
    pub repeats: usize,
    /// Width of the uniform pitch band around 1.0 applied to each copy.
    pub pitch_variance: f64,
}

impl Default for StutterConfig {
    fn default() -> Self {
        Self {
            slice_ms: 50,
            repeats: 8,
            pitch_variance: 0.0,
        }
    }
}

/// Stutter driven by a randomized outer loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StutterPlusConfig {
    pub base_ms: u64,
    pub max_repeats: u32,
}

impl Default for StutterPlusConfig {
    fn default() -> Self {
        Self {
            base_ms: 40,
            max_repeats: 20,
        }
    }
}

/// Random chop and shuffle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrambleConfig {
    pub slice_ms: u64,
    /// Probability that a slice survives, in `[0, 1]`.
    pub density: f64,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            slice_ms: 100,
            density: 0.8,
        }
    }
}

/// Periodic jittered jump-cuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DanceRaveConfig {
    pub interval_ms: u64,
}

impl Default for DanceRaveConfig {
    fn default() -> Self {
        Self { interval_ms: 120 }
    }
}

/// Flip playback direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReverseConfig {}

/// Text overlay from the segment start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemeConfig {
    pub text: String,
    pub duration_ms: u64,
}

impl Default for MemeConfig {
    fn default() -> Self {
        Self {
            text: "MEME".into(),
            duration_ms: 800,
        }
    }
}

/// Slow push-in on the picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub zoom_percent: u32,
    pub duration_ms: u64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            zoom_percent: 120,
            duration_ms: 800,
        }
    }
}

/// Gain spike in the middle of the segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarRapeConfig {
    pub db_boost: f64,
}

impl Default for EarRapeConfig {
    fn default() -> Self {
        Self { db_boost: 12.0 }
    }
}

/// Censor tone over the centre of the segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BleepConfig {
    pub duration_ms: u64,
    pub frequency_hz: u32,
}

impl Default for BleepConfig {
    fn default() -> Self {
        Self {
            duration_ms: 200,
            frequency_hz: 1000,
        }
    }
}

/// Drop a random audio sample at the segment start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSoundConfig {
    pub folder: String,
}

/// Hard left/right pan alternation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPanConfig {
    pub cycle_ms: u64,
}

impl Default for AutoPanConfig {
    fn default() -> Self {
        Self { cycle_ms: 800 }
    }
}

/// Random technical words flashed over the picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechTextConfig {
    pub count: usize,
}

impl Default for TechTextConfig {
    fn default() -> Self {
        Self { count: 2 }
    }
}

/// Append any random file from a folder after the segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpadinnerConfig {
    pub folder: String,
}

/// One enabled effect with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EffectConfig {
    Stutter(StutterConfig),
    StutterPlus(StutterPlusConfig),
    Scramble(ScrambleConfig),
    DanceRave(DanceRaveConfig),
    Reverse(ReverseConfig),
    MemeReplace(MemeConfig),
    StareZoom(ZoomConfig),
    EarRape(EarRapeConfig),
    Bleep(BleepConfig),
    RandomSound(RandomSoundConfig),
    AutoPan(AutoPanConfig),
    TechText(TechTextConfig),
    Spadinner(SpadinnerConfig),
}

impl EffectConfig {
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Stutter(_) => EffectKind::Stutter,
            Self::StutterPlus(_) => EffectKind::StutterPlus,
            Self::Scramble(_) => EffectKind::Scramble,
            Self::DanceRave(_) => EffectKind::DanceRave,
            Self::Reverse(_) => EffectKind::Reverse,
            Self::MemeReplace(_) => EffectKind::MemeReplace,
            Self::StareZoom(_) => EffectKind::StareZoom,
            Self::EarRape(_) => EffectKind::EarRape,
            Self::Bleep(_) => EffectKind::Bleep,
            Self::RandomSound(_) => EffectKind::RandomSound,
            Self::AutoPan(_) => EffectKind::AutoPan,
            Self::TechText(_) => EffectKind::TechText,
            Self::Spadinner(_) => EffectKind::Spadinner,
        }
    }

    /// Default parameters for `kind`.
    pub fn default_for(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Stutter => Self::Stutter(StutterConfig::default()),
            EffectKind::StutterPlus => Self::StutterPlus(StutterPlusConfig::default()),
            EffectKind::Scramble => Self::Scramble(ScrambleConfig::default()),
            EffectKind::DanceRave => Self::DanceRave(DanceRaveConfig::default()),
            EffectKind::Reverse => Self::Reverse(ReverseConfig::default()),
            EffectKind::MemeReplace => Self::MemeReplace(MemeConfig::default()),
            EffectKind::StareZoom => Self::StareZoom(ZoomConfig::default()),
            EffectKind::EarRape => Self::EarRape(EarRapeConfig::default()),
            EffectKind::Bleep => Self::Bleep(BleepConfig::default()),
            EffectKind::RandomSound => Self::RandomSound(RandomSoundConfig::default()),
            EffectKind::AutoPan => Self::AutoPan(AutoPanConfig::default()),
            EffectKind::TechText => Self::TechText(TechTextConfig::default()),
            EffectKind::Spadinner => Self::Spadinner(SpadinnerConfig::default()),
        }
    }

    /// Reject parameter sets no compositor can run with.
    pub fn validate(&self) -> Result<()> {
        let effect = self.kind().name();
        let fail = |message: &str| Err(FxError::invalid_config(effect, message));
        match self {
            Self::Stutter(c) => {
                if c.slice_ms == 0 {
                    return fail("slice_ms must be positive");
                }
                if !c.pitch_variance.is_finite() || c.pitch_variance < 0.0 {
                    return fail("pitch_variance must be a non-negative number");
                }
            }
            Self::StutterPlus(c) if c.base_ms == 0 => return fail("base_ms must be positive"),
            Self::Scramble(c) => {
                if c.slice_ms == 0 {
                    return fail("slice_ms must be positive");
                }
                if !(0.0..=1.0).contains(&c.density) {
                    return fail("density must lie in [0, 1]");
                }
            }
            Self::DanceRave(c) if c.interval_ms == 0 => {
                return fail("interval_ms must be positive")
            }
            Self::MemeReplace(c) if c.duration_ms == 0 => {
                return fail("duration_ms must be positive")
            }
            Self::StareZoom(c) => {
                if c.duration_ms == 0 {
                    return fail("duration_ms must be positive");
                }
                if c.zoom_percent == 0 {
                    return fail("zoom_percent must be positive");
                }
            }
            Self::EarRape(c) if !c.db_boost.is_finite() => {
                return fail("db_boost must be a finite number")
            }
            Self::Bleep(c) => {
                if c.duration_ms == 0 {
                    return fail("duration_ms must be positive");
                }
                if c.frequency_hz == 0 {
                    return fail("frequency_hz must be positive");
                }
            }
            Self::AutoPan(c) if c.cycle_ms == 0 => return fail("cycle_ms must be positive"),
            _ => {}
        }
        Ok(())
    }
}

/// Order `effects` by [`EffectKind::ORDER`], keeping the relative order of
/// repeated kinds.
pub fn sort_declared(effects: &mut [EffectConfig]) {
    effects.sort_by_key(|e| e.kind().rank());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let stutter = StutterConfig::default();
        assert_eq!((stutter.slice_ms, stutter.repeats), (50, 8));
        assert_eq!(ScrambleConfig::default().density, 0.8);
        assert_eq!(MemeConfig::default().text, "MEME");
        assert_eq!(BleepConfig::default().frequency_hz, 1000);
        for kind in EffectKind::ORDER {
            let config = EffectConfig::default_for(kind);
            assert_eq!(config.kind(), kind);
            assert!(config.validate().is_ok(), "{kind} default must validate");
        }
    }

    #[test]
    fn test_declared_order() {
        let mut effects = vec![
            EffectConfig::default_for(EffectKind::Reverse),
            EffectConfig::default_for(EffectKind::Spadinner),
            EffectConfig::default_for(EffectKind::Stutter),
            EffectConfig::default_for(EffectKind::Scramble),
        ];
        sort_declared(&mut effects);
        let kinds: Vec<EffectKind> = effects.iter().map(EffectConfig::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EffectKind::Stutter,
                EffectKind::Scramble,
                EffectKind::Reverse,
                EffectKind::Spadinner
            ]
        );
    }

    #[test]
    fn test_validate_rejects() {
        let bad = EffectConfig::Scramble(ScrambleConfig {
            slice_ms: 100,
            density: 1.5,
        });
        assert!(matches!(bad.validate(), Err(FxError::InvalidConfig { .. })));
        let bad = EffectConfig::DanceRave(DanceRaveConfig { interval_ms: 0 });
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_serde_tagged() {
        let json = r#"{"effect":"stutter","slice_ms":100,"repeats":3}"#;
        let config: EffectConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config,
            EffectConfig::Stutter(StutterConfig {
                slice_ms: 100,
                repeats: 3,
                pitch_variance: 0.0,
            })
        );
        let reverse: EffectConfig = serde_json::from_str(r#"{"effect":"reverse"}"#).unwrap();
        assert_eq!(reverse.kind(), EffectKind::Reverse);
    }
}
