//! User settings: which effects run, with which parameters, on what.
//!
//! Mirrors the options dialog of the editor script. Settings are plain JSON;
//! every field is optional and falls back to the dialog's defaults.
//!
//! ```json
//! {
//!   "seed": 1234,
//!   "stutter": { "enabled": true, "slice_ms": 80, "repeats": 4 },
//!   "scramble": { "enabled": true, "density": 0.5 }
//! }
//! ```

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use glitch_fx::{
    AutoPanConfig, BleepConfig, DanceRaveConfig, EarRapeConfig, EffectConfig, MemeConfig,
    RandomSoundConfig, ReverseConfig, ScrambleConfig, SpadinnerConfig, StutterConfig,
    StutterPlusConfig, TechTextConfig, ZoomConfig,
};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// An effect's parameters plus its on/off switch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggle<T> {
    pub enabled: bool,
    #[serde(flatten)]
    pub params: T,
}

impl<T> Toggle<T> {
    pub fn on(params: T) -> Self {
        Self {
            enabled: true,
            params,
        }
    }

    pub fn off(params: T) -> Self {
        Self {
            enabled: false,
            params,
        }
    }
}

/// Everything the options dialog collects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlitchSettings {
    /// Process every segment of the active track instead of the selection.
    pub apply_to_all: bool,
    /// Fixed seed; a time-derived one is used when absent.
    pub seed: Option<u64>,
    /// Undo label for the run.
    pub label: Option<String>,
    pub stutter: Toggle<StutterConfig>,
    pub stutter_plus: Toggle<StutterPlusConfig>,
    pub scramble: Toggle<ScrambleConfig>,
    pub dance_rave: Toggle<DanceRaveConfig>,
    pub reverse: Toggle<ReverseConfig>,
    pub meme_replace: Toggle<MemeConfig>,
    pub stare_zoom: Toggle<ZoomConfig>,
    pub ear_rape: Toggle<EarRapeConfig>,
    pub bleep: Toggle<BleepConfig>,
    pub random_sound: Toggle<RandomSoundConfig>,
    pub auto_pan: Toggle<AutoPanConfig>,
    pub tech_text: Toggle<TechTextConfig>,
    pub spadinner: Toggle<SpadinnerConfig>,
}

impl Default for GlitchSettings {
    /// Stutter on, everything else off.
    fn default() -> Self {
        Self {
            apply_to_all: false,
            seed: None,
            label: None,
            stutter: Toggle::on(StutterConfig::default()),
            stutter_plus: Toggle::default(),
            scramble: Toggle::default(),
            dance_rave: Toggle::default(),
            reverse: Toggle::default(),
            meme_replace: Toggle::default(),
            stare_zoom: Toggle::default(),
            ear_rape: Toggle::default(),
            bleep: Toggle::default(),
            random_sound: Toggle::default(),
            auto_pan: Toggle::default(),
            tech_text: Toggle::default(),
            spadinner: Toggle::default(),
        }
    }
}

impl GlitchSettings {
    /// Parse settings from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Enabled effects as configs, in declared order.
    pub fn enabled_effects(&self) -> Vec<EffectConfig> {
        fn push<T: Clone>(out: &mut Vec<EffectConfig>, t: &Toggle<T>, wrap: fn(T) -> EffectConfig) {
            if t.enabled {
                out.push(wrap(t.params.clone()));
            }
        }

        let mut out = Vec::new();
        push(&mut out, &self.stutter, EffectConfig::Stutter);
        push(&mut out, &self.stutter_plus, EffectConfig::StutterPlus);
        push(&mut out, &self.scramble, EffectConfig::Scramble);
        push(&mut out, &self.dance_rave, EffectConfig::DanceRave);
        push(&mut out, &self.reverse, EffectConfig::Reverse);
        push(&mut out, &self.meme_replace, EffectConfig::MemeReplace);
        push(&mut out, &self.stare_zoom, EffectConfig::StareZoom);
        push(&mut out, &self.ear_rape, EffectConfig::EarRape);
        push(&mut out, &self.bleep, EffectConfig::Bleep);
        push(&mut out, &self.random_sound, EffectConfig::RandomSound);
        push(&mut out, &self.auto_pan, EffectConfig::AutoPan);
        push(&mut out, &self.tech_text, EffectConfig::TechText);
        push(&mut out, &self.spadinner, EffectConfig::Spadinner);
        out
    }

    /// Check every enabled effect's parameters.
    pub fn validate(&self) -> Result<()> {
        for effect in self.enabled_effects() {
            effect
                .validate()
                .map_err(|e| PipelineError::Settings(e.to_string()))?;
        }
        Ok(())
    }

    /// The configured seed, or one derived from the clock.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        })
    }
}
