//! PBR light presets.
//!
//! A preset fixes ambient and directional intensities, the tone-mapping
//! operator and an exposure. Intensities are scaled by two runtime
//! multipliers. The exposure is not stored here: applying a preset writes it
//! through the [`ExposureAuthority`] like every other exposure change.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::exposure::ExposureAuthority;
use crate::options::LightingOptions;
use crate::util::color::{from_hex, Rgb};

/// Tone-mapping operator applied after exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    /// No curve.
    #[default]
    Linear,
    /// ACES filmic.
    AcesFilmic,
    /// Reinhard.
    Reinhard,
}

impl ToneMapping {
    /// Parse `linear`, `aces` or `reinhard`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "aces" | "aces_filmic" => Some(Self::AcesFilmic),
            "reinhard" => Some(Self::Reinhard),
            _ => None,
        }
    }

    /// Map a linear HDR channel value to display range.
    #[must_use]
    pub fn apply(self, x: f32) -> f32 {
        let x = x.max(0.0);
        match self {
            Self::Linear => x.min(1.0),
            Self::Reinhard => x / (1.0 + x),
            Self::AcesFilmic => {
                let (a, b, c, d, e) = (2.51, 0.03, 2.43, 0.59, 0.14);
                ((x * (a * x + b)) / (x * (c * x + d) + e)).clamp(0.0, 1.0)
            }
        }
    }
}

/// Named light preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightPresetName {
    /// Low light.
    Dim,
    /// Balanced.
    Balanced,
    /// Bright.
    Bright,
    /// Tuned for PBR assets.
    Pbr,
}

impl LightPresetName {
    /// Every preset, in cycle order.
    pub const ALL: [Self; 4] = [Self::Dim, Self::Balanced, Self::Bright, Self::Pbr];

    /// Lower-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dim => "dim",
            Self::Balanced => "balanced",
            Self::Bright => "bright",
            Self::Pbr => "pbr",
        }
    }

    /// Parse a preset name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// The preset after this one in cycle order.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Dim => Self::Balanced,
            Self::Balanced => Self::Bright,
            Self::Bright => Self::Pbr,
            Self::Pbr => Self::Dim,
        }
    }
}

impl fmt::Display for LightPresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light values of one preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightPreset {
    /// Ambient intensity before multipliers.
    pub ambient_intensity: f32,
    /// Ambient colour.
    pub ambient_color: Rgb,
    /// Directional intensity before multipliers.
    pub directional_intensity: f32,
    /// Directional colour.
    pub directional_color: Rgb,
    /// Exposure written through the authority.
    pub exposure: f32,
    /// Tone-mapping operator.
    pub tone_mapping: ToneMapping,
    /// Short label for UI.
    pub description: String,
}

impl LightPreset {
    pub(crate) fn new(
        ambient: f32,
        directional: f32,
        exposure: f32,
        tone_mapping: ToneMapping,
        description: &str,
    ) -> Self {
        Self {
            ambient_intensity: ambient,
            ambient_color: from_hex(0x40_40_40),
            directional_intensity: directional,
            directional_color: from_hex(0xff_ff_ff),
            exposure,
            tone_mapping,
            description: description.to_owned(),
        }
    }
}

/// The lights the renderer consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLights {
    /// Ambient colour.
    pub ambient_color: Rgb,
    /// Final ambient intensity.
    pub ambient_intensity: f32,
    /// Directional colour.
    pub directional_color: Rgb,
    /// Final directional intensity.
    pub directional_intensity: f32,
    /// Direction the directional light travels, normalized.
    pub direction: Vec3,
}

/// Current preset as reported to UI.
#[derive(Debug, Clone, Serialize)]
pub struct PresetInfo {
    /// Preset name.
    pub name: LightPresetName,
    /// Its values.
    pub preset: LightPreset,
    /// `(ambient, directional)` multipliers.
    pub multipliers: (f32, f32),
    /// `(ambient, directional)` intensities after multipliers.
    pub final_intensities: (f32, f32),
}

/// Debug dump of the controller.
#[derive(Debug, Clone, Serialize)]
pub struct LightingDebugInfo {
    /// Current preset.
    pub current_preset: LightPresetName,
    /// `(ambient, directional)` multipliers.
    pub multipliers: (f32, f32),
    /// `(ambient, directional)` intensities after multipliers.
    pub light_intensities: (f32, f32),
    /// Active tone mapping.
    pub tone_mapping: ToneMapping,
    /// Exposure read from the authority.
    pub exposure: f32,
}

/// Applies light presets and multipliers.
#[derive(Debug, Clone)]
pub struct PbrPresetController {
    dim: LightPreset,
    balanced: LightPreset,
    bright: LightPreset,
    pbr: LightPreset,
    current: LightPresetName,
    ambient_multiplier: f32,
    directional_multiplier: f32,
    tone_mapping: ToneMapping,
    lights: SceneLights,
    exposure: ExposureAuthority,
}

impl PbrPresetController {
    /// Controller with the configured presets. Nothing is applied until
    /// [`apply_preset`](Self::apply_preset).
    #[must_use]
    pub fn new(options: &LightingOptions, exposure: ExposureAuthority) -> Self {
        let initial = options.presets.get(options.initial_preset).clone();
        Self {
            dim: options.presets.dim.clone(),
            balanced: options.presets.balanced.clone(),
            bright: options.presets.bright.clone(),
            pbr: options.presets.pbr.clone(),
            current: options.initial_preset,
            ambient_multiplier: options.ambient_multiplier,
            directional_multiplier: options.directional_multiplier,
            tone_mapping: initial.tone_mapping,
            lights: SceneLights {
                ambient_color: initial.ambient_color,
                ambient_intensity: initial.ambient_intensity * options.ambient_multiplier,
                directional_color: initial.directional_color,
                directional_intensity: initial.directional_intensity
                    * options.directional_multiplier,
                direction: Vec3::from(options.light_direction).normalize_or(Vec3::NEG_Z),
            },
            exposure,
        }
    }

    /// Values of a preset.
    #[must_use]
    pub fn preset(&self, name: LightPresetName) -> &LightPreset {
        match name {
            LightPresetName::Dim => &self.dim,
            LightPresetName::Balanced => &self.balanced,
            LightPresetName::Bright => &self.bright,
            LightPresetName::Pbr => &self.pbr,
        }
    }

    /// Apply a preset: lights (times the current multipliers), tone mapping
    /// and exposure.
    pub fn apply_preset(&mut self, name: LightPresetName) {
        let preset = self.preset(name).clone();
        self.current = name;
        self.tone_mapping = preset.tone_mapping;
        self.lights.ambient_color = preset.ambient_color;
        self.lights.directional_color = preset.directional_color;
        self.refresh_intensities();
        let exposure = self.exposure.set_exposure(preset.exposure);
        log::info!(
            "light preset {name}: ambient {:.2}, directional {:.2}, exposure {exposure:.2}, {:?}",
            self.lights.ambient_intensity,
            self.lights.directional_intensity,
            self.tone_mapping
        );
    }

    /// [`apply_preset`](Self::apply_preset) by name. Returns `false` for an
    /// unknown name.
    pub fn apply_preset_named(&mut self, name: &str) -> bool {
        match LightPresetName::parse(name) {
            Some(preset) => {
                self.apply_preset(preset);
                true
            }
            None => {
                log::warn!("unknown light preset '{name}'");
                false
            }
        }
    }

    /// Apply the next preset in cycle order.
    pub fn cycle_preset(&mut self) -> LightPresetName {
        let next = self.current.next();
        self.apply_preset(next);
        next
    }

    /// Scale the current preset's intensities.
    pub fn set_global_multipliers(&mut self, ambient: f32, directional: f32) {
        self.ambient_multiplier = ambient.max(0.0);
        self.directional_multiplier = directional.max(0.0);
        self.refresh_intensities();
        log::debug!("light multipliers ambient x{ambient:.1}, directional x{directional:.1}");
    }

    fn refresh_intensities(&mut self) {
        let preset = self.preset(self.current);
        let ambient = preset.ambient_intensity * self.ambient_multiplier;
        let directional = preset.directional_intensity * self.directional_multiplier;
        self.lights.ambient_intensity = ambient;
        self.lights.directional_intensity = directional;
    }

    /// Write an exposure through the authority. Returns the stored value.
    pub fn set_exposure(&self, value: f32) -> f32 {
        self.exposure.set_exposure(value)
    }

    /// Select the tone-mapping operator.
    pub fn set_tone_mapping(&mut self, mapping: ToneMapping) {
        self.tone_mapping = mapping;
        log::info!("tone mapping {mapping:?}");
    }

    /// Active tone mapping.
    #[must_use]
    pub fn tone_mapping(&self) -> ToneMapping {
        self.tone_mapping
    }

    /// Lights for the renderer.
    #[must_use]
    pub fn lights(&self) -> SceneLights {
        self.lights
    }

    /// Current preset name.
    #[must_use]
    pub fn current_preset(&self) -> LightPresetName {
        self.current
    }

    /// Current preset with multipliers and final intensities.
    #[must_use]
    pub fn current_preset_info(&self) -> PresetInfo {
        PresetInfo {
            name: self.current,
            preset: self.preset(self.current).clone(),
            multipliers: (self.ambient_multiplier, self.directional_multiplier),
            final_intensities: (self.lights.ambient_intensity, self.lights.directional_intensity),
        }
    }

    /// Every preset with its description.
    #[must_use]
    pub fn available_presets(&self) -> Vec<(LightPresetName, String)> {
        LightPresetName::ALL
            .into_iter()
            .map(|p| (p, self.preset(p).description.clone()))
            .collect()
    }

    /// Debug dump.
    #[must_use]
    pub fn debug_info(&self) -> LightingDebugInfo {
        LightingDebugInfo {
            current_preset: self.current,
            multipliers: (self.ambient_multiplier, self.directional_multiplier),
            light_intensities: (self.lights.ambient_intensity, self.lights.directional_intensity),
            tone_mapping: self.tone_mapping,
            exposure: self.exposure.get_exposure(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> (PbrPresetController, ExposureAuthority) {
        let authority = ExposureAuthority::default();
        let c = PbrPresetController::new(&LightingOptions::default(), authority.clone());
        (c, authority)
    }

    #[test]
    fn preset_writes_lights_and_exposure() {
        let (mut c, authority) = controller();
        c.apply_preset(LightPresetName::Pbr);
        let lights = c.lights();
        assert_eq!(lights.ambient_intensity, 3.0);
        assert_eq!(lights.directional_intensity, 4.5);
        assert_eq!(c.tone_mapping(), ToneMapping::AcesFilmic);
        assert_eq!(authority.get_exposure(), 1.2);
    }

    #[test]
    fn multipliers_scale_and_survive_preset_change() {
        let (mut c, _) = controller();
        c.apply_preset(LightPresetName::Balanced);
        c.set_global_multipliers(2.0, 0.5);
        assert_eq!(c.lights().ambient_intensity, 3.0);
        assert_eq!(c.lights().directional_intensity, 1.0);
        c.apply_preset(LightPresetName::Dim);
        let info = c.current_preset_info();
        assert_eq!(info.final_intensities, (1.6, 0.4));
    }

    #[test]
    fn exposure_goes_through_the_authority() {
        let (c, authority) = controller();
        assert_eq!(c.set_exposure(3.0), 2.0);
        assert_eq!(authority.get_exposure(), 2.0);
        assert_eq!(c.debug_info().exposure, 2.0);
    }

    #[test]
    fn tone_mapping_curves() {
        assert_eq!(ToneMapping::Linear.apply(2.0), 1.0);
        assert!((ToneMapping::Reinhard.apply(1.0) - 0.5).abs() < 1e-6);
        assert!(ToneMapping::AcesFilmic.apply(10.0) <= 1.0);
        assert_eq!(ToneMapping::parse("ACES"), Some(ToneMapping::AcesFilmic));
    }

    #[test]
    fn cycle_wraps() {
        let (mut c, _) = controller();
        assert_eq!(c.current_preset(), LightPresetName::Dim);
        assert_eq!(c.cycle_preset(), LightPresetName::Balanced);
        c.apply_preset(LightPresetName::Pbr);
        assert_eq!(c.cycle_preset(), LightPresetName::Dim);
        assert!(!c.apply_preset_named("studio"));
    }
}
