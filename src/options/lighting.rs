use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::lighting::{LightPreset, LightPresetName, ToneMapping};

/// The four light presets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightPresets {
    /// `dim`.
    pub dim: LightPreset,
    /// `balanced`.
    pub balanced: LightPreset,
    /// `bright`.
    pub bright: LightPreset,
    /// `pbr`.
    pub pbr: LightPreset,
}

impl LightPresets {
    /// Values of one preset.
    #[must_use]
    pub fn get(&self, name: LightPresetName) -> &LightPreset {
        match name {
            LightPresetName::Dim => &self.dim,
            LightPresetName::Balanced => &self.balanced,
            LightPresetName::Bright => &self.bright,
            LightPresetName::Pbr => &self.pbr,
        }
    }
}

impl Default for LightPresets {
    fn default() -> Self {
        Self {
            dim: LightPreset::new(0.8, 0.8, 1.0, ToneMapping::Linear, "Dim: low light"),
            balanced: LightPreset::new(1.5, 2.0, 1.0, ToneMapping::Linear, "Balanced lighting"),
            bright: LightPreset::new(2.5, 3.5, 1.1, ToneMapping::AcesFilmic, "Bright: well lit"),
            pbr: LightPreset::new(3.0, 4.5, 1.2, ToneMapping::AcesFilmic, "Tuned for PBR"),
        }
    }
}

/// Scene lights.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
pub struct LightingOptions {
    /// Preset applied at startup.
    #[schemars(skip)]
    pub initial_preset: LightPresetName,
    /// Multiplier on the preset's ambient intensity.
    #[schemars(title = "Ambient", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub ambient_multiplier: f32,
    /// Multiplier on the preset's directional intensity.
    #[schemars(title = "Key Light", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub directional_multiplier: f32,
    /// Direction the key light travels.
    #[schemars(skip)]
    pub light_direction: [f32; 3],
    /// Preset table.
    #[schemars(skip)]
    pub presets: LightPresets,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            initial_preset: LightPresetName::Dim,
            ambient_multiplier: 1.0,
            directional_multiplier: 1.0,
            // Light placed at (2, 4, 5) shining at the origin.
            light_direction: [-2.0, -4.0, -5.0],
            presets: LightPresets::default(),
        }
    }
}
