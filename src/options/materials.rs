use serde::{Deserialize, Serialize};

use crate::bloom::materials::{
    default_base_configs, CategoryMap, MaterialConfig, MaterialPropertyStore,
    SecurityPresets, SecurityState,
};

/// Material targets of the bloom categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaterialOptions {
    /// State applied once objects are registered.
    pub initial_state: SecurityState,
    /// Base configuration per category.
    pub base: CategoryMap<MaterialConfig>,
    /// Security presets.
    pub presets: SecurityPresets,
    /// Whether `SCANNING` pulses the eye rings and iris.
    pub pulse_enabled: bool,
    /// Pulse angular rate in radians per second.
    pub pulse_rate: f32,
}

impl Default for MaterialOptions {
    fn default() -> Self {
        Self {
            initial_state: SecurityState::Normal,
            base: default_base_configs(),
            presets: SecurityPresets::default(),
            pulse_enabled: true,
            pulse_rate: 3.0,
        }
    }
}

impl MaterialOptions {
    /// The property store these options describe.
    #[must_use]
    pub fn store(&self) -> MaterialPropertyStore {
        MaterialPropertyStore {
            base: self.base,
            presets: self.presets.clone(),
        }
    }
}
