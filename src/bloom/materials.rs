//! Per-category material configuration and security presets.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::classifier::ObjectCategory;
use crate::scene::Material;
use crate::util::color::{from_hex, Rgb};

/// One value per [`ObjectCategory`]. Total by construction, so a lookup can
/// never miss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryMap<T> {
    /// Eye rings.
    pub eye_rings: T,
    /// Iris.
    pub iris: T,
    /// Magic rings.
    pub magic_rings: T,
    /// Arms.
    pub arms: T,
}

impl<T> CategoryMap<T> {
    /// Build by calling `f` for every category.
    pub fn from_fn(mut f: impl FnMut(ObjectCategory) -> T) -> Self {
        Self {
            eye_rings: f(ObjectCategory::EyeRings),
            iris: f(ObjectCategory::Iris),
            magic_rings: f(ObjectCategory::MagicRings),
            arms: f(ObjectCategory::Arms),
        }
    }

    /// Value for `category`.
    #[must_use]
    pub fn get(&self, category: ObjectCategory) -> &T {
        match category {
            ObjectCategory::EyeRings => &self.eye_rings,
            ObjectCategory::Iris => &self.iris,
            ObjectCategory::MagicRings => &self.magic_rings,
            ObjectCategory::Arms => &self.arms,
        }
    }

    /// Mutable value for `category`.
    pub fn get_mut(&mut self, category: ObjectCategory) -> &mut T {
        match category {
            ObjectCategory::EyeRings => &mut self.eye_rings,
            ObjectCategory::Iris => &mut self.iris,
            ObjectCategory::MagicRings => &mut self.magic_rings,
            ObjectCategory::Arms => &mut self.arms,
        }
    }

    /// `(category, value)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectCategory, &T)> {
        ObjectCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// The coordinated subset of a material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    /// Emissive colour.
    pub emissive: Rgb,
    /// Emissive strength.
    pub emissive_intensity: f32,
    /// Metalness.
    pub metalness: f32,
    /// Roughness.
    pub roughness: f32,
}

impl MaterialConfig {
    fn metallic(hex: u32) -> Self {
        Self {
            emissive: from_hex(hex),
            emissive_intensity: 1.0,
            metalness: 0.8,
            roughness: 0.2,
        }
    }

    /// Write these values into a live material.
    pub fn apply_to(&self, material: &mut Material) {
        material.emissive = self.emissive;
        material.emissive_intensity = self.emissive_intensity;
        material.metalness = self.metalness;
        material.roughness = self.roughness;
        material.mark_dirty();
    }
}

/// Partial [`MaterialConfig`]. Unset fields keep the base value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialOverride {
    /// Emissive colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive: Option<Rgb>,
    /// Emissive strength.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_intensity: Option<f32>,
    /// Metalness.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
    /// Roughness.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
}

impl MaterialOverride {
    fn glow(hex: u32, intensity: f32) -> Self {
        Self {
            emissive: Some(from_hex(hex)),
            emissive_intensity: Some(intensity),
            ..Self::default()
        }
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `base` with every set field replaced. `base` itself is untouched.
    #[must_use]
    pub fn merged_over(&self, base: &MaterialConfig) -> MaterialConfig {
        MaterialConfig {
            emissive: self.emissive.unwrap_or(base.emissive),
            emissive_intensity: self
                .emissive_intensity
                .unwrap_or(base.emissive_intensity),
            metalness: self.metalness.unwrap_or(base.metalness),
            roughness: self.roughness.unwrap_or(base.roughness),
        }
    }
}

/// Named status colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityState {
    /// Green, low glow.
    Safe,
    /// Red, strong glow.
    Danger,
    /// Amber.
    Warning,
    /// Blue, pulsing.
    Scanning,
    /// Neutral grey. Initial state.
    Normal,
}

impl SecurityState {
    /// Every state.
    pub const ALL: [Self; 5] = [
        Self::Safe,
        Self::Danger,
        Self::Warning,
        Self::Scanning,
        Self::Normal,
    ];

    /// Upper-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Danger => "DANGER",
            Self::Warning => "WARNING",
            Self::Scanning => "SCANNING",
            Self::Normal => "NORMAL",
        }
    }

    /// Parse a state name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for SecurityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category overrides for every [`SecurityState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityPresets {
    /// `SAFE`.
    pub safe: CategoryMap<MaterialOverride>,
    /// `DANGER`.
    pub danger: CategoryMap<MaterialOverride>,
    /// `WARNING`.
    pub warning: CategoryMap<MaterialOverride>,
    /// `SCANNING`.
    pub scanning: CategoryMap<MaterialOverride>,
    /// `NORMAL`.
    pub normal: CategoryMap<MaterialOverride>,
}

impl SecurityPresets {
    /// Overrides of one state.
    #[must_use]
    pub fn get(&self, state: SecurityState) -> &CategoryMap<MaterialOverride> {
        match state {
            SecurityState::Safe => &self.safe,
            SecurityState::Danger => &self.danger,
            SecurityState::Warning => &self.warning,
            SecurityState::Scanning => &self.scanning,
            SecurityState::Normal => &self.normal,
        }
    }
}

fn glow_map(hex: [u32; 4], intensity: [f32; 4]) -> CategoryMap<MaterialOverride> {
    CategoryMap {
        eye_rings: MaterialOverride::glow(hex[0], intensity[0]),
        iris: MaterialOverride::glow(hex[1], intensity[1]),
        magic_rings: MaterialOverride::glow(hex[2], intensity[2]),
        arms: MaterialOverride::glow(hex[3], intensity[3]),
    }
}

impl Default for SecurityPresets {
    fn default() -> Self {
        Self {
            safe: glow_map(
                [0x00_ff_88, 0x00_ff_88, 0x88_ff_88, 0x44_ff_44],
                [0.3, 0.4, 0.15, 0.03],
            ),
            danger: glow_map(
                [0xff_44_44, 0xff_22_22, 0xff_66_66, 0xff_88_88],
                [0.8, 1.0, 0.4, 0.1],
            ),
            warning: glow_map(
                [0xff_aa_00, 0xff_88_00, 0xff_cc_44, 0xff_dd_66],
                [0.5, 0.6, 0.25, 0.05],
            ),
            scanning: glow_map(
                [0x44_88_ff, 0x22_66_ff, 0x66_aa_ff, 0x88_cc_ff],
                [0.6, 0.7, 0.3, 0.06],
            ),
            normal: glow_map(
                [0xff_ff_ff, 0xdd_dd_dd, 0xaa_aa_aa, 0x88_88_88],
                [0.2, 0.25, 0.1, 0.02],
            ),
        }
    }
}

/// Default base configuration of every category.
#[must_use]
pub fn default_base_configs() -> CategoryMap<MaterialConfig> {
    CategoryMap {
        eye_rings: MaterialConfig::metallic(0x00_ff_88),
        iris: MaterialConfig::metallic(0x00_ff_88),
        magic_rings: MaterialConfig::metallic(0x44_88_ff),
        arms: MaterialConfig::metallic(0x66_66_ff),
    }
}

/// A single coordinated material property with its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialPropertyValue {
    /// Emissive colour.
    Emissive(Rgb),
    /// Emissive strength.
    EmissiveIntensity(f32),
    /// Metalness.
    Metalness(f32),
    /// Roughness.
    Roughness(f32),
}

impl MaterialPropertyValue {
    /// Parse a property name (`emissive`, `emissiveIntensity`, `metalness`,
    /// `roughness`) with a scalar value. Emissive takes a packed `0xRRGGBB`.
    #[must_use]
    pub fn parse(property: &str, value: f64) -> Option<Self> {
        let scalar = value as f32;
        match property {
            "emissive" => Some(Self::Emissive(from_hex(value.max(0.0) as u32))),
            "emissiveIntensity" | "emissive_intensity" => {
                Some(Self::EmissiveIntensity(scalar))
            }
            "metalness" => Some(Self::Metalness(scalar)),
            "roughness" => Some(Self::Roughness(scalar)),
            _ => None,
        }
    }

    /// Write the value into a live material.
    pub fn apply_to(self, material: &mut Material) {
        match self {
            Self::Emissive(rgb) => material.emissive = rgb,
            Self::EmissiveIntensity(v) => material.emissive_intensity = v,
            Self::Metalness(v) => material.metalness = v,
            Self::Roughness(v) => material.roughness = v,
        }
        material.mark_dirty();
    }
}

/// Base configs plus presets, the single source of material targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialPropertyStore {
    /// Base configuration per category.
    pub base: CategoryMap<MaterialConfig>,
    /// Security presets.
    pub presets: SecurityPresets,
}

impl Default for MaterialPropertyStore {
    fn default() -> Self {
        Self {
            base: default_base_configs(),
            presets: SecurityPresets::default(),
        }
    }
}

impl MaterialPropertyStore {
    /// Base configuration of a category.
    #[must_use]
    pub fn base(&self, category: ObjectCategory) -> MaterialConfig {
        *self.base.get(category)
    }

    /// What a category looks like under `state`, or `None` when the preset
    /// leaves that category alone.
    #[must_use]
    pub fn resolve(
        &self,
        state: SecurityState,
        category: ObjectCategory,
    ) -> Option<MaterialConfig> {
        let over = self.presets.get(state).get(category);
        (!over.is_empty()).then(|| over.merged_over(self.base.get(category)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_base_untouched() {
        let store = MaterialPropertyStore::default();
        let before = store.base(ObjectCategory::Iris);
        let merged = store
            .resolve(SecurityState::Danger, ObjectCategory::Iris)
            .unwrap();
        assert_eq!(merged.emissive, from_hex(0xff_22_22));
        assert_eq!(merged.emissive_intensity, 1.0);
        assert_eq!(merged.metalness, before.metalness);
        assert_eq!(store.base(ObjectCategory::Iris), before);
    }

    #[test]
    fn empty_override_resolves_to_none() {
        let mut store = MaterialPropertyStore::default();
        store.presets.safe.arms = MaterialOverride::default();
        assert!(store
            .resolve(SecurityState::Safe, ObjectCategory::Arms)
            .is_none());
    }

    #[test]
    fn security_state_parse() {
        assert_eq!(SecurityState::parse("scanning"), Some(SecurityState::Scanning));
        assert_eq!(SecurityState::parse("NORMAL"), Some(SecurityState::Normal));
        assert_eq!(SecurityState::parse("PANIC"), None);
    }

    #[test]
    fn property_parse() {
        assert_eq!(
            MaterialPropertyValue::parse("emissive", f64::from(0xff_00_00)),
            Some(MaterialPropertyValue::Emissive([1.0, 0.0, 0.0]))
        );
        assert_eq!(
            MaterialPropertyValue::parse("roughness", 0.5),
            Some(MaterialPropertyValue::Roughness(0.5))
        );
        assert_eq!(MaterialPropertyValue::parse("opacity", 0.5), None);
    }

    #[test]
    fn presets_round_trip_through_toml() {
        let store = MaterialPropertyStore::default();
        let text = toml::to_string_pretty(&store).unwrap();
        let parsed: MaterialPropertyStore = toml::from_str(&text).unwrap();
        assert_eq!(parsed, store);
    }

    #[test]
    fn category_map_iterates_in_priority_order() {
        let map = CategoryMap::from_fn(|c| c.as_str().len());
        let order: Vec<ObjectCategory> = map.iter().map(|(c, _)| c).collect();
        assert_eq!(order, ObjectCategory::ALL.to_vec());
    }
}
