//! The bloom rendering collaborator.
//!
//! [`BloomEngine`] is the seam between the coordination center and whatever
//! draws the glow. [`PostProcessBloom`] is the stock implementation: it keeps
//! the pass parameters and the synced object list, and hands the renderer a
//! [`BloomFrameParams`] each frame with the exposure read fresh from the
//! authority.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use super::classifier::ObjectCategory;
use crate::exposure::ExposureReader;
use crate::options::BloomOptions;
use crate::scene::NodeId;

/// A tunable bloom pass parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BloomParameter {
    /// Luminance threshold.
    Threshold,
    /// Glow strength.
    Strength,
    /// Glow spread.
    Radius,
    /// Pass on/off. Any value above 0.5 enables.
    Enabled,
}

impl BloomParameter {
    /// Parse a parameter name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "threshold" => Some(Self::Threshold),
            "strength" => Some(Self::Strength),
            "radius" => Some(Self::Radius),
            "enabled" => Some(Self::Enabled),
            _ => None,
        }
    }

    /// Parameter name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::Strength => "strength",
            Self::Radius => "radius",
            Self::Enabled => "enabled",
        }
    }
}

impl fmt::Display for BloomParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified mesh as seen by the bloom engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BloomObject {
    /// `category.name` key.
    pub key: String,
    /// Category.
    pub category: ObjectCategory,
    /// Mesh name.
    pub name: String,
    /// Scene node.
    #[serde(skip)]
    pub node: NodeId,
}

/// Something that renders bloom and can be driven by the coordination center.
pub trait BloomEngine {
    /// Change one pass parameter.
    fn update_bloom(&mut self, parameter: BloomParameter, value: f32);

    /// Replace the set of objects that should glow.
    fn set_bloom_objects(&mut self, objects: Vec<BloomObject>);

    /// Pass parameters currently in effect.
    fn settings(&self) -> BloomOptions;
}

/// A bloom engine shared between the coordination center and the frame loop.
pub type SharedBloomEngine = Rc<RefCell<dyn BloomEngine>>;

/// Stock bloom parameter presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BloomPreset {
    /// High threshold, faint glow.
    Subtle,
    /// Default look.
    Normal,
    /// Low threshold, wide glow.
    Intense,
}

impl BloomPreset {
    /// Parse a preset name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "subtle" => Some(Self::Subtle),
            "normal" => Some(Self::Normal),
            "intense" => Some(Self::Intense),
            _ => None,
        }
    }

    /// The preset after this one, wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Subtle => Self::Normal,
            Self::Normal => Self::Intense,
            Self::Intense => Self::Subtle,
        }
    }

    /// `(threshold, strength, radius)` of the preset.
    #[must_use]
    pub fn values(self) -> (f32, f32, f32) {
        match self {
            Self::Subtle => (0.8, 0.3, 0.2),
            Self::Normal => (0.4, 0.8, 0.4),
            Self::Intense => (0.1, 1.5, 0.6),
        }
    }
}

/// Everything the renderer needs for one frame of bloom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomFrameParams {
    /// Pass parameters.
    pub settings: BloomOptions,
    /// Exposure at the time of the frame.
    pub exposure: f32,
    /// Number of glowing objects.
    pub object_count: usize,
}

/// Parameter-level bloom engine.
#[derive(Debug, Clone)]
pub struct PostProcessBloom {
    settings: BloomOptions,
    objects: Vec<BloomObject>,
    exposure: ExposureReader,
}

impl PostProcessBloom {
    /// Engine starting from `settings`, reading exposure through `exposure`.
    #[must_use]
    pub fn new(settings: BloomOptions, exposure: ExposureReader) -> Self {
        Self {
            settings,
            objects: Vec::new(),
            exposure,
        }
    }

    /// Current pass parameters.
    #[must_use]
    pub fn settings(&self) -> BloomOptions {
        self.settings
    }

    /// Objects last synced by the coordination center.
    #[must_use]
    pub fn objects(&self) -> &[BloomObject] {
        &self.objects
    }

    /// Apply threshold, strength and radius of a preset.
    pub fn apply_preset(&mut self, preset: BloomPreset) {
        let (threshold, strength, radius) = preset.values();
        self.update_bloom(BloomParameter::Threshold, threshold);
        self.update_bloom(BloomParameter::Strength, strength);
        self.update_bloom(BloomParameter::Radius, radius);
        log::info!("bloom preset {preset:?} applied");
    }

    /// Parameters for this frame. Exposure is read now, never cached.
    #[must_use]
    pub fn frame_params(&self) -> BloomFrameParams {
        BloomFrameParams {
            settings: self.settings,
            exposure: self.exposure.get_exposure(),
            object_count: self.objects.len(),
        }
    }
}

impl BloomEngine for PostProcessBloom {
    fn update_bloom(&mut self, parameter: BloomParameter, value: f32) {
        match parameter {
            BloomParameter::Threshold => self.settings.threshold = value.max(0.0),
            BloomParameter::Strength => self.settings.strength = value.max(0.0),
            BloomParameter::Radius => self.settings.radius = value.clamp(0.0, 1.0),
            BloomParameter::Enabled => self.settings.enabled = value > 0.5,
        }
        log::debug!("bloom {parameter} = {value}");
    }

    fn set_bloom_objects(&mut self, objects: Vec<BloomObject>) {
        log::debug!("bloom engine tracking {} objects", objects.len());
        self.objects = objects;
    }

    fn settings(&self) -> BloomOptions {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::ExposureAuthority;

    #[test]
    fn presets_set_three_parameters() {
        let authority = ExposureAuthority::default();
        let mut bloom = PostProcessBloom::new(BloomOptions::default(), authority.reader());
        bloom.apply_preset(BloomPreset::Intense);
        let s = bloom.settings();
        assert_eq!((s.threshold, s.strength, s.radius), (0.1, 1.5, 0.6));
        assert!(s.enabled);
    }

    #[test]
    fn enabled_parameter_toggles() {
        let authority = ExposureAuthority::default();
        let mut bloom = PostProcessBloom::new(BloomOptions::default(), authority.reader());
        bloom.update_bloom(BloomParameter::Enabled, 0.0);
        assert!(!bloom.settings().enabled);
        bloom.update_bloom(BloomParameter::Enabled, 1.0);
        assert!(bloom.settings().enabled);
    }

    #[test]
    fn frame_params_read_current_exposure() {
        let authority = ExposureAuthority::default();
        let bloom = PostProcessBloom::new(BloomOptions::default(), authority.reader());
        assert_eq!(bloom.frame_params().exposure, 1.0);
        let _ = authority.set_exposure(0.4);
        assert_eq!(bloom.frame_params().exposure, 0.4);
    }

    #[test]
    fn parameter_names() {
        assert_eq!(BloomParameter::parse("radius"), Some(BloomParameter::Radius));
        assert_eq!(BloomParameter::parse("glow"), None);
        assert_eq!(BloomPreset::parse("Subtle"), Some(BloomPreset::Subtle));
    }
}
