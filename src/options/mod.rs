//! Centralized runtime options with TOML preset support.
//!
//! Everything a world session can be tuned with (animation timing, mesh
//! classification, security presets, bloom, exposure themes, light presets,
//! ring reveal, background, keybindings) is consolidated here. Options
//! serialize to/from TOML for presets stored in `assets/presets/`.

mod animation;
mod background;
mod bloom;
mod classification;
mod environment;
mod keybindings;
mod lighting;
mod materials;
mod reveal;

use std::path::Path;

pub use animation::{AnimationOptions, LimbPair};
pub use background::BackgroundOptions;
pub use bloom::BloomOptions;
pub use classification::ClassificationOptions;
pub use environment::EnvironmentOptions;
pub use keybindings::KeybindingOptions;
pub use lighting::{LightPresets, LightingOptions};
pub use materials::MaterialOptions;
pub use reveal::RevealOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[bloom]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Crossfade timing and clip groups.
    pub animation: AnimationOptions,
    /// Mesh classification rules.
    #[schemars(skip)]
    pub classification: ClassificationOptions,
    /// Category base materials and security presets.
    #[schemars(skip)]
    pub materials: MaterialOptions,
    /// Bloom pass parameters.
    pub bloom: BloomOptions,
    /// Exposure themes.
    #[schemars(skip)]
    pub environment: EnvironmentOptions,
    /// Light presets and multipliers.
    pub lighting: LightingOptions,
    /// Ring reveal zone.
    pub reveal: RevealOptions,
    /// Clear colour.
    pub background: BackgroundOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] if the file cannot be read and
    /// [`WorldError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, WorldError> {
        let content = std::fs::read_to_string(path).map_err(WorldError::Io)?;
        toml::from_str(&content).map_err(|e| WorldError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OptionsParse`] if serialization fails and
    /// [`WorldError::Io`] if the file or its directory cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), WorldError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| WorldError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(WorldError::Io)?;
        }
        std::fs::write(path, content).map_err(WorldError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloom::{ObjectCategory, SecurityState};
    use crate::engine::KeyCommand;
    use crate::environment::ThemeName;
    use crate::lighting::LightPresetName;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[bloom]
strength = 1.2

[environment]
initial_theme = "NIGHT"

[lighting]
initial_preset = "pbr"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.bloom.strength, 1.2);
        assert_eq!(opts.bloom.threshold, 0.3);
        assert_eq!(opts.environment.initial_theme, ThemeName::Night);
        assert_eq!(opts.environment.bright.exposure, 1.8);
        assert_eq!(opts.lighting.initial_preset, LightPresetName::Pbr);
        assert_eq!(opts.materials.initial_state, SecurityState::Normal);
        assert_eq!(opts.animation.fade_duration, 1.5);
        assert!(opts.reveal.force_show_all);
    }

    #[test]
    fn classification_rules_load_from_toml() {
        let toml_str = r#"
[[classification.rules]]
category = "iris"
any_of = ["pupil"]
none_of = []
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.classification.rules.len(), 1);
        assert_eq!(opts.classification.rules[0].category, ObjectCategory::Iris);
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(opts.keybindings.lookup("Space"), Some(KeyCommand::Transition));
        assert_eq!(opts.keybindings.lookup("KeyC"), Some(KeyCommand::SecurityScanning));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn loaded_keybindings_have_reverse_map() {
        let toml_str = r#"
[keybindings.bindings]
transition = "KeyG"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.keybindings.lookup("KeyG"), Some(KeyCommand::Transition));
        assert_eq!(opts.keybindings.lookup("Space"), None);
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir().join(format!("iris-world-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.bloom.radius = 0.9;
        opts.save(&dir.join("glow.toml")).unwrap();
        Options::default().save(&dir.join("calm.toml")).unwrap();

        let loaded = Options::load(&dir.join("glow.toml")).unwrap();
        assert_eq!(loaded.bloom.radius, 0.9);
        assert_eq!(Options::list_presets(&dir), vec!["calm", "glow"]);
        assert!(matches!(Options::load(&dir.join("missing.toml")), Err(WorldError::Io(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value = serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("animation"));
        assert!(props.contains_key("bloom"));
        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("background"));
        assert!(props.contains_key("reveal"));

        assert!(!props.contains_key("classification"));
        assert!(!props.contains_key("materials"));
        assert!(!props.contains_key("environment"));
        assert!(!props.contains_key("keybindings"));

        let lighting = &props["lighting"]["properties"];
        assert!(lighting.get("ambient_multiplier").is_some());
        assert!(lighting.get("presets").is_none());
        let animation = &props["animation"]["properties"];
        assert!(animation.get("fade_duration").is_some());
        assert!(animation.get("pose_time_scale").is_none());
    }
}
