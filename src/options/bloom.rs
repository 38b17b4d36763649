use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Bloom post-process parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Bloom", inline)]
#[serde(default)]
pub struct BloomOptions {
    /// Luminance above which pixels glow.
    #[schemars(title = "Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub threshold: f32,
    /// Glow strength.
    #[schemars(title = "Strength", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub strength: f32,
    /// Glow spread.
    #[schemars(title = "Radius", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub radius: f32,
    /// Whether the pass runs.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
}

impl Default for BloomOptions {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            strength: 0.8,
            radius: 0.4,
            enabled: true,
        }
    }
}
