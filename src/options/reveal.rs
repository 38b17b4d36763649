use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Trigger zone of the ring reveal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Ring Reveal", inline)]
#[serde(default)]
pub struct RevealOptions {
    /// World-space zone centre.
    #[schemars(title = "Center")]
    pub center: [f32; 3],
    /// Horizontal reach from the centre.
    #[schemars(title = "Radius", range(min = 0.5, max = 10.0), extend("step" = 0.1))]
    pub radius: f32,
    /// Vertical half-extent around the centre.
    #[schemars(title = "Height", range(min = 0.0, max = 5.0), extend("step" = 0.1))]
    pub height: f32,
    /// Show every ring regardless of the zone.
    #[schemars(title = "Show All Rings")]
    pub force_show_all: bool,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            center: [3.3, 3.4, 1.9],
            radius: 1.3,
            height: 0.6,
            force_show_all: true,
        }
    }
}
