use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::color::Rgb;

/// Frame clear colour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Background", inline)]
#[serde(default)]
pub struct BackgroundOptions {
    /// Linear RGB clear colour before exposure.
    #[schemars(title = "Color", extend("format" = "color"))]
    pub color: Rgb,
    /// Scale the clear colour by the current exposure.
    #[schemars(title = "Follow Exposure")]
    pub follow_exposure: bool,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            color: [0.02, 0.02, 0.03],
            follow_exposure: true,
        }
    }
}
