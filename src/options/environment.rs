use serde::{Deserialize, Serialize};

use crate::environment::{ThemeConfig, ThemeName};
use crate::util::easing::EasingFunction;

/// Exposure theme table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnvironmentOptions {
    /// Theme considered active at startup.
    pub initial_theme: ThemeName,
    /// Curve of the exposure ramp between themes.
    pub easing: EasingFunction,
    /// `NIGHT`.
    pub night: ThemeConfig,
    /// `DAY`.
    pub day: ThemeConfig,
    /// `BRIGHT`.
    pub bright: ThemeConfig,
}

impl Default for EnvironmentOptions {
    fn default() -> Self {
        Self {
            initial_theme: ThemeName::Day,
            easing: EasingFunction::THEME,
            night: ThemeConfig::new(0.3, 0.2, 0.3, "Night: high-contrast glow"),
            day: ThemeConfig::new(1.0, 0.6, 0.8, "Day: neutral lighting"),
            bright: ThemeConfig::new(1.8, 1.0, 1.2, "Bright: intense glow"),
        }
    }
}
