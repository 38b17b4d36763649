//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a debug
//! panel control or a programmatic call, is a [`WorldCommand`]. Consumers
//! construct commands and pass them to
//! [`WorldEngine::execute`](super::WorldEngine::execute).

use glam::Vec3;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::bloom::{
    BloomParameter, BloomPreset, MaterialPropertyValue, ObjectCategory, SecurityState,
};
use crate::environment::ThemeName;
use crate::lighting::{LightPresetName, ToneMapping};
use crate::util::color::Rgb;

/// A single operation on the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldCommand {
    // ── Animation ───────────────────────────────────────────────────
    /// Toggle between the permanent and pose states.
    RequestTransition,

    /// Return to the permanent state even while a transition runs.
    ForceReturn,

    /// Crossfade length for later transitions.
    SetFadeDuration(f32),

    /// Time scale of every action.
    SetTimeScale(f32),

    // ── Materials ───────────────────────────────────────────────────
    /// Apply a security preset to every category.
    SetSecurityState(SecurityState),

    /// Write one material property on a whole category.
    SetObjectProperty {
        /// Target category.
        category: ObjectCategory,
        /// Property and value.
        value: MaterialPropertyValue,
    },

    /// Restore every registered material to its load-time snapshot.
    ResetMaterials,

    /// Turn the `SCANNING` pulse on or off.
    SetPulseEnabled(bool),

    // ── Bloom ───────────────────────────────────────────────────────
    /// Set one bloom pass parameter.
    SetBloomParameter {
        /// Parameter.
        parameter: BloomParameter,
        /// New value.
        value: f32,
    },

    /// Apply a bloom preset.
    ApplyBloomPreset(BloomPreset),

    /// Apply the next bloom preset.
    CycleBloomPreset,

    // ── Exposure and lights ─────────────────────────────────────────
    /// Write the exposure directly.
    SetExposure(f32),

    /// Start a theme change.
    ChangeTheme {
        /// Target theme.
        theme: ThemeName,
        /// Transition length; the theme's own when `None`.
        duration: Option<Duration>,
    },

    /// Change to the next theme.
    CycleTheme,

    /// Cancel the running theme change.
    StopThemeTransition,

    /// Apply a light preset.
    ApplyLightPreset(LightPresetName),

    /// Apply the next light preset.
    CycleLightPreset,

    /// Scale the preset light intensities.
    SetLightMultipliers {
        /// Ambient multiplier.
        ambient: f32,
        /// Directional multiplier.
        directional: f32,
    },

    /// Select the tone-mapping operator.
    SetToneMapping(ToneMapping),

    /// Set the clear colour.
    SetBackground(Rgb),

    // ── Eye ─────────────────────────────────────────────────────────
    /// Start or stop the eye-ring spin.
    ToggleEyeRotation,

    /// Eye-ring spin speed.
    SetEyeRotationSpeed(f32),

    // ── Ring reveal ─────────────────────────────────────────────────
    /// Show every ring, or hand ring visibility back to the trigger zone.
    SetForceShowRings(bool),

    /// Flip [`SetForceShowRings`](Self::SetForceShowRings).
    ToggleForceShowRings,

    /// Replace the trigger zone.
    SetRevealZone {
        /// World-space centre.
        center: Vec3,
        /// Reach, raised to `0.5`.
        radius: f32,
        /// Vertical half-extent.
        height: f32,
    },

    /// Shift the trigger zone.
    MoveRevealZone(Vec3),

    /// Back to the configured trigger zone.
    ResetRevealZone,
}

/// A bindable command without payload.
///
/// In TOML, keybindings are written as `command = "KeyCode"`:
/// ```toml
/// [keybindings.bindings]
/// transition = "Space"
/// security_scanning = "KeyC"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommand {
    /// [`WorldCommand::RequestTransition`].
    Transition,
    /// [`WorldCommand::ForceReturn`].
    ForceReturn,
    /// `SAFE` security state.
    SecuritySafe,
    /// `DANGER` security state.
    SecurityDanger,
    /// `WARNING` security state.
    SecurityWarning,
    /// `SCANNING` security state.
    SecurityScanning,
    /// `NORMAL` security state.
    SecurityNormal,
    /// [`WorldCommand::CycleTheme`].
    CycleTheme,
    /// [`WorldCommand::CycleLightPreset`].
    CycleLighting,
    /// [`WorldCommand::CycleBloomPreset`].
    CycleBloomPreset,
    /// [`WorldCommand::ToggleEyeRotation`].
    ToggleEyeRotation,
    /// [`WorldCommand::ResetMaterials`].
    ResetMaterials,
    /// `dim` light preset.
    LightingDim,
    /// `balanced` light preset.
    LightingBalanced,
    /// `bright` light preset.
    LightingBright,
    /// `pbr` light preset.
    LightingPbr,
    /// [`WorldCommand::ToggleForceShowRings`].
    ToggleForceShowRings,
}

impl KeyCommand {
    /// The command this binding triggers.
    #[must_use]
    pub fn command(self) -> WorldCommand {
        match self {
            Self::Transition => WorldCommand::RequestTransition,
            Self::ForceReturn => WorldCommand::ForceReturn,
            Self::SecuritySafe => WorldCommand::SetSecurityState(SecurityState::Safe),
            Self::SecurityDanger => WorldCommand::SetSecurityState(SecurityState::Danger),
            Self::SecurityWarning => WorldCommand::SetSecurityState(SecurityState::Warning),
            Self::SecurityScanning => WorldCommand::SetSecurityState(SecurityState::Scanning),
            Self::SecurityNormal => WorldCommand::SetSecurityState(SecurityState::Normal),
            Self::CycleTheme => WorldCommand::CycleTheme,
            Self::CycleLighting => WorldCommand::CycleLightPreset,
            Self::CycleBloomPreset => WorldCommand::CycleBloomPreset,
            Self::ToggleEyeRotation => WorldCommand::ToggleEyeRotation,
            Self::ResetMaterials => WorldCommand::ResetMaterials,
            Self::LightingDim => WorldCommand::ApplyLightPreset(LightPresetName::Dim),
            Self::LightingBalanced => WorldCommand::ApplyLightPreset(LightPresetName::Balanced),
            Self::LightingBright => WorldCommand::ApplyLightPreset(LightPresetName::Bright),
            Self::LightingPbr => WorldCommand::ApplyLightPreset(LightPresetName::Pbr),
            Self::ToggleForceShowRings => WorldCommand::ToggleForceShowRings,
        }
    }
}
