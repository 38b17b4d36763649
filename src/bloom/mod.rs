//! Bloom and security-state coordination.
//!
//! Meshes are classified into categories once at load, then
//! [`BloomCoordinationCenter`] is the only code path that writes their
//! emissive, metalness and roughness. Security states are presets merged
//! over per-category base configs. Bloom pass parameters go to an optional
//! [`BloomEngine`](engine::BloomEngine).

pub mod classifier;
pub mod control_center;
pub mod engine;
pub mod materials;

use std::fmt;

pub use classifier::{CategoryRule, ObjectCategory, ObjectClassifier, PatternClassifier};
pub use control_center::BloomCoordinationCenter;
pub use engine::{BloomEngine, BloomParameter, BloomPreset, PostProcessBloom, SharedBloomEngine};
pub use materials::{
    CategoryMap, MaterialConfig, MaterialOverride, MaterialPropertyStore,
    MaterialPropertyValue, SecurityState,
};

/// A bloom request that had no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BloomError {
    /// Category name not recognised.
    UnknownCategory(String),
    /// Security state name not recognised.
    UnknownSecurityState(String),
    /// Parameter or property name not recognised.
    UnknownParameter(String),
    /// No bloom engine is attached. Expected in degraded mode.
    EngineNotConnected,
}

impl fmt::Display for BloomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCategory(name) => write!(f, "unknown object category '{name}'"),
            Self::UnknownSecurityState(name) => {
                write!(f, "unknown security state '{name}'")
            }
            Self::UnknownParameter(name) => write!(f, "unknown parameter '{name}'"),
            Self::EngineNotConnected => f.write_str("no bloom engine connected"),
        }
    }
}

impl std::error::Error for BloomError {}
