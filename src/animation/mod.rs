//! Skeletal action blending and the permanent ⇄ pose transition machine.
//!
//! - [`action`]: clips, weighted actions and the mixer that advances them.
//! - [`registry`]: sorts clips into permanent, pose and ring groups.
//! - [`crossfade`]: eased weight ramps between actions.
//! - [`controller`]: the transition state machine.

pub mod action;
pub mod controller;
pub mod crossfade;
/// Health check and statistics.
pub mod diagnostics;
pub mod registry;

pub use action::{ActionId, ActionMixer, AnimationClip, LoopMode, WeightedAction};
pub use controller::{
    AnimationTransitionController, TransitionError, TransitionSnapshot,
    TransitionState,
};
pub use crossfade::CrossfadeEngine;
pub use registry::{ActionGroup, ActionRegistry};
