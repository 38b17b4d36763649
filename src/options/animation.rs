use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scene::rig::{little_arm_clips, BIG_ARM_CLIPS, POSE_CLIPS, RING_CLIPS};
use crate::util::easing::EasingFunction;

/// A permanent clip and the pose clip it hands over to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LimbPair {
    /// Looping clip that plays while the limb is in its permanent state.
    pub permanent: String,
    /// Play-once clip the limb crossfades into.
    pub pose: String,
}

impl LimbPair {
    fn new(permanent: &str, pose: &str) -> Self {
        Self {
            permanent: permanent.to_owned(),
            pose: pose.to_owned(),
        }
    }
}

/// Transition timing and clip grouping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
pub struct AnimationOptions {
    /// Crossfade length in seconds.
    #[schemars(title = "Fade Duration", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub fade_duration: f32,
    /// Curve of every action weight ramp.
    #[schemars(skip)]
    pub crossfade_easing: EasingFunction,
    /// Time scale given to every clip at load.
    #[schemars(title = "Speed", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub initial_time_scale: f32,
    /// Time scale of pose clips.
    #[schemars(skip)]
    pub pose_time_scale: f32,
    /// Time scale of ring clips at load.
    #[schemars(skip)]
    pub ring_time_scale: f32,
    /// Shared time scale applied to every ring when a transition starts.
    #[schemars(title = "Ring Sync Speed", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub sync_time_scale: f32,
    /// Seconds `force_return` waits before forcing the permanent state.
    #[schemars(skip)]
    pub force_return_grace: f32,
    /// Looping clips that make up the permanent group.
    #[schemars(skip)]
    pub permanent_clips: Vec<String>,
    /// Play-once clips that make up the pose group.
    #[schemars(skip)]
    pub pose_clips: Vec<String>,
    /// Ring reveal clips started alongside a pose transition.
    #[schemars(skip)]
    pub ring_clips: Vec<String>,
    /// Permanent → pose pairings. Permanent clips without a pair keep
    /// looping through transitions.
    #[schemars(skip)]
    pub limb_pairs: Vec<LimbPair>,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        let mut permanent_clips: Vec<String> =
            BIG_ARM_CLIPS.iter().map(|s| (*s).to_owned()).collect();
        permanent_clips.extend(little_arm_clips());
        Self {
            fade_duration: 1.5,
            crossfade_easing: EasingFunction::CROSSFADE,
            initial_time_scale: 0.6,
            pose_time_scale: 0.8,
            ring_time_scale: 0.6,
            sync_time_scale: 0.8,
            force_return_grace: 0.1,
            permanent_clips,
            pose_clips: POSE_CLIPS.iter().map(|s| (*s).to_owned()).collect(),
            ring_clips: RING_CLIPS.iter().map(|s| (*s).to_owned()).collect(),
            limb_pairs: vec![
                LimbPair::new("Bras_R1_Mouv", "R1&R2_Pose"),
                LimbPair::new("Bras_R2_Mouv", "R2&R1_Pose"),
            ],
        }
    }
}
