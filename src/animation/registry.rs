//! Clip classification into permanent, pose and ring groups.

use serde::Serialize;

use super::action::{ActionId, ActionMixer, AnimationClip, LoopMode};
use crate::options::{AnimationOptions, LimbPair};

/// Semantic group a clip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionGroup {
    /// Continuous idle motion, looping.
    Permanent,
    /// Held discrete pose, play-once.
    Pose,
    /// Ring reveal started alongside a pose, play-once.
    Ring,
}

/// A permanent action paired with the pose action it crossfades into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limb {
    /// Looping action.
    pub permanent: ActionId,
    /// Play-once action.
    pub pose: ActionId,
}

/// Owns the mixer and knows which action belongs to which group.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    mixer: ActionMixer,
    permanent: Vec<ActionId>,
    pose: Vec<ActionId>,
    ring: Vec<ActionId>,
    ungrouped: Vec<ActionId>,
    limbs: Vec<Limb>,
    missing_pairs: Vec<LimbPair>,
}

impl ActionRegistry {
    /// Wrap every clip in an action and sort it into its group. Clips named
    /// in no group are still added to the mixer but never driven.
    #[must_use]
    pub fn build(clips: &[AnimationClip], options: &AnimationOptions) -> Self {
        let mut registry = Self::default();
        let in_list = |list: &[String], name: &str| list.iter().any(|n| n == name);

        for clip in clips {
            let name = clip.name.clone();
            let id = registry.mixer.add(clip.clone());
            let Some(action) = registry.mixer.get_mut(id) else {
                continue;
            };
            action.set_time_scale(options.initial_time_scale);

            if in_list(&options.permanent_clips, &name) {
                action.set_loop_mode(LoopMode::Repeat);
                registry.permanent.push(id);
            } else if in_list(&options.pose_clips, &name) {
                action.set_loop_mode(LoopMode::OnceAndHold);
                action.set_time_scale(options.pose_time_scale);
                registry.pose.push(id);
            } else if in_list(&options.ring_clips, &name) {
                action.set_loop_mode(LoopMode::OnceAndHold);
                action.set_time_scale(options.ring_time_scale);
                registry.ring.push(id);
            } else {
                log::debug!("clip '{name}' is not part of any action group");
                registry.ungrouped.push(id);
            }
        }

        for pair in &options.limb_pairs {
            let permanent = registry.find_in(ActionGroup::Permanent, &pair.permanent);
            let pose = registry.find_in(ActionGroup::Pose, &pair.pose);
            match (permanent, pose) {
                (Some(permanent), Some(pose)) => {
                    registry.limbs.push(Limb { permanent, pose });
                }
                _ => {
                    log::error!(
                        "limb pair {} -> {} is missing a clip",
                        pair.permanent,
                        pair.pose
                    );
                    registry.missing_pairs.push(pair.clone());
                }
            }
        }

        log::info!(
            "action registry: {} permanent, {} pose, {} ring, {} limbs",
            registry.permanent.len(),
            registry.pose.len(),
            registry.ring.len(),
            registry.limbs.len()
        );
        registry
    }

    /// The underlying mixer.
    #[must_use]
    pub fn mixer(&self) -> &ActionMixer {
        &self.mixer
    }

    /// Mutable access to the underlying mixer.
    pub fn mixer_mut(&mut self) -> &mut ActionMixer {
        &mut self.mixer
    }

    /// Actions of one group, in clip order.
    #[must_use]
    pub fn group(&self, group: ActionGroup) -> &[ActionId] {
        match group {
            ActionGroup::Permanent => &self.permanent,
            ActionGroup::Pose => &self.pose,
            ActionGroup::Ring => &self.ring,
        }
    }

    /// Group an action was sorted into.
    #[must_use]
    pub fn group_of(&self, id: ActionId) -> Option<ActionGroup> {
        [ActionGroup::Permanent, ActionGroup::Pose, ActionGroup::Ring]
            .into_iter()
            .find(|g| self.group(*g).contains(&id))
    }

    /// Clip names of one group.
    #[must_use]
    pub fn names(&self, group: ActionGroup) -> Vec<String> {
        self.group(group)
            .iter()
            .filter_map(|id| self.mixer.get(*id))
            .map(|a| a.name().to_owned())
            .collect()
    }

    /// Actions sorted into no group.
    #[must_use]
    pub fn ungrouped(&self) -> &[ActionId] {
        &self.ungrouped
    }

    /// Resolved permanent → pose pairs.
    #[must_use]
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    /// Configured pairs whose clips were not found.
    #[must_use]
    pub fn missing_pairs(&self) -> &[LimbPair] {
        &self.missing_pairs
    }

    /// The limb whose pose action is `pose`.
    #[must_use]
    pub fn limb_for_pose(&self, pose: ActionId) -> Option<Limb> {
        self.limbs.iter().copied().find(|l| l.pose == pose)
    }

    /// Look up an action by name within one group.
    #[must_use]
    pub fn find_in(&self, group: ActionGroup, name: &str) -> Option<ActionId> {
        self.group(group).iter().copied().find(|id| {
            self.mixer.get(*id).is_some_and(|a| a.name() == name)
        })
    }

    /// Stop everything and forget every action.
    pub fn clear(&mut self) {
        self.mixer.stop_all();
        self.mixer.clear();
        self.permanent.clear();
        self.pose.clear();
        self.ring.clear();
        self.ungrouped.clear();
        self.limbs.clear();
        self.missing_pairs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::rig::eye_rig;

    #[test]
    fn eye_rig_groups() {
        let rig = eye_rig();
        let registry = ActionRegistry::build(&rig.clips, &AnimationOptions::default());
        assert_eq!(registry.group(ActionGroup::Permanent).len(), 17);
        assert_eq!(registry.group(ActionGroup::Pose).len(), 2);
        assert_eq!(registry.group(ActionGroup::Ring).len(), 8);
        assert_eq!(registry.limbs().len(), 2);
        assert!(registry.missing_pairs().is_empty());
        assert!(registry.ungrouped().is_empty());
    }

    #[test]
    fn group_settings_applied() {
        let opts = AnimationOptions::default();
        let registry = ActionRegistry::build(&eye_rig().clips, &opts);
        let mixer = registry.mixer();
        for id in registry.group(ActionGroup::Pose) {
            let a = mixer.get(*id).unwrap();
            assert_eq!(a.loop_mode(), LoopMode::OnceAndHold);
            assert_eq!(a.time_scale(), opts.pose_time_scale);
        }
        for id in registry.group(ActionGroup::Permanent) {
            let a = mixer.get(*id).unwrap();
            assert_eq!(a.loop_mode(), LoopMode::Repeat);
            assert_eq!(a.time_scale(), opts.initial_time_scale);
        }
    }

    #[test]
    fn limb_lookup_by_pose() {
        let registry = ActionRegistry::build(&eye_rig().clips, &AnimationOptions::default());
        let pose = registry.find_in(ActionGroup::Pose, "R2&R1_Pose").unwrap();
        let limb = registry.limb_for_pose(pose).unwrap();
        assert_eq!(
            registry.mixer().get(limb.permanent).unwrap().name(),
            "Bras_R2_Mouv"
        );
        assert_eq!(registry.group_of(pose), Some(ActionGroup::Pose));
    }

    #[test]
    fn missing_pose_clip_is_reported() {
        let clips = vec![
            AnimationClip::new("Bras_R1_Mouv", 4.0),
            AnimationClip::new("Bras_R2_Mouv", 4.0),
            AnimationClip::new("R1&R2_Pose", 3.0),
            AnimationClip::new("Extra", 1.0),
        ];
        let registry = ActionRegistry::build(&clips, &AnimationOptions::default());
        assert_eq!(registry.limbs().len(), 1);
        assert_eq!(registry.missing_pairs().len(), 1);
        assert_eq!(registry.missing_pairs()[0].pose, "R2&R1_Pose");
        assert_eq!(registry.ungrouped().len(), 1);
    }
}
