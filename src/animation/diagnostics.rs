//! Health check and statistics of the animation system.

use serde::Serialize;

use super::action::WeightedAction;
use super::controller::{AnimationTransitionController, TransitionSnapshot};
use super::registry::ActionGroup;

/// Result of [`AnimationTransitionController::health_check`].
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// No issue was found.
    pub healthy: bool,
    /// Human-readable issues.
    pub issues: Vec<String>,
}

/// Counts for one action group.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GroupStats {
    /// Actions in the group.
    pub count: usize,
    /// Actions currently advancing.
    pub running: usize,
}

/// Result of [`AnimationTransitionController::detailed_stats`].
#[derive(Debug, Clone, Serialize)]
pub struct DetailedStats {
    /// Controller state.
    pub controller: TransitionSnapshot,
    /// Permanent group.
    pub permanent: GroupStats,
    /// Pose group.
    pub pose: GroupStats,
    /// Ring group.
    pub ring: GroupStats,
    /// Total mixer time in seconds.
    pub mixer_time: f32,
    /// Weight ramps in flight.
    pub active_ramps: usize,
    /// Crossfade records not yet swept.
    pub transition_records: usize,
}

impl AnimationTransitionController {
    /// Look for conditions that would make transitions misbehave.
    #[must_use]
    pub fn health_check(&self) -> HealthReport {
        let registry = self.registry();
        let mut issues = Vec::new();

        if self.mixer().is_empty() {
            issues.push("mixer holds no actions".to_owned());
        }
        if registry.group(ActionGroup::Permanent).is_empty() {
            issues.push("no permanent clips".to_owned());
        }
        if registry.group(ActionGroup::Pose).is_empty() {
            issues.push("no pose clips".to_owned());
        }
        for pair in registry.missing_pairs() {
            issues.push(format!("unpaired limb {} -> {}", pair.permanent, pair.pose));
        }
        for (_, action) in self.mixer().iter() {
            let w = action.weight();
            if !(0.0..=1.0).contains(&w) {
                issues.push(format!("{} has invalid weight {w}", action.name()));
            }
        }
        if self.is_transitioning() && self.fades().active_ramps() == 0 {
            let poses_running = registry
                .group(ActionGroup::Pose)
                .iter()
                .filter_map(|id| self.mixer().get(*id))
                .any(WeightedAction::is_running);
            if !poses_running {
                issues.push(format!(
                    "{} with nothing in flight; force_return recovers",
                    self.state()
                ));
            }
        }

        if !issues.is_empty() {
            log::warn!("animation health check: {} issues", issues.len());
        }
        HealthReport {
            healthy: issues.is_empty(),
            issues,
        }
    }

    /// Counts and timing of every action group.
    #[must_use]
    pub fn detailed_stats(&self) -> DetailedStats {
        let group_stats = |group| {
            let ids = self.registry().group(group);
            GroupStats {
                count: ids.len(),
                running: ids
                    .iter()
                    .filter_map(|id| self.mixer().get(*id))
                    .filter(|a| a.is_running())
                    .count(),
            }
        };
        DetailedStats {
            controller: self.snapshot(),
            permanent: group_stats(ActionGroup::Permanent),
            pose: group_stats(ActionGroup::Pose),
            ring: group_stats(ActionGroup::Ring),
            mixer_time: self.mixer().time(),
            active_ramps: self.fades().active_ramps(),
            transition_records: self.fades().records().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::animation::action::AnimationClip;
    use crate::animation::controller::AnimationTransitionController;
    use crate::options::AnimationOptions;
    use crate::scene::rig::eye_rig;

    #[test]
    fn eye_rig_is_healthy() {
        let c = AnimationTransitionController::new(&eye_rig().clips, &AnimationOptions::default());
        let report = c.health_check();
        assert!(report.healthy, "{:?}", report.issues);
    }

    #[test]
    fn empty_rig_reports_issues() {
        let c = AnimationTransitionController::new(
            &[AnimationClip::new("Other", 1.0)],
            &AnimationOptions::default(),
        );
        let report = c.health_check();
        assert!(!report.healthy);
        assert!(report.issues.iter().any(|i| i == "no pose clips"));
        assert!(report.issues.iter().any(|i| i.starts_with("unpaired limb")));
    }

    #[test]
    fn stats_count_running_actions() {
        let mut c = AnimationTransitionController::new(
            &eye_rig().clips,
            &AnimationOptions::default(),
        );
        let _ = c.start_permanent_animations();
        c.update(0.1);
        let stats = c.detailed_stats();
        assert_eq!(stats.permanent.count, 17);
        assert_eq!(stats.permanent.running, 17);
        assert_eq!(stats.pose.running, 0);
        assert_eq!(stats.active_ramps, 17);
        assert!((stats.mixer_time - 0.1).abs() < 1e-6);
    }
}
