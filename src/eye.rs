//! Spin of the two eye rings.
//!
//! Only node transforms are touched. Materials of the rings belong to the
//! bloom coordination center.

use crate::scene::{NodeId, SceneGraph};

/// Outer ring node name.
pub const OUTER_RING: &str = "Anneaux_Eye_Ext";
/// Inner ring node name.
pub const INNER_RING: &str = "Anneaux_Eye_Int";

const OUTER_RATE: f32 = 60.0;
const INNER_RATE: f32 = 80.0;
const MIN_SPEED: f32 = 0.001;
const MAX_SPEED: f32 = 0.1;
const DEFAULT_SPEED: f32 = 0.01;

/// Rotates the eye rings about their local Z axis, in opposite directions.
#[derive(Debug, Clone)]
pub struct EyeRingRotation {
    outer: Option<NodeId>,
    inner: Option<NodeId>,
    speed: f32,
    enabled: bool,
}

impl EyeRingRotation {
    /// Locate the rings in `scene`. Missing rings are skipped at update time.
    #[must_use]
    pub fn new(scene: &SceneGraph) -> Self {
        let outer = scene.find_by_name(OUTER_RING);
        let inner = scene.find_by_name(INNER_RING);
        if outer.is_none() && inner.is_none() {
            log::warn!("no eye rings in scene, rotation has nothing to drive");
        }
        Self {
            outer,
            inner,
            speed: DEFAULT_SPEED,
            enabled: true,
        }
    }

    /// Advance the spin by `dt` seconds.
    pub fn update(&self, dt: f32, scene: &mut SceneGraph) {
        if !self.enabled || dt <= 0.0 {
            return;
        }
        let step = self.speed * dt;
        for (node, angle) in [(self.outer, step * OUTER_RATE), (self.inner, -step * INNER_RATE)] {
            if let Some(node) = node.and_then(|id| scene.node_mut(id)) {
                node.transform.rotate_z(angle);
            }
        }
    }

    /// Start spinning.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop spinning. The rings keep their current angle.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Flip the enabled flag and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        log::info!("eye rotation {}", if self.enabled { "on" } else { "off" });
        self.enabled
    }

    /// Set the speed, clamped to `[0.001, 0.1]`.
    pub fn set_speed(&mut self, speed: f32) {
        if speed.is_nan() {
            return;
        }
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Current speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether the rings are spinning.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;
    use crate::scene::rig::eye_rig;

    fn angle_z(scene: &SceneGraph, name: &str) -> f32 {
        let id = scene.find_by_name(name).unwrap();
        let (axis, angle) = scene.node(id).unwrap().transform.rotation.to_axis_angle();
        angle * axis.z.signum()
    }

    #[test]
    fn rings_spin_in_opposite_directions() {
        let mut scene = eye_rig().scene;
        let rotation = EyeRingRotation::new(&scene);
        rotation.update(0.5, &mut scene);
        assert!((angle_z(&scene, OUTER_RING) - 0.3).abs() < 1e-4);
        assert!((angle_z(&scene, INNER_RING) + 0.4).abs() < 1e-4);
    }

    #[test]
    fn disabled_rotation_holds_angle() {
        let mut scene = eye_rig().scene;
        let mut rotation = EyeRingRotation::new(&scene);
        rotation.disable();
        rotation.update(1.0, &mut scene);
        let id = scene.find_by_name(OUTER_RING).unwrap();
        assert_eq!(scene.node(id).unwrap().transform.rotation, Quat::IDENTITY);
        assert!(rotation.toggle());
    }

    #[test]
    fn speed_is_clamped() {
        let scene = eye_rig().scene;
        let mut rotation = EyeRingRotation::new(&scene);
        rotation.set_speed(5.0);
        assert_eq!(rotation.speed(), 0.1);
        rotation.set_speed(0.0);
        assert_eq!(rotation.speed(), 0.001);
    }

    #[test]
    fn rotation_leaves_materials_alone() {
        let mut scene = eye_rig().scene;
        let id = scene.find_by_name(OUTER_RING).unwrap();
        let before = scene.material(id).unwrap().clone();
        EyeRingRotation::new(&scene).update(1.0, &mut scene);
        assert_eq!(scene.material(id).unwrap(), &before);
    }
}
