//! Zone-driven visibility of the magic rings.
//!
//! A ring is hidden while its world position lies inside the trigger zone
//! and shown everywhere else. "Show all" overrides the zone and is on at
//! startup. Only the `visible` flag of the ring nodes is written: their
//! materials stay with the bloom coordination center.

use glam::Vec3;
use serde::Serialize;

use crate::options::RevealOptions;
use crate::scene::{NodeId, SceneGraph};

const MIN_RADIUS: f32 = 0.5;

/// Sphere of `radius` around `center`, cut to `height` above and below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerZone {
    /// World-space centre.
    pub center: Vec3,
    /// Reach from the centre, at least `0.5`.
    pub radius: f32,
    /// Vertical half-extent.
    pub height: f32,
}

impl TriggerZone {
    /// A zone with `radius` raised to `0.5` and a non-negative `height`.
    #[must_use]
    pub fn new(center: Vec3, radius: f32, height: f32) -> Self {
        let radius = radius.max(MIN_RADIUS);
        let height = if height.is_nan() { 0.0 } else { height.abs() };
        Self {
            center,
            radius,
            height,
        }
    }

    /// Whether `point` lies inside the zone.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.distance(self.center) <= self.radius
            && (point.y - self.center.y).abs() <= self.height
    }
}

impl From<&RevealOptions> for TriggerZone {
    fn from(options: &RevealOptions) -> Self {
        Self::new(Vec3::from_array(options.center), options.radius, options.height)
    }
}

/// Ring visibility counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RingStats {
    /// Rings drawn.
    pub visible: usize,
    /// Rings hidden.
    pub hidden: usize,
    /// Rings tracked.
    pub total: usize,
    /// Whether the zone is overridden.
    pub force_show: bool,
}

/// One ring as seen from the zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingInfo {
    /// Mesh name.
    pub name: String,
    /// World position.
    pub position: [f32; 3],
    /// Distance to the zone centre.
    pub distance: f32,
    /// Whether the ring lies in the zone.
    pub in_zone: bool,
    /// Whether the ring is drawn.
    pub visible: bool,
}

/// Shows and hides the magic rings from the trigger zone.
#[derive(Debug, Clone)]
pub struct RingReveal {
    rings: Vec<NodeId>,
    zone: TriggerZone,
    initial_zone: TriggerZone,
    force_show_all: bool,
}

impl RingReveal {
    /// Track `rings` with the zone and override from `options`.
    #[must_use]
    pub fn new(rings: Vec<NodeId>, options: &RevealOptions) -> Self {
        if rings.is_empty() {
            log::warn!("no rings to reveal");
        }
        let zone = TriggerZone::from(options);
        Self {
            rings,
            zone,
            initial_zone: zone,
            force_show_all: options.force_show_all,
        }
    }

    /// Apply the zone to every ring. Does nothing while all rings are
    /// forced visible. Returns how many rings changed visibility.
    pub fn update(&self, scene: &mut SceneGraph) -> usize {
        if self.force_show_all {
            return 0;
        }
        let mut changed = 0;
        for &ring in &self.rings {
            let shown = !self.zone.contains(scene.world_position(ring));
            if let Some(node) = scene.node_mut(ring) {
                if node.visible != shown {
                    node.visible = shown;
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            log::debug!("ring reveal: {changed} rings changed visibility");
        }
        changed
    }

    /// Turn the override on (every ring shown) or off (zone reapplied now).
    pub fn set_force_show_all(&mut self, force: bool, scene: &mut SceneGraph) {
        self.force_show_all = force;
        if force {
            self.set_all(true, scene);
        } else {
            let _ = self.update(scene);
        }
        log::info!("force show rings {}", if force { "on" } else { "off" });
    }

    /// Flip the override and return the new value.
    pub fn toggle_force_show_all(&mut self, scene: &mut SceneGraph) -> bool {
        let force = !self.force_show_all;
        self.set_force_show_all(force, scene);
        force
    }

    /// Whether every ring is forced visible.
    #[must_use]
    pub fn force_show_all(&self) -> bool {
        self.force_show_all
    }

    /// Current trigger zone.
    #[must_use]
    pub fn zone(&self) -> TriggerZone {
        self.zone
    }

    /// Replace the trigger zone. Takes effect on the next update.
    pub fn set_trigger_zone(&mut self, zone: TriggerZone) {
        self.zone = TriggerZone::new(zone.center, zone.radius, zone.height);
        log::debug!(
            "reveal zone at {:?}, radius {}, height {}",
            self.zone.center,
            self.zone.radius,
            self.zone.height
        );
    }

    /// Shift the zone centre by `delta`.
    pub fn move_zone(&mut self, delta: Vec3) {
        let zone = self.zone;
        self.set_trigger_zone(TriggerZone {
            center: zone.center + delta,
            ..zone
        });
    }

    /// Grow or shrink the radius by `delta` and return the new radius.
    pub fn resize_zone(&mut self, delta: f32) -> f32 {
        let zone = self.zone;
        self.set_trigger_zone(TriggerZone {
            radius: zone.radius + delta,
            ..zone
        });
        self.zone.radius
    }

    /// Back to the configured zone.
    pub fn reset_zone(&mut self) {
        self.zone = self.initial_zone;
    }

    /// Show or hide one ring by name. The next update overrides it unless
    /// all rings are forced visible. Returns `false` for an unknown ring.
    pub fn show_ring(&self, name: &str, show: bool, scene: &mut SceneGraph) -> bool {
        let Some(ring) = self
            .rings
            .iter()
            .copied()
            .find(|&id| scene.node(id).is_some_and(|n| n.name == name))
        else {
            log::warn!("no ring named {name}");
            return false;
        };
        if let Some(node) = scene.node_mut(ring) {
            node.visible = show;
        }
        true
    }

    /// Hide every ring.
    pub fn hide_all(&self, scene: &mut SceneGraph) {
        self.set_all(false, scene);
    }

    fn set_all(&self, visible: bool, scene: &mut SceneGraph) {
        for &ring in &self.rings {
            if let Some(node) = scene.node_mut(ring) {
                node.visible = visible;
            }
        }
    }

    /// Tracked ring nodes.
    #[must_use]
    pub fn rings(&self) -> &[NodeId] {
        &self.rings
    }

    /// Visibility counts.
    #[must_use]
    pub fn stats(&self, scene: &SceneGraph) -> RingStats {
        let visible = self
            .rings
            .iter()
            .filter(|&&id| scene.node(id).is_some_and(|n| n.visible))
            .count();
        RingStats {
            visible,
            hidden: self.rings.len() - visible,
            total: self.rings.len(),
            force_show: self.force_show_all,
        }
    }

    /// Position and zone membership of every ring.
    #[must_use]
    pub fn ring_info(&self, scene: &SceneGraph) -> Vec<RingInfo> {
        self.rings
            .iter()
            .filter_map(|&id| {
                let node = scene.node(id)?;
                let position = scene.world_position(id);
                Some(RingInfo {
                    name: node.name.clone(),
                    position: position.to_array(),
                    distance: position.distance(self.zone.center),
                    in_zone: self.zone.contains(position),
                    visible: node.visible,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Material, Transform};

    fn ring_scene() -> (SceneGraph, Vec<NodeId>) {
        let mut scene = SceneGraph::new("root");
        let group = scene.add_group(
            scene.root(),
            "Rings",
            Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)),
        );
        let rings = (0..3u8)
            .map(|i| {
                scene.add_mesh(
                    group,
                    format!("Ring_{i}"),
                    Transform::from_translation(Vec3::new(f32::from(i) * 2.0, 0.0, 0.0)),
                    Material::new("ring", [1.0; 3]),
                )
            })
            .collect();
        (scene, rings)
    }

    fn zone_on_first_ring() -> RevealOptions {
        RevealOptions {
            center: [0.0, 1.0, 0.0],
            radius: 1.0,
            height: 0.5,
            force_show_all: false,
        }
    }

    #[test]
    fn zone_clamps_radius_and_height() {
        let zone = TriggerZone::new(Vec3::ZERO, 0.1, -0.4);
        assert_eq!(zone.radius, 0.5);
        assert_eq!(zone.height, 0.4);
        assert!(zone.contains(Vec3::new(0.3, 0.3, 0.0)));
        assert!(!zone.contains(Vec3::new(0.0, 0.45, 0.0)));
    }

    #[test]
    fn rings_in_zone_are_hidden() {
        let (mut scene, rings) = ring_scene();
        let reveal = RingReveal::new(rings.clone(), &zone_on_first_ring());
        assert_eq!(reveal.update(&mut scene), 1);
        assert!(!scene.node(rings[0]).unwrap().visible);
        assert!(scene.node(rings[1]).unwrap().visible);
        assert_eq!(reveal.update(&mut scene), 0);

        let stats = reveal.stats(&scene);
        assert_eq!((stats.visible, stats.hidden, stats.total), (2, 1, 3));
    }

    #[test]
    fn force_show_all_overrides_zone() {
        let (mut scene, rings) = ring_scene();
        let mut reveal = RingReveal::new(rings.clone(), &zone_on_first_ring());
        let _ = reveal.update(&mut scene);

        assert!(reveal.toggle_force_show_all(&mut scene));
        assert!(scene.node(rings[0]).unwrap().visible);
        assert_eq!(reveal.update(&mut scene), 0);
        assert!(reveal.stats(&scene).force_show);

        reveal.set_force_show_all(false, &mut scene);
        assert!(!scene.node(rings[0]).unwrap().visible);
    }

    #[test]
    fn moving_the_zone_moves_the_hidden_ring() {
        let (mut scene, rings) = ring_scene();
        let mut reveal = RingReveal::new(rings.clone(), &zone_on_first_ring());
        reveal.move_zone(Vec3::new(2.0, 0.0, 0.0));
        let _ = reveal.update(&mut scene);
        assert!(scene.node(rings[0]).unwrap().visible);
        assert!(!scene.node(rings[1]).unwrap().visible);

        assert_eq!(reveal.resize_zone(-5.0), 0.5);
        reveal.reset_zone();
        assert_eq!(reveal.zone(), TriggerZone::from(&zone_on_first_ring()));
    }

    #[test]
    fn reveal_never_touches_materials() {
        let (mut scene, rings) = ring_scene();
        let before: Vec<_> = rings.iter().map(|&id| scene.material(id).cloned()).collect();
        let mut reveal = RingReveal::new(rings.clone(), &zone_on_first_ring());
        let _ = reveal.update(&mut scene);
        reveal.hide_all(&mut scene);
        reveal.set_force_show_all(true, &mut scene);
        let after: Vec<_> = rings.iter().map(|&id| scene.material(id).cloned()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn single_ring_override_and_info() {
        let (mut scene, rings) = ring_scene();
        let reveal = RingReveal::new(rings, &zone_on_first_ring());
        assert!(reveal.show_ring("Ring_2", false, &mut scene));
        assert!(!reveal.show_ring("Ring_9", false, &mut scene));

        let info = reveal.ring_info(&scene);
        assert_eq!(info.len(), 3);
        assert!(info[0].in_zone);
        assert_eq!(info[0].distance, 0.0);
        assert_eq!(info[2].position, [4.0, 1.0, 0.0]);
        assert!(!info[2].visible);
    }
}
