//! Built-in eye/robot rig.
//!
//! Stands in for a decoded asset: the node names and clip names match the
//! authored model, so classification, pairing and transitions behave exactly
//! as they would on the real file.

use glam::Vec3;

use super::{Material, SceneGraph, Transform};
use crate::animation::action::AnimationClip;
use crate::util::color::from_hex;

/// A scene plus the animation clips authored for it.
#[derive(Debug, Clone)]
pub struct Rig {
    /// Scene graph of the model.
    pub scene: SceneGraph,
    /// Named animation clips.
    pub clips: Vec<AnimationClip>,
}

/// Loop clips driving the two large limbs that take part in pose
/// transitions, plus the two that never do.
pub const BIG_ARM_CLIPS: [&str; 4] =
    ["Bras_L1_Mouv", "Bras_L2_Mouv", "Bras_R1_Mouv", "Bras_R2_Mouv"];

/// Held-pose clips, one per transitioning limb.
pub const POSE_CLIPS: [&str; 2] = ["R1&R2_Pose", "R2&R1_Pose"];

/// Ring reveal clips.
pub const RING_CLIPS: [&str; 8] = [
    "Action_Ring",
    "Ring_BloomArea_1Action_Ring",
    "Ring_BloomArea_2Action_Ring",
    "Ring_BloomArea_3Action_Ring",
    "Ring_BloomArea_4Action_Ring",
    "Ring_BloomArea_5Action_Ring",
    "Ring_Ext_SG1Action_Ring",
    "Ring_Int_SG1Action_Ring",
];

/// Small-arm loop clip names.
#[must_use]
pub fn little_arm_clips() -> Vec<String> {
    (1..=13)
        .map(|i| {
            if i == 9 {
                "Arm_Little_9Action".to_owned()
            } else {
                format!("Little_{i}_Mouv")
            }
        })
        .collect()
}

/// Build the eye rig with its full clip set.
#[must_use]
pub fn eye_rig() -> Rig {
    let mut scene = SceneGraph::new("V3_Eye");
    let root = scene.root();

    let chrome = Material::new("Material-metal050-effet-chrome", [0.8; 3])
        .with_pbr(1.0, 0.05);
    let metal = Material::new("Material-Metal027", [0.6; 3]).with_pbr(0.9, 0.3);
    let bloom_area = Material::new("BloomArea", [0.2, 0.3, 0.4]).with_pbr(0.5, 0.4);
    let big_arm = Material::new("Material.003", [0.35; 3]).with_pbr(0.7, 0.35);
    let little_arm = Material::new("metalgrid3", [0.45; 3]).with_pbr(0.6, 0.5);

    let eye = scene.add_group(
        root,
        "Eye",
        Transform::from_translation(Vec3::new(0.0, 1.5, 0.0)),
    );
    let _ = scene.add_mesh(eye, "Anneaux_Eye_Ext", Transform::IDENTITY, chrome.clone());
    let _ = scene.add_mesh(eye, "Anneaux_Eye_Int", Transform::IDENTITY, chrome);
    let _ = scene.add_mesh(
        eye,
        "IRIS",
        Transform::from_translation(Vec3::new(0.0, 0.0, 0.05)),
        Material::new("iris", [0.1; 3]).with_emissive(from_hex(0x00_ff_88), 0.5),
    );
    let _ = scene.add_mesh(eye, "Dos_Eye", Transform::IDENTITY, metal.clone());
    let _ = scene.add_mesh(eye, "Pop_Sup", Transform::IDENTITY, metal.clone());
    let _ = scene.add_mesh(eye, "Pop_Inf", Transform::IDENTITY, metal);

    let rings = scene.add_group(root, "Rings", Transform::IDENTITY);
    for name in ["Ring_SG1", "Ring_Ext_SG1", "Ring_Int_SG1"] {
        let _ = scene.add_mesh(rings, name, Transform::IDENTITY, bloom_area.clone());
    }
    for i in 1..=5 {
        let _ = scene.add_mesh(
            rings,
            format!("Ring_BloomArea_{i}"),
            Transform::from_translation(Vec3::new(0.0, 0.0, -0.2 * i as f32)),
            bloom_area.clone(),
        );
    }

    let arms = scene.add_group(root, "Arms", Transform::IDENTITY);
    for (i, side) in ["L1", "L2", "R1", "R2"].iter().enumerate() {
        let x = if side.starts_with('L') { -1.0 } else { 1.0 };
        let _ = scene.add_mesh(
            arms,
            format!("BigArm_{side}"),
            Transform::from_translation(Vec3::new(x, 0.5 * i as f32, 0.0)),
            big_arm.clone(),
        );
    }
    for i in 1..=13 {
        let angle = i as f32 / 13.0 * std::f32::consts::TAU;
        let _ = scene.add_mesh(
            arms,
            format!("LittleArm_{i}"),
            Transform::from_translation(Vec3::new(angle.cos(), 0.0, angle.sin())),
            little_arm.clone(),
        );
    }

    let mut clips: Vec<AnimationClip> = BIG_ARM_CLIPS
        .iter()
        .map(|name| AnimationClip::new(*name, 4.0))
        .collect();
    clips.extend(little_arm_clips().into_iter().map(|name| AnimationClip::new(name, 3.0)));
    clips.extend(POSE_CLIPS.iter().map(|name| AnimationClip::new(*name, 3.2)));
    clips.extend(
        RING_CLIPS
            .iter()
            .enumerate()
            .map(|(i, name)| AnimationClip::new(*name, 2.0 + 0.15 * i as f32)),
    );

    Rig { scene, clips }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_has_all_clip_groups() {
        let rig = eye_rig();
        let names: Vec<&str> = rig.clips.iter().map(|c| c.name.as_str()).collect();
        for clip in BIG_ARM_CLIPS.iter().chain(&POSE_CLIPS).chain(&RING_CLIPS) {
            assert!(names.contains(clip), "missing {clip}");
        }
        assert_eq!(rig.clips.len(), 4 + 13 + 2 + 8);
    }

    #[test]
    fn rig_meshes_are_named() {
        let rig = eye_rig();
        assert!(rig.scene.find_by_name("Anneaux_Eye_Ext").is_some());
        assert!(rig.scene.find_by_name("IRIS").is_some());
        assert_eq!(rig.scene.meshes().count(), 6 + 8 + 4 + 13);
    }
}
