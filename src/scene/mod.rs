//! Scene graph: an arena of named nodes, some of which carry a mesh with a
//! PBR material.
//!
//! Nodes are addressed by [`NodeId`] handles which stay valid for the life
//! of the graph (nodes are never removed). Subsystems that need to touch a
//! mesh hold its `NodeId` and borrow the graph per call, so no component
//! keeps a second reference to a material.

pub mod rig;

use glam::{Mat4, Quat, Vec3};

use crate::util::color::{Rgb, BLACK};

/// Stable handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// PBR material of a mesh. Only the properties the viewer coordinates are
/// modelled; texture maps stay with the asset loader.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name as authored in the source asset.
    pub name: String,
    /// Base (albedo) colour.
    pub color: Rgb,
    /// Emissive colour.
    pub emissive: Rgb,
    /// Emissive strength multiplier.
    pub emissive_intensity: f32,
    /// Metalness in `[0, 1]`.
    pub metalness: f32,
    /// Roughness in `[0, 1]`.
    pub roughness: f32,
    /// Bumped on every write so the renderer knows to re-upload.
    pub version: u64,
}

impl Material {
    /// A non-emissive material with the given name and base colour.
    #[must_use]
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            color,
            emissive: BLACK,
            emissive_intensity: 1.0,
            metalness: 0.0,
            roughness: 1.0,
            version: 0,
        }
    }

    /// Builder: set the emissive colour and intensity.
    #[must_use]
    pub fn with_emissive(mut self, emissive: Rgb, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    /// Builder: set metalness and roughness.
    #[must_use]
    pub fn with_pbr(mut self, metalness: f32, roughness: f32) -> Self {
        self.metalness = metalness;
        self.roughness = roughness;
        self
    }

    /// Flag the material as modified.
    pub fn mark_dirty(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Whether the coordinated properties (emissive, emissive intensity,
    /// metalness, roughness) are bit-identical to `other`'s.
    #[must_use]
    pub fn same_surface(&self, other: &Self) -> bool {
        self.emissive.map(f32::to_bits) == other.emissive.map(f32::to_bits)
            && self.emissive_intensity.to_bits()
                == other.emissive_intensity.to_bits()
            && self.metalness.to_bits() == other.metalness.to_bits()
            && self.roughness.to_bits() == other.roughness.to_bits()
    }
}

/// Local transform of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub translation: Vec3,
    /// Rotation.
    pub rotation: Quat,
    /// Non-uniform scale.
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Transform with only a translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Local-to-parent matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Rotate about the local Z axis by `angle` radians.
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_z(angle)).normalize();
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name (mesh names drive object classification).
    pub name: String,
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Child nodes in insertion order.
    pub children: Vec<NodeId>,
    /// Local transform.
    pub transform: Transform,
    /// Material when this node is a mesh.
    pub material: Option<Material>,
    /// Whether the node is drawn. Hidden nodes keep their material.
    pub visible: bool,
}

impl SceneNode {
    /// Whether this node is a renderable mesh.
    #[must_use]
    pub fn is_mesh(&self) -> bool {
        self.material.is_some()
    }
}

/// Arena-backed scene tree.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// Create a graph containing only a root group node.
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![SceneNode {
                name: root_name.into(),
                parent: None,
                children: Vec::new(),
                transform: Transform::IDENTITY,
                material: None,
                visible: true,
            }],
        }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes (root included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds only its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(
        &mut self,
        parent: NodeId,
        name: String,
        transform: Transform,
        material: Option<Material>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            name,
            parent: Some(parent),
            children: Vec::new(),
            transform,
            material,
            visible: true,
        });
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    /// Add an empty group node under `parent`.
    pub fn add_group(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
    ) -> NodeId {
        self.push(parent, name.into(), transform, None)
    }

    /// Add a mesh node under `parent`.
    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
        material: Material,
    ) -> NodeId {
        self.push(parent, name.into(), transform, Some(material))
    }

    /// Borrow a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// Borrow a mesh's material.
    #[must_use]
    pub fn material(&self, id: NodeId) -> Option<&Material> {
        self.node(id).and_then(|n| n.material.as_ref())
    }

    /// Mutably borrow a mesh's material.
    pub fn material_mut(&mut self, id: NodeId) -> Option<&mut Material> {
        self.node_mut(id).and_then(|n| n.material.as_mut())
    }

    /// First node with exactly this name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.traverse()
            .find(|&id| self.node(id).is_some_and(|n| n.name == name))
    }

    /// Depth-first pre-order traversal from the root.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse {
            graph: self,
            stack: vec![self.root()],
        }
    }

    /// All mesh nodes in traversal order.
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> + '_ {
        self.traverse()
            .filter_map(move |id| self.node(id).filter(|n| n.is_mesh()).map(|n| (id, n)))
    }

    /// World (model-to-scene) matrix of a node.
    #[must_use]
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            cursor = node.parent;
        }
        matrix
    }

    /// Whether `id` and every ancestor are visible.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else {
                return false;
            };
            if !node.visible {
                return false;
            }
            cursor = node.parent;
        }
        true
    }

    /// World-space position of a node's origin.
    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_transform(id).transform_point3(Vec3::ZERO)
    }
}

/// Depth-first iterator over a [`SceneGraph`].
pub struct Traverse<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl Iterator for Traverse<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.graph.node(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_graph() -> (SceneGraph, NodeId, NodeId, NodeId) {
        let mut g = SceneGraph::new("root");
        let arm = g.add_group(
            g.root(),
            "arm",
            Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)),
        );
        let hand = g.add_mesh(
            arm,
            "hand",
            Transform::from_translation(Vec3::new(0.0, 2.0, 0.0)),
            Material::new("skin", [1.0, 1.0, 1.0]),
        );
        let eye = g.add_mesh(
            g.root(),
            "eye",
            Transform::IDENTITY,
            Material::new("chrome", [0.5, 0.5, 0.5]),
        );
        (g, arm, hand, eye)
    }

    #[test]
    fn traversal_is_preorder() {
        let (g, arm, hand, eye) = small_graph();
        let order: Vec<NodeId> = g.traverse().collect();
        assert_eq!(order, vec![g.root(), arm, hand, eye]);
    }

    #[test]
    fn meshes_skip_groups() {
        let (g, _, hand, eye) = small_graph();
        let meshes: Vec<NodeId> = g.meshes().map(|(id, _)| id).collect();
        assert_eq!(meshes, vec![hand, eye]);
    }

    #[test]
    fn world_transform_composes_parents() {
        let (g, _, hand, _) = small_graph();
        let p = g.world_position(hand);
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn hidden_parent_hides_children() {
        let (mut g, arm, hand, eye) = small_graph();
        assert!(g.is_visible(hand));
        g.node_mut(arm).unwrap().visible = false;
        assert!(!g.is_visible(hand));
        assert!(g.is_visible(eye));
    }

    #[test]
    fn find_by_name() {
        let (g, _, hand, _) = small_graph();
        assert_eq!(g.find_by_name("hand"), Some(hand));
        assert_eq!(g.find_by_name("missing"), None);
    }

    #[test]
    fn same_surface_ignores_version_and_name() {
        let a = Material::new("a", [0.0; 3]).with_pbr(0.8, 0.2);
        let mut b = a.clone();
        b.name = "b".into();
        b.mark_dirty();
        assert!(a.same_surface(&b));
        b.roughness = 0.3;
        assert!(!a.same_surface(&b));
    }
}
