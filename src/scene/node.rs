use serde::{Deserialize, Serialize};

use super::core::{BoundingBox, Vec3};
use crate::config::surface::EngravingDesign;

/// One node of a loaded link geometry tree, as handed over by the asset
/// loader on the JS side. Only names, local bounds and hierarchy survive the
/// boundary; vertex data stays with the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<SceneNode>) -> Self {
        self.children = children;
        self
    }

    /// Depth-first traversal over this node and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &SceneNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            // Reverse keeps document order under the LIFO stack.
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Union of all local bounds in the tree. `None` when no node carries
    /// bounds at all.
    #[must_use]
    pub fn combined_bounds(&self) -> Option<BoundingBox> {
        self.walk()
            .filter_map(|node| node.bounds)
            .reduce(BoundingBox::union)
    }
}

/// World transform of one assembled link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub position: Vec3,
    /// Rotation about the Z axis, radians. Chain layout never rotates around
    /// any other axis.
    pub rotation_z: f64,
    pub scale: f64,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation_z: 0.0,
        scale: 1.0,
    };

    /// World-space bounds of `local` under this transform.
    #[must_use]
    pub fn apply_to_bounds(&self, local: BoundingBox) -> BoundingBox {
        local.transformed(self.scale, self.rotation_z, self.position)
    }
}

/// Derived visual state of one sub-mesh after materialization. Plain data so
/// the JS host can apply it to the retained renderer tree, and so two passes
/// can be compared for the scene diff.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshAppearance {
    pub mesh: String,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialPreset>,
    /// RGB tint in `0..=1`, used for gemstones and enamel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engraving: Option<EngravingDesign>,
}

/// Fixed render preset for one of the five body materials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPreset {
    pub diffuse: [f64; 3],
    pub specular: [f64; 3],
    pub transparency: f64,
    pub shine: f64,
}

#[cfg(test)]
mod tests {
    use super::{BoundingBox, SceneNode, Transform, Vec3};

    fn bounds(min: [f64; 3], max: [f64; 3]) -> BoundingBox {
        BoundingBox::new(Vec3::from_array(min), Vec3::from_array(max))
    }

    #[test]
    fn walk_visits_nodes_in_document_order() {
        let tree = SceneNode::new("root").with_children(vec![
            SceneNode::new("a").with_children(vec![SceneNode::new("a1")]),
            SceneNode::new("b"),
        ]);

        let names: Vec<&str> = tree.walk().map(|node| node.name.as_str()).collect();
        assert_eq!(names, ["root", "a", "a1", "b"]);
    }

    #[test]
    fn combined_bounds_unions_all_meshes() {
        let tree = SceneNode::new("root").with_children(vec![
            SceneNode::new("a").with_bounds(bounds([-1.0, 0.0, 0.0], [1.0, 1.0, 1.0])),
            SceneNode::new("b").with_bounds(bounds([0.0, -2.0, 0.0], [3.0, 0.0, 1.0])),
        ]);

        let combined = tree.combined_bounds().unwrap();
        assert_eq!(combined.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(combined.max, Vec3::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn combined_bounds_without_meshes_is_none() {
        assert!(SceneNode::new("leeg").combined_bounds().is_none());
    }

    #[test]
    fn transform_moves_bounds_into_world_space() {
        let transform = Transform {
            position: Vec3::new(10.0, 2.0, 0.0),
            rotation_z: 0.0,
            scale: 2.0,
        };
        let world = transform.apply_to_bounds(bounds([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]));

        assert!((world.min.x - 8.0).abs() < 1e-12);
        assert!((world.min.y - 0.0).abs() < 1e-12);
        assert!((world.max.x - 12.0).abs() < 1e-12);
    }
}
