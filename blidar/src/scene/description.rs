//! Serializable description of a scene, used to load scenes from JSON files.

use super::{EntityId, EntityKind, Scene};
use crate::{Point3, Result, Transform, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDescription {
    /// A rectangle in the local XY plane, facing local +Z
    Plane { half_x: f64, half_y: f64 },

    /// An axis-aligned box centered on the local origin
    Box { half_x: f64, half_y: f64, half_z: f64 },

    /// Arbitrary triangle geometry in local coordinates
    Triangles {
        vertices: Vec<[f64; 3]>,
        triangles: Vec<[u32; 3]>,
    },
}

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn visible() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub name: String,

    /// Name of the parent object, which must appear earlier in the description
    #[serde(default)]
    pub parent: Option<String>,

    /// Kind of an object without a shape. Objects with a shape are always meshes.
    #[serde(default)]
    pub kind: Option<EntityKind>,

    #[serde(default)]
    pub translation: [f64; 3],

    /// XYZ Euler angles in radians
    #[serde(default)]
    pub rotation: [f64; 3],

    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],

    #[serde(default)]
    pub shape: Option<ShapeDescription>,

    #[serde(default = "visible")]
    pub ray_visible: bool,
}

impl ObjectDescription {
    fn transform(&self) -> Transform {
        let [tx, ty, tz] = self.translation;
        let [rx, ry, rz] = self.rotation;
        let [sx, sy, sz] = self.scale;
        Transform {
            translation: Vector3::new(tx, ty, tz),
            rotation: UnitQuaternion::from_euler_angles(rx, ry, rz),
            scale: Vector3::new(sx, sy, sz),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    pub objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Build a `Scene` from the description, resolving parent names into entity references.
    pub fn build(&self) -> Result<Scene> {
        let mut scene = Scene::new();
        for obj in &self.objects {
            let parent = match &obj.parent {
                Some(name) => Some(scene.find(name).ok_or_else(|| {
                    format!("parent '{}' of '{}' is not defined before it", name, obj.name)
                })?),
                None => None,
            };

            let local = obj.transform();
            let id: EntityId = match (&obj.shape, obj.kind) {
                (Some(_), Some(k)) if k != EntityKind::Mesh => {
                    return Err(format!("'{}' has a shape but is not a mesh", obj.name).into());
                }
                (Some(ShapeDescription::Plane { half_x, half_y }), _) => {
                    scene.add_plane(&obj.name, parent, local, *half_x, *half_y)?
                }
                (
                    Some(ShapeDescription::Box {
                        half_x,
                        half_y,
                        half_z,
                    }),
                    _,
                ) => scene.add_box(&obj.name, parent, local, *half_x, *half_y, *half_z)?,
                (
                    Some(ShapeDescription::Triangles {
                        vertices,
                        triangles,
                    }),
                    _,
                ) => {
                    let vertices = vertices
                        .iter()
                        .map(|[x, y, z]| Point3::new(*x, *y, *z))
                        .collect();
                    scene.add_mesh(&obj.name, parent, local, vertices, triangles.clone())?
                }
                (None, Some(EntityKind::Mesh)) => {
                    return Err(format!("mesh '{}' has no shape", obj.name).into());
                }
                (None, Some(EntityKind::Other)) => scene.add_other(&obj.name, parent, local)?,
                (None, _) => scene.add_empty(&obj.name, parent, local)?,
            };

            if !obj.ray_visible {
                scene.set_ray_visible(id, false)?;
            }
        }

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneGraph, SceneIntersector};
    use approx::assert_relative_eq;

    const ROOM: &str = r#"{
        "objects": [
            { "name": "rig", "translation": [0.0, 0.0, 1.0] },
            { "name": "lidar", "parent": "rig", "ray_visible": false,
              "shape": { "type": "box", "half_x": 0.1, "half_y": 0.1, "half_z": 0.1 } },
            { "name": "wall", "translation": [0.0, -4.0, 1.0], "rotation": [1.5707963267948966, 0.0, 0.0],
              "shape": { "type": "plane", "half_x": 5.0, "half_y": 5.0 } },
            { "name": "lamp", "kind": "other" }
        ]
    }"#;

    #[test]
    fn build_room() {
        let scene = SceneDescription::from_json_str(ROOM).unwrap().build().unwrap();
        assert_eq!(scene.len(), 4);

        let lidar = scene.find("lidar").unwrap();
        assert_eq!(scene.kind(lidar), Some(EntityKind::Mesh));
        assert_eq!(scene.kind(scene.find("rig").unwrap()), Some(EntityKind::Empty));
        assert_eq!(scene.kind(scene.find("lamp").unwrap()), Some(EntityKind::Other));

        let origin = scene
            .world_transform(lidar)
            .unwrap()
            .transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);

        // The sensor body is hidden, so the first thing along -Y is the wall
        let hit = scene.cast(&origin, &-Vector3::y_axis(), 10.0).unwrap();
        assert_relative_eq!(hit.location.y, -4.0, epsilon = 1e-9);
    }

    #[test]
    fn parent_defined_later_fails() {
        let text = r#"{ "objects": [ { "name": "a", "parent": "b" }, { "name": "b" } ] }"#;
        let desc = SceneDescription::from_json_str(text).unwrap();
        assert!(desc.build().is_err());
    }

    #[test]
    fn mesh_without_shape_fails() {
        let text = r#"{ "objects": [ { "name": "a", "kind": "mesh" } ] }"#;
        let desc = SceneDescription::from_json_str(text).unwrap();
        assert!(desc.build().is_err());
    }

    #[test]
    fn triangle_index_out_of_range_fails() {
        let text = r#"{ "objects": [ { "name": "tri", "shape": {
            "type": "triangles",
            "vertices": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            "triangles": [[0, 1, 7]]
        } } ] }"#;
        let desc = SceneDescription::from_json_str(text).unwrap();
        assert!(desc.build().is_err());
    }
}
