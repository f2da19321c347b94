use super::{EntityId, EntityKind, RayHit, SceneGraph, SceneIntersector};
use crate::{Matrix3, Matrix4, Point3, Result, Transform, UnitVec3};
use parry3d_f64::query::{Ray, RayCast};
use parry3d_f64::shape::{FeatureId, TriMesh};

/// A single entity in a `Scene`.
#[derive(Clone)]
pub struct SceneObject {
    pub name: String,
    pub kind: EntityKind,
    pub parent: Option<EntityId>,

    /// Placement relative to the parent, or to the world if there is no parent
    pub local: Transform,

    /// Entities which are not ray visible are skipped by `cast`, which is how a mesh sensor body
    /// is kept from shadowing its own beams.
    pub ray_visible: bool,

    geometry: Option<TriMesh>,
}

impl SceneObject {
    pub fn geometry(&self) -> Option<&TriMesh> {
        self.geometry.as_ref()
    }
}

/// A minimal scene graph of named entities arranged in a parent/child hierarchy. Entities are
/// stored in insertion order and a parent must exist before its children are added, so the
/// hierarchy can never contain a cycle.
#[derive(Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, id: EntityId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    /// Find the first entity with the given name.
    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.objects
            .iter()
            .position(|o| o.name == name)
            .map(EntityId)
    }

    fn push(
        &mut self,
        name: &str,
        kind: EntityKind,
        parent: Option<EntityId>,
        local: Transform,
        geometry: Option<TriMesh>,
    ) -> Result<EntityId> {
        if let Some(p) = parent {
            if p.0 >= self.objects.len() {
                return Err(format!("parent entity {} does not exist", p.0).into());
            }
        }

        self.objects.push(SceneObject {
            name: name.to_string(),
            kind,
            parent,
            local,
            ray_visible: true,
            geometry,
        });

        Ok(EntityId(self.objects.len() - 1))
    }

    /// Add a placeholder entity with no geometry.
    pub fn add_empty(
        &mut self,
        name: &str,
        parent: Option<EntityId>,
        local: Transform,
    ) -> Result<EntityId> {
        self.push(name, EntityKind::Empty, parent, local, None)
    }

    /// Add an entity which is neither a mesh nor an empty, such as a camera or a light. These
    /// take part in the hierarchy but cannot be hit and cannot be used as a sensor.
    pub fn add_other(
        &mut self,
        name: &str,
        parent: Option<EntityId>,
        local: Transform,
    ) -> Result<EntityId> {
        self.push(name, EntityKind::Other, parent, local, None)
    }

    /// Add a triangle mesh entity. The vertices are in the entity's local frame.
    ///
    /// # Arguments
    ///
    /// * `name`: the entity name
    /// * `parent`: an optional parent entity, which must already exist in the scene
    /// * `local`: the placement of the entity relative to its parent
    /// * `vertices`: the mesh vertices in local coordinates
    /// * `triangles`: the vertex indices of each triangle
    ///
    /// returns: Result<EntityId, Box<dyn Error, Global>>
    pub fn add_mesh(
        &mut self,
        name: &str,
        parent: Option<EntityId>,
        local: Transform,
        vertices: Vec<Point3>,
        triangles: Vec<[u32; 3]>,
    ) -> Result<EntityId> {
        let n = vertices.len();
        if let Some(t) = triangles.iter().find(|t| t.iter().any(|&i| i as usize >= n)) {
            return Err(format!("triangle {t:?} indexes past the {n} vertices of '{name}'").into());
        }
        let mesh = TriMesh::new(vertices, triangles)?;
        self.push(name, EntityKind::Mesh, parent, local, Some(mesh))
    }

    /// Add a rectangular plane mesh lying in the local XY plane, centered on the local origin,
    /// with its normal facing local +Z.
    pub fn add_plane(
        &mut self,
        name: &str,
        parent: Option<EntityId>,
        local: Transform,
        half_x: f64,
        half_y: f64,
    ) -> Result<EntityId> {
        let vertices = vec![
            Point3::new(-half_x, -half_y, 0.0),
            Point3::new(half_x, -half_y, 0.0),
            Point3::new(half_x, half_y, 0.0),
            Point3::new(-half_x, half_y, 0.0),
        ];
        let triangles = vec![[0, 1, 2], [0, 2, 3]];
        self.add_mesh(name, parent, local, vertices, triangles)
    }

    /// Add an axis-aligned box mesh centered on the local origin with outward facing triangles.
    pub fn add_box(
        &mut self,
        name: &str,
        parent: Option<EntityId>,
        local: Transform,
        half_x: f64,
        half_y: f64,
        half_z: f64,
    ) -> Result<EntityId> {
        let (x, y, z) = (half_x, half_y, half_z);
        let vertices = vec![
            Point3::new(-x, -y, -z),
            Point3::new(x, -y, -z),
            Point3::new(x, y, -z),
            Point3::new(-x, y, -z),
            Point3::new(-x, -y, z),
            Point3::new(x, -y, z),
            Point3::new(x, y, z),
            Point3::new(-x, y, z),
        ];
        let triangles = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];
        self.add_mesh(name, parent, local, vertices, triangles)
    }

    pub fn set_local(&mut self, id: EntityId, local: Transform) -> Result<()> {
        let obj = self
            .objects
            .get_mut(id.0)
            .ok_or_else(|| format!("entity {} does not exist", id.0))?;
        obj.local = local;
        Ok(())
    }

    pub fn set_ray_visible(&mut self, id: EntityId, visible: bool) -> Result<()> {
        let obj = self
            .objects
            .get_mut(id.0)
            .ok_or_else(|| format!("entity {} does not exist", id.0))?;
        obj.ray_visible = visible;
        Ok(())
    }
}

impl SceneGraph for Scene {
    fn kind(&self, entity: EntityId) -> Option<EntityKind> {
        self.object(entity).map(|o| o.kind)
    }

    fn world_transform(&self, entity: EntityId) -> Option<Matrix4> {
        let mut obj = self.object(entity)?;
        let mut m = obj.local.to_matrix();
        while let Some(parent) = obj.parent {
            obj = self.object(parent)?;
            m = obj.local.to_matrix() * m;
        }

        Some(m)
    }
}

impl SceneIntersector for Scene {
    fn cast(&self, origin: &Point3, direction: &UnitVec3, max_distance: f64) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        let mut best_toi = max_distance;

        for (i, obj) in self.objects.iter().enumerate() {
            if !obj.ray_visible {
                continue;
            }
            let Some(mesh) = &obj.geometry else {
                continue;
            };

            // The ray is moved into the mesh's local frame rather than moving the mesh into the
            // world. Because the world direction has unit length, the time of impact along the
            // transformed ray is still the world distance, even if the entity is scaled.
            let Some(world) = self.world_transform(EntityId(i)) else {
                continue;
            };
            let Some(inv) = world.try_inverse() else {
                continue;
            };
            let ray = Ray::new(
                inv.transform_point(origin),
                inv.transform_vector(&direction.into_inner()),
            );

            if let Some(ri) = mesh.cast_local_ray_and_get_normal(&ray, best_toi, false) {
                if ri.time_of_impact > best_toi {
                    continue;
                }

                // Normals transform with the inverse transpose of the linear part
                let inv_t: Matrix3 = inv.fixed_view::<3, 3>(0, 0).transpose();
                let normal = UnitVec3::try_new(inv_t * ri.normal, 1.0e-12)
                    .unwrap_or_else(|| UnitVec3::new_normalize(ri.normal));

                let n_tris = mesh.indices().len() as u32;
                let face_index = match ri.feature {
                    FeatureId::Face(f) if f >= n_tris => Some(f - n_tris),
                    FeatureId::Face(f) => Some(f),
                    _ => None,
                };

                best_toi = ri.time_of_impact;
                best = Some(RayHit {
                    location: origin + direction.into_inner() * ri.time_of_impact,
                    normal,
                    face_index,
                });
            }
        }

        best
    }
}
