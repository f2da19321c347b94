//! This module holds the scene-side collaborators of the sensor: the interfaces through which
//! the scanner reads entity transforms and casts rays, along with `Scene`, a small in-memory
//! scene graph built on parry triangle meshes which implements both of them.

mod description;
mod world;

use crate::{Matrix4, Point3, UnitVec3};
use serde::{Deserialize, Serialize};

pub use description::{ObjectDescription, SceneDescription, ShapeDescription};
pub use world::{Scene, SceneObject};

/// Opaque reference to an entity in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub usize);

/// The broad category of a scene entity, which decides whether it can serve as a sensor and how
/// the sensor behaves when a beam misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// An entity with triangle geometry
    Mesh,

    /// A placeholder entity with a transform but no geometry
    Empty,

    /// Anything else (cameras, lights, curves...)
    Other,
}

/// The nearest intersection of a ray with the scene geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space location of the hit
    pub location: Point3,

    /// World-space surface normal at the hit
    pub normal: UnitVec3,

    /// Index of the triangle that was hit, if the geometry has triangles
    pub face_index: Option<u32>,
}

/// Read access to the structure of a scene graph.
pub trait SceneGraph {
    /// Returns the kind of an entity, or `None` if the entity does not exist.
    fn kind(&self, entity: EntityId) -> Option<EntityKind>;

    /// Returns the fully composed world transform of an entity (its own local transform with
    /// every ancestor's transform applied), or `None` if the entity does not exist.
    fn world_transform(&self, entity: EntityId) -> Option<Matrix4>;
}

/// A ray intersection service over the scene geometry. Implementations decide on their own
/// acceleration structures; the scanner only needs the nearest hit.
pub trait SceneIntersector {
    /// Cast a ray from `origin` along the unit `direction` and return the nearest hit no farther
    /// than `max_distance`, or `None` if nothing was hit.
    fn cast(&self, origin: &Point3, direction: &UnitVec3, max_distance: f64) -> Option<RayHit>;
}
