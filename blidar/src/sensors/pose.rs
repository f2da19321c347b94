use crate::geom3::{matrix_rotation, matrix_translation};
use crate::scene::{EntityId, SceneGraph};
use crate::{Matrix4, Point3, UnitVec3, Vector3};

/// The world-space placement of the sensor for a single sweep. This is resolved fresh on every
/// tick from the sensor entity's composed world transform, since the sensor (or any of its
/// ancestors) may have moved since the last one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorPose {
    /// World position of the sensor, the origin of every beam
    pub origin: Point3,

    /// The direction the center of the beam fan points. An unrotated sensor looks along -Y.
    pub forward: UnitVec3,

    /// The sensor's local +Z axis in world space
    pub up: UnitVec3,
}

impl SensorPose {
    /// Build a pose directly from an origin and orientation vectors.
    pub fn new(origin: Point3, forward: UnitVec3, up: UnitVec3) -> Self {
        Self {
            origin,
            forward,
            up,
        }
    }

    /// Derive the pose from a fully composed world transform. The origin is the translation of
    /// the transform, and the forward and up directions are the local -Y and +Z axes rotated by
    /// the transform's orientation, so scale and shear in the transform do not affect them.
    ///
    /// # Arguments
    ///
    /// * `world`: the homogeneous world transform of the sensor entity
    ///
    /// returns: Option<SensorPose>
    pub fn from_world_matrix(world: &Matrix4) -> Option<Self> {
        let rotation = matrix_rotation(world)?;
        Some(Self {
            origin: Point3::from(matrix_translation(world)),
            forward: rotation * -Vector3::y_axis(),
            up: rotation * Vector3::z_axis(),
        })
    }

    /// Resolve the pose of a sensor entity in a scene. Returns `None` if the entity does not
    /// exist or its transform has collapsed.
    pub fn resolve<G: SceneGraph + ?Sized>(scene: &G, entity: EntityId) -> Option<Self> {
        let world = scene.world_transform(entity)?;
        Self::from_world_matrix(&world)
    }
}
