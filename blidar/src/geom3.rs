//! Geometric primitives shared by the scene model and the sensor. These are thin aliases over
//! the nalgebra types re-exported by parry, plus a decomposed affine `Transform` used for the
//! local placement of scene entities.

use parry3d_f64::na::{Rotation3, Translation3};
use serde::{Deserialize, Serialize};

pub type Point3 = parry3d_f64::na::Point3<f64>;
pub type Vector3 = parry3d_f64::na::Vector3<f64>;
pub type UnitVec3 = parry3d_f64::na::Unit<Vector3>;
pub type Iso3 = parry3d_f64::na::Isometry3<f64>;
pub type Matrix3 = parry3d_f64::na::Matrix3<f64>;
pub type Matrix4 = parry3d_f64::na::Matrix4<f64>;
pub type UnitQuaternion = parry3d_f64::na::UnitQuaternion<f64>;

/// Columns shorter than this are treated as collapsed when extracting a rotation.
const DEGENERATE_NORM: f64 = 1.0e-12;

/// A translation, rotation, and non-uniform scale, applied to a point in the order scale,
/// rotation, translation. This is the usual decomposition of an object's placement relative to
/// its parent in a scene editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vector3,
    pub rotation: UnitQuaternion,
    pub scale: Vector3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            translation: Vector3::new(x, y, z),
            ..Self::identity()
        }
    }

    /// Replace the rotation with one built from XYZ Euler angles in radians, meaning the rotation
    /// about X is applied first, then Y, then Z.
    pub fn with_euler(mut self, x: f64, y: f64, z: f64) -> Self {
        self.rotation = UnitQuaternion::from_euler_angles(x, y, z);
        self
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, x: f64, y: f64, z: f64) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    /// The rigid part of the transform, ignoring scale.
    pub fn to_iso(&self) -> Iso3 {
        Iso3::from_parts(Translation3::from(self.translation), self.rotation)
    }

    /// The full homogeneous matrix of this transform.
    pub fn to_matrix(&self) -> Matrix4 {
        self.to_iso().to_homogeneous() * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

/// Extract the translation component of a homogeneous transformation matrix.
pub fn matrix_translation(m: &Matrix4) -> Vector3 {
    Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Extract the orientation of a homogeneous transformation matrix which may contain scale and
/// shear. The first column fixes the X axis, the second column (with the X component removed)
/// fixes the Y axis, and Z completes a right-handed frame. Returns `None` if the linear part has
/// collapsed so that no orientation can be recovered.
///
/// # Arguments
///
/// * `m`: a homogeneous 4x4 transformation matrix
///
/// returns: Option<UnitQuaternion>
pub fn matrix_rotation(m: &Matrix4) -> Option<UnitQuaternion> {
    let linear: Matrix3 = m.fixed_view::<3, 3>(0, 0).into_owned();
    let c0: Vector3 = linear.column(0).into_owned();
    let c1: Vector3 = linear.column(1).into_owned();

    let x = c0.try_normalize(DEGENERATE_NORM)?;
    let y = (c1 - x * x.dot(&c1)).try_normalize(DEGENERATE_NORM)?;
    let z = x.cross(&y);

    let r = Matrix3::from_columns(&[x, y, z]);
    Some(UnitQuaternion::from_rotation_matrix(
        &Rotation3::from_matrix_unchecked(r),
    ))
}
