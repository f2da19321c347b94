//! Simulation of a 2D rotating-beam range sensor (a planar LIDAR) placed inside a 3D scene. A
//! sensor entity is given a pose in the scene, and on every tick of a periodic timer a fan of
//! rays is cast from it to produce a noisy point cloud of range hits.

use std::error::Error;

pub mod errors;
pub mod geom3;
pub mod io;
mod point_cloud;
pub mod scan;
pub mod scene;
pub mod sensors;

pub use errors::ScanError;
pub use geom3::{Iso3, Matrix3, Matrix4, Point3, Transform, UnitQuaternion, UnitVec3, Vector3};
pub use point_cloud::{PointCloud, PointCloudFeatures};
pub use scan::{Lidar, TickOutcome};
pub use sensors::{Noise3, SensorConfig, SweepAxis};

// Re-export the nalgebra crate through parry so that downstream users work with the same types
pub use parry3d_f64::na;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;
