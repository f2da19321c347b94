use crate::Point3;
use parry3d_f64::bounding_volume::Aabb;

pub trait PointCloudFeatures {
    fn points(&self) -> &[Point3];

    fn is_empty(&self) -> bool {
        self.points().is_empty()
    }

    fn len(&self) -> usize {
        self.points().len()
    }

    fn aabb(&self) -> Aabb {
        Aabb::from_points(self.points())
    }
}

/// An ordered collection of world-space range hits produced by one sweep of the sensor. The
/// points carry no identity beyond their position and their order matches the beam order that
/// produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<Point3>,
}

impl PointCloud {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Create an empty point cloud with room for `capacity` points, typically one per beam.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Add a single point to the end of the cloud.
    pub fn append(&mut self, point: Point3) {
        self.points.push(point);
    }
}

impl From<&[Point3]> for PointCloud {
    fn from(points: &[Point3]) -> Self {
        Self::new(points.to_vec())
    }
}

impl From<Vec<Point3>> for PointCloud {
    fn from(points: Vec<Point3>) -> Self {
        Self::new(points)
    }
}

impl PointCloudFeatures for PointCloud {
    fn points(&self) -> &[Point3] {
        &self.points
    }
}
