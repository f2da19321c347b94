use crate::PointCloud;

/// The receiving end of a scan. A sink holds at most one point cloud artifact, which each tick
/// replaces wholesale; it is never patched in place, so a consumer only ever sees complete
/// sweeps.
pub trait PointCloudSink {
    /// Replace the current artifact with a new point cloud.
    fn publish(&mut self, cloud: PointCloud);

    /// Remove the current artifact, if any.
    fn clear(&mut self);

    fn current(&self) -> Option<&PointCloud>;

    fn has_artifact(&self) -> bool {
        self.current().is_some()
    }
}

/// A sink which stores the artifact in memory and counts how many times it has been published.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSlot {
    cloud: Option<PointCloud>,
    generation: u64,
}

impl ArtifactSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of point clouds published to this slot so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn take(&mut self) -> Option<PointCloud> {
        self.cloud.take()
    }
}

impl PointCloudSink for ArtifactSlot {
    fn publish(&mut self, cloud: PointCloud) {
        self.cloud = Some(cloud);
        self.generation += 1;
    }

    fn clear(&mut self) {
        self.cloud = None;
    }

    fn current(&self) -> Option<&PointCloud> {
        self.cloud.as_ref()
    }
}
