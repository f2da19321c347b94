use std::path::PathBuf;
use thiserror::Error;

/// Recoverable failures of the scanner's user-facing operations. None of these are fatal: each
/// one is a precondition the caller has to fix, so nothing in the crate retries on them.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The entity offered as a sensor is missing or is neither a mesh nor an empty.
    #[error("select a mesh or empty object to use as the LIDAR")]
    InvalidSelection,

    /// A point cloud from an earlier scan is still present in the scene.
    #[error("a point cloud already exists, stop the current scan before starting a new one")]
    AlreadyScanning,

    /// There is no published point cloud to export.
    #[error("no point cloud data to export")]
    EmptyPointCloud,

    /// A tick fired while no sensor entity was configured.
    #[error("no sensor entity is assigned")]
    MissingSensor,

    /// The sensor configuration breaks one of its invariants.
    #[error("invalid sensor configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to write point cloud to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
