//! The scan lifecycle. A `Lidar` engine holds the live sensor configuration and the current
//! `ScanSession`, and is driven by periodic ticks from a host scheduler. Each tick performs one
//! complete sweep and publishes it to a point cloud sink, replacing whatever was there.

mod lidar;
mod scheduler;
mod sink;

pub use lidar::{DEFAULT_EXPORT_NAME, Lidar, ScanSession, TickOutcome};
pub use scheduler::{ManualScheduler, TickScheduler, TimerHandle};
pub use sink::{ArtifactSlot, PointCloudSink};
