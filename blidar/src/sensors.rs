//! This module contains tools for simulating a planar rotating-beam range sensor: the sensor's
//! configuration, the resolution of its pose from the scene, the generation of its beam fan, the
//! noise model, and the sweep which combines them into a point cloud.

mod beam;
mod config;
mod noise;
mod pose;
mod sweep;

pub use beam::{beam_angles, beam_directions};
pub use config::{Noise3, SensorConfig, SweepAxis};
pub use noise::{
    HIT_JITTER_PASSES, MISS_JITTER_PASSES, jitter_point, jitter_point_n, jitter_range,
};
pub use pose::SensorPose;
pub use sweep::{SensorKind, sweep};
