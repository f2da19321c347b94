use super::{SensorPose, SweepAxis};
use crate::{UnitQuaternion, UnitVec3, Vector3};

/// Generate the angular offsets of the beams of one sweep, in radians, relative to the sensor's
/// forward direction. The offsets are evenly spaced and include both ends of the field of view:
/// the first beam is at `-fov/2` and the last is exactly at `+fov/2`.
///
/// With a field of view of 360 degrees the first and last beams point in the same direction, so
/// one direction is sampled twice. This is deliberate and matches the editor add-on's output.
///
/// # Arguments
///
/// * `fov_degrees`: the full angular span of the fan in degrees
/// * `resolution`: the number of beams, expected to be at least 2. A single beam is placed on
///   the forward direction.
///
/// returns: Vec<f64, Global>
///
/// # Examples
///
/// ```
/// use blidar::sensors::beam_angles;
/// let angles = beam_angles(180.0, 3);
/// assert_eq!(angles.len(), 3);
/// assert_eq!(angles[1], 0.0);
/// ```
pub fn beam_angles(fov_degrees: f64, resolution: usize) -> Vec<f64> {
    if resolution < 2 {
        return vec![0.0; resolution];
    }

    let fov = fov_degrees.to_radians();
    let half = (fov_degrees / 2.0).to_radians();
    let last = (resolution - 1) as f64;

    (0..resolution)
        .map(|i| -half + (i as f64 / last) * fov)
        .collect()
}

/// Turn angular offsets into world-space unit directions by rotating the pose's forward vector
/// about the chosen sweep axis.
pub fn beam_directions(pose: &SensorPose, angles: &[f64], axis: SweepAxis) -> Vec<UnitVec3> {
    let axis = match axis {
        SweepAxis::SensorUp => pose.up,
        SweepAxis::WorldUp => Vector3::z_axis(),
    };

    angles
        .iter()
        .map(|a| UnitQuaternion::from_axis_angle(&axis, *a) * pose.forward)
        .collect()
}
