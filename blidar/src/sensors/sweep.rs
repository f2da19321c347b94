use super::noise::{HIT_JITTER_PASSES, MISS_JITTER_PASSES, jitter_point_n, jitter_range};
use super::{SensorConfig, SensorPose, beam_angles, beam_directions};
use crate::PointCloud;
use crate::scene::{EntityKind, SceneIntersector};
use rand::Rng;

/// How the sensor behaves when a beam hits nothing within its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// A sensor with real geometry. Beams which miss contribute no point.
    Mesh,

    /// A placeholder sensor without geometry. Beams which miss produce a point at the end of the
    /// beam, as if every direction returned a hit at maximum range.
    Proxy,
}

impl SensorKind {
    /// The sensor behaviour for an entity of the given kind, if the entity can be a sensor.
    pub fn from_entity(kind: EntityKind) -> Option<Self> {
        match kind {
            EntityKind::Mesh => Some(Self::Mesh),
            EntityKind::Empty => Some(Self::Proxy),
            EntityKind::Other => None,
        }
    }
}

/// Perform one full sweep of the sensor and return the resulting point cloud, with points in
/// beam order. The sweep only reads the scene through the intersector, so it can be run directly
/// against any geometry without a scan session.
///
/// For every beam the maximum range is jittered first, the ray is cast out to that range, and
/// then the point is jittered: twice on each axis for a real hit, once for a proxy's synthetic
/// max-range point.
///
/// # Arguments
///
/// * `config`: the sensor configuration snapshot for this sweep
/// * `pose`: the world-space pose of the sensor
/// * `kind`: whether the sensor is a mesh or a proxy, which decides what a miss produces
/// * `scene`: the ray intersection service for the scene geometry
/// * `rng`: the random source for the noise model
///
/// returns: PointCloud
pub fn sweep<S, R>(
    config: &SensorConfig,
    pose: &SensorPose,
    kind: SensorKind,
    scene: &S,
    rng: &mut R,
) -> PointCloud
where
    S: SceneIntersector + ?Sized,
    R: Rng + ?Sized,
{
    let angles = beam_angles(config.fov_degrees, config.resolution);
    let directions = beam_directions(pose, &angles, config.sweep_axis);

    let mut cloud = PointCloud::with_capacity(directions.len());
    for direction in directions {
        let ray_max = jitter_range(config.range, &config.noise, rng);

        if let Some(hit) = scene.cast(&pose.origin, &direction, ray_max) {
            cloud.append(jitter_point_n(
                &hit.location,
                &config.noise,
                HIT_JITTER_PASSES,
                rng,
            ));
        } else if kind == SensorKind::Proxy {
            let end = pose.origin + direction.into_inner() * ray_max;
            cloud.append(jitter_point_n(&end, &config.noise, MISS_JITTER_PASSES, rng));
        }
    }

    cloud
}
