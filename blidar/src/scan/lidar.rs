use super::{PointCloudSink, TickScheduler, TimerHandle};
use crate::errors::ScanError;
use crate::io::point_cloud::write_csv;
use crate::scene::{EntityId, SceneGraph, SceneIntersector};
use crate::sensors::{SensorConfig, SensorKind, SensorPose, sweep};
use crate::{PointCloudFeatures, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// The file name the editor add-on exports to, relative to the project directory.
pub const DEFAULT_EXPORT_NAME: &str = "blidar_pointcloud.csv";

/// The state of a running scan. A session is created by `Lidar::start` and ends on the first
/// tick after `Lidar::stop` has cleared its `active` flag, at which point its timer is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSession {
    active: bool,
    timer: TimerHandle,
    period: Duration,
}

impl ScanSession {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn timer(&self) -> TimerHandle {
        self.timer
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// What happened on a single tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// A sweep was completed and published with the given number of points.
    Published { points: usize },

    /// The session is running but no sweep could be made on this tick. The reason is either
    /// `MissingSensor` or `InvalidConfig`, and the session carries on.
    Skipped(ScanError),

    /// The session had been stopped, so its timer was removed and the session ended.
    Cancelled,

    /// There is no session, so the tick did nothing.
    Idle,
}

/// The scan engine for a single simulated sensor.
///
/// The engine owns the live sensor configuration (which the host may edit at any time), the
/// sensor assignment, the current `ScanSession`, and the random source of the noise model. The
/// scene, the point cloud sink, and the scheduler are passed in to each operation, so the engine
/// holds no reference to the host. At most one session exists at a time, and a new one cannot
/// be started while a point cloud from an earlier scan is still in the sink.
#[derive(Debug, Clone)]
pub struct Lidar<R: Rng = StdRng> {
    config: SensorConfig,
    sensor: Option<EntityId>,
    session: Option<ScanSession>,
    rng: R,
}

impl Lidar<StdRng> {
    /// Create an engine with the default configuration and a non-deterministic noise seed.
    pub fn new() -> Self {
        Self::with_rng(SensorConfig::default(), StdRng::from_os_rng())
    }

    /// Create an engine with the default configuration whose noise is reproducible from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SensorConfig::default(), StdRng::seed_from_u64(seed))
    }
}

impl Default for Lidar<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Lidar<R> {
    pub fn with_rng(config: SensorConfig, rng: R) -> Self {
        Self {
            config,
            sensor: None,
            session: None,
            rng,
        }
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Mutable access to the live configuration. Changes are picked up at the start of the next
    /// tick; the scan frequency of a running session is fixed when it starts.
    pub fn config_mut(&mut self) -> &mut SensorConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: SensorConfig) {
        self.config = config;
    }

    pub fn sensor(&self) -> Option<EntityId> {
        self.sensor
    }

    pub fn session(&self) -> Option<&ScanSession> {
        self.session.as_ref()
    }

    /// True while a session exists and has not been stopped.
    pub fn is_scanning(&self) -> bool {
        self.session.is_some_and(|s| s.active)
    }

    /// Assign an entity as the sensor. Only meshes and empties can be sensors; anything else,
    /// or no selection at all, fails with `InvalidSelection` and leaves the current assignment
    /// untouched.
    ///
    /// # Arguments
    ///
    /// * `scene`: the scene containing the entity
    /// * `selection`: the entity to use as the sensor, if one is selected
    ///
    /// returns: Result<SensorKind, ScanError>
    pub fn assign<G: SceneGraph + ?Sized>(
        &mut self,
        scene: &G,
        selection: Option<EntityId>,
    ) -> std::result::Result<SensorKind, ScanError> {
        let found = selection.and_then(|e| scene.kind(e).map(|k| (e, k)));
        let Some((entity, kind)) = found else {
            warn!("cannot assign LIDAR: nothing is selected");
            return Err(ScanError::InvalidSelection);
        };
        let Some(sensor_kind) = SensorKind::from_entity(kind) else {
            warn!(entity = entity.0, ?kind, "cannot assign LIDAR: not a mesh or empty");
            return Err(ScanError::InvalidSelection);
        };

        self.sensor = Some(entity);
        info!(entity = entity.0, ?sensor_kind, "assigned LIDAR");
        Ok(sensor_kind)
    }

    /// Clear the sensor assignment. A running session keeps running but skips its sweeps until a
    /// sensor is assigned again.
    pub fn unassign(&mut self) {
        self.sensor = None;
    }

    /// Start a scan session, registering a periodic tick at the configured frequency.
    ///
    /// Fails with `AlreadyScanning` if the sink still holds a point cloud or another session is
    /// running, checked first. Otherwise fails with `InvalidConfig` if the configuration is
    /// broken, or `InvalidSelection` if no sensor is assigned. On failure nothing is registered
    /// and the engine is unchanged.
    ///
    /// A session which was stopped but has not yet seen the tick that ends it is ended here, and
    /// its timer removed, before the new one is registered.
    pub fn start<K, T>(
        &mut self,
        sink: &K,
        scheduler: &mut T,
    ) -> std::result::Result<(), ScanError>
    where
        K: PointCloudSink + ?Sized,
        T: TickScheduler + ?Sized,
    {
        if sink.has_artifact() || self.is_scanning() {
            warn!("point cloud already exists, remove it before starting a new scan");
            return Err(ScanError::AlreadyScanning);
        }

        if let Err(e) = self.config.validate() {
            warn!(error = %e, "cannot start scanning");
            return Err(e);
        }
        let period = self.config.period()?;

        if self.sensor.is_none() {
            warn!("cannot start scanning: no LIDAR is assigned");
            return Err(ScanError::InvalidSelection);
        }

        if let Some(stale) = self.session.take() {
            scheduler.unregister(stale.timer);
            debug!(timer = stale.timer.0, "removed timer of stopped session");
        }

        let timer = scheduler.register_periodic(period);
        self.session = Some(ScanSession {
            active: true,
            timer,
            period,
        });
        info!(
            timer = timer.0,
            frequency_hz = self.config.frequency_hz,
            "started scanning"
        );
        Ok(())
    }

    /// Handle one tick of the periodic timer.
    ///
    /// If the session has been stopped, its timer is removed and the session ends. Otherwise the
    /// configuration is copied, the sensor pose is resolved, a full sweep is made, and the
    /// resulting point cloud replaces the sink's artifact. A tick with no usable sensor is
    /// skipped without touching the sink.
    pub fn tick<S, K, T>(&mut self, scene: &S, sink: &mut K, scheduler: &mut T) -> TickOutcome
    where
        S: SceneGraph + SceneIntersector + ?Sized,
        K: PointCloudSink + ?Sized,
        T: TickScheduler + ?Sized,
    {
        let Some(session) = self.session else {
            return TickOutcome::Idle;
        };

        if !session.active {
            scheduler.unregister(session.timer);
            self.session = None;
            info!(timer = session.timer.0, "scan session ended");
            return TickOutcome::Cancelled;
        }

        // Everything for this sweep comes from this snapshot
        let config = self.config;
        if let Err(e) = config.validate() {
            debug!(error = %e, "skipping sweep");
            return TickOutcome::Skipped(e);
        }

        let Some(entity) = self.sensor else {
            trace!("skipping sweep: no sensor assigned");
            return TickOutcome::Skipped(ScanError::MissingSensor);
        };
        let kind = scene.kind(entity).and_then(SensorKind::from_entity);
        let pose = SensorPose::resolve(scene, entity);
        let (Some(kind), Some(pose)) = (kind, pose) else {
            trace!(entity = entity.0, "skipping sweep: sensor is not in the scene");
            return TickOutcome::Skipped(ScanError::MissingSensor);
        };

        let cloud = sweep(&config, &pose, kind, scene, &mut self.rng);
        let points = cloud.len();
        sink.publish(cloud);
        debug!(points, "published sweep");

        TickOutcome::Published { points }
    }

    /// Stop scanning. The session's `active` flag is cleared, which the next tick observes to
    /// end the session, and the published point cloud is removed from the sink immediately.
    /// Stopping an engine which is not scanning only removes any leftover point cloud.
    pub fn stop<K: PointCloudSink + ?Sized>(&mut self, sink: &mut K) {
        if let Some(session) = self.session.as_mut() {
            session.active = false;
        }
        sink.clear();
        info!("scanning stopped and point cloud removed");
    }

    /// Export the sink's current point cloud as CSV, overwriting any file at `path`. Returns the
    /// number of points written, or `EmptyPointCloud` if there is nothing to export.
    pub fn export<K: PointCloudSink + ?Sized>(
        &self,
        sink: &K,
        path: &Path,
    ) -> std::result::Result<usize, ScanError> {
        let cloud = match sink.current() {
            Some(c) if !c.is_empty() => c,
            _ => {
                warn!("no point cloud data to export");
                return Err(ScanError::EmptyPointCloud);
            }
        };

        write_csv(path, cloud).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), points = cloud.len(), "exported point cloud");
        Ok(cloud.len())
    }

    /// Load the live configuration from a JSON file, leaving it unchanged on failure.
    pub fn load_config(&mut self, path: &Path) -> Result<()> {
        self.config = SensorConfig::from_json_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{ArtifactSlot, ManualScheduler};
    use crate::scene::Scene;
    use crate::sensors::Noise3;
    use crate::{Point3, Transform};
    use approx::assert_relative_eq;

    fn proxy_scene() -> (Scene, EntityId) {
        let mut scene = Scene::new();
        let sensor = scene.add_empty("lidar", None, Transform::identity()).unwrap();
        (scene, sensor)
    }

    fn quiet_lidar() -> Lidar {
        let mut lidar = Lidar::with_seed(42);
        lidar.config_mut().noise = Noise3::zero();
        lidar.config_mut().resolution = 4;
        lidar
    }

    #[test]
    fn assign_rejects_non_sensors() {
        let mut scene = Scene::new();
        let lamp = scene.add_other("lamp", None, Transform::identity()).unwrap();
        let mut lidar = quiet_lidar();

        assert!(matches!(lidar.assign(&scene, None), Err(ScanError::InvalidSelection)));
        assert!(matches!(
            lidar.assign(&scene, Some(lamp)),
            Err(ScanError::InvalidSelection)
        ));
        assert!(matches!(
            lidar.assign(&scene, Some(EntityId(10))),
            Err(ScanError::InvalidSelection)
        ));
        assert_eq!(lidar.sensor(), None);
    }

    #[test]
    fn assign_reports_kind() {
        let mut scene = Scene::new();
        let empty = scene.add_empty("e", None, Transform::identity()).unwrap();
        let mesh = scene
            .add_box("m", None, Transform::identity(), 0.1, 0.1, 0.1)
            .unwrap();
        let mut lidar = quiet_lidar();

        assert_eq!(lidar.assign(&scene, Some(empty)).unwrap(), SensorKind::Proxy);
        assert_eq!(lidar.assign(&scene, Some(mesh)).unwrap(), SensorKind::Mesh);
        assert_eq!(lidar.sensor(), Some(mesh));
    }

    #[test]
    fn start_requires_sensor() {
        let mut lidar = quiet_lidar();
        let mut scheduler = ManualScheduler::new();
        let result = lidar.start(&ArtifactSlot::new(), &mut scheduler);
        assert!(matches!(result, Err(ScanError::InvalidSelection)));
        assert_eq!(scheduler.registrations(), 0);
    }

    #[test]
    fn start_rejects_invalid_config() {
        let (scene, sensor) = proxy_scene();
        let mut lidar = quiet_lidar();
        lidar.assign(&scene, Some(sensor)).unwrap();
        lidar.config_mut().resolution = 1;

        let mut scheduler = ManualScheduler::new();
        let result = lidar.start(&ArtifactSlot::new(), &mut scheduler);
        assert!(matches!(result, Err(ScanError::InvalidConfig(_))));
        assert!(lidar.session().is_none());
        assert_eq!(scheduler.registrations(), 0);
    }

    #[test]
    fn existing_cloud_is_checked_before_other_guards() {
        let mut sink = ArtifactSlot::new();
        sink.publish(crate::PointCloud::from(vec![Point3::origin()]));
        let mut scheduler = ManualScheduler::new();

        let mut lidar = quiet_lidar();
        assert!(matches!(
            lidar.start(&sink, &mut scheduler),
            Err(ScanError::AlreadyScanning)
        ));

        let (scene, sensor) = proxy_scene();
        lidar.assign(&scene, Some(sensor)).unwrap();
        lidar.config_mut().resolution = 1;
        assert!(matches!(
            lidar.start(&sink, &mut scheduler),
            Err(ScanError::AlreadyScanning)
        ));
        assert_eq!(scheduler.registrations(), 0);
    }

    #[test]
    fn start_registers_period() {
        let (scene, sensor) = proxy_scene();
        let mut lidar = quiet_lidar();
        lidar.assign(&scene, Some(sensor)).unwrap();
        lidar.config_mut().frequency_hz = 4.0;

        let mut scheduler = ManualScheduler::new();
        lidar.start(&ArtifactSlot::new(), &mut scheduler).unwrap();

        let session = lidar.session().unwrap();
        assert!(lidar.is_scanning());
        assert_eq!(scheduler.period(session.timer()), Some(Duration::from_millis(250)));
    }

    #[test]
    fn second_start_before_tick_is_rejected() {
        let (scene, sensor) = proxy_scene();
        let mut lidar = quiet_lidar();
        lidar.assign(&scene, Some(sensor)).unwrap();
        let sink = ArtifactSlot::new();
        let mut scheduler = ManualScheduler::new();

        lidar.start(&sink, &mut scheduler).unwrap();
        assert!(matches!(
            lidar.start(&sink, &mut scheduler),
            Err(ScanError::AlreadyScanning)
        ));
        assert_eq!(scheduler.active().len(), 1);
    }

    #[test]
    fn tick_publishes_and_replaces() {
        let (scene, sensor) = proxy_scene();
        let mut lidar = quiet_lidar();
        lidar.assign(&scene, Some(sensor)).unwrap();
        let mut sink = ArtifactSlot::new();
        let mut scheduler = ManualScheduler::new();
        lidar.start(&sink, &mut scheduler).unwrap();

        let outcome = lidar.tick(&scene, &mut sink, &mut scheduler);
        assert!(matches!(outcome, TickOutcome::Published { points: 4 }));

        lidar.config_mut().resolution = 6;
        let outcome = lidar.tick(&scene, &mut sink, &mut scheduler);
        assert!(matches!(outcome, TickOutcome::Published { points: 6 }));
        assert_eq!(sink.current().unwrap().len(), 6);
        assert_eq!(sink.generation(), 2);
    }

    #[test]
    fn tick_follows_moving_sensor() {
        let (mut scene, sensor) = proxy_scene();
        let mut lidar = quiet_lidar();
        lidar.config_mut().range = 1.0;
        lidar.assign(&scene, Some(sensor)).unwrap();
        let mut sink = ArtifactSlot::new();
        let mut scheduler = ManualScheduler::new();
        lidar.start(&sink, &mut scheduler).unwrap();

        lidar.tick(&scene, &mut sink, &mut scheduler);
        scene
            .set_local(sensor, Transform::from_translation(0.0, 0.0, 3.0))
            .unwrap();
        lidar.tick(&scene, &mut sink, &mut scheduler);

        for p in sink.current().unwrap().points() {
            assert_relative_eq!(p.z, 3.0, epsilon = 1e-12);
            assert_relative_eq!((p - Point3::new(0.0, 0.0, 3.0)).norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn tick_without_sensor_is_skipped() {
        let (scene, sensor) = proxy_scene();
        let mut lidar = quiet_lidar();
        lidar.assign(&scene, Some(sensor)).unwrap();
        let mut sink = ArtifactSlot::new();
        let mut scheduler = ManualScheduler::new();
        lidar.start(&sink, &mut scheduler).unwrap();
        lidar.unassign();

        let outcome = lidar.tick(&scene, &mut sink, &mut scheduler);
        assert!(matches!(outcome, TickOutcome::Skipped(ScanError::MissingSensor)));
        assert!(!sink.has_artifact());
        assert!(lidar.is_scanning());
    }

    #[test]
    fn tick_with_broken_config_is_skipped() {
        let (scene, sensor) = proxy_scene();
        let mut lidar = quiet_lidar();
        lidar.assign(&scene, Some(sensor)).unwrap();
        let mut sink = ArtifactSlot::new();
        let mut scheduler = ManualScheduler::new();
        lidar.start(&sink, &mut scheduler).unwrap();

        lidar.config_mut().fov_degrees = 0.0;
        let outcome = lidar.tick(&scene, &mut sink, &mut scheduler);
        assert!(matches!(outcome, TickOutcome::Skipped(ScanError::InvalidConfig(_))));
        assert!(!sink.has_artifact());
    }

    #[test]
    fn stop_takes_effect_on_next_tick() {
        let (scene, sensor) = proxy_scene();
        let mut lidar = quiet_lidar();
        lidar.assign(&scene, Some(sensor)).unwrap();
        let mut sink = ArtifactSlot::new();
        let mut scheduler = ManualScheduler::new();
        lidar.start(&sink, &mut scheduler).unwrap();
        lidar.tick(&scene, &mut sink, &mut scheduler);

        lidar.stop(&mut sink);
        assert!(!sink.has_artifact());
        assert!(!lidar.is_scanning());

        // The timer is still registered until the next tick sees the cleared flag
        assert_eq!(scheduler.active().len(), 1);
        let outcome = lidar.tick(&scene, &mut sink, &mut scheduler);
        assert!(matches!(outcome, TickOutcome::Cancelled));
        assert!(scheduler.active().is_empty());
        assert!(lidar.session().is_none());
        assert!(!sink.has_artifact());

        assert!(matches!(
            lidar.tick(&scene, &mut sink, &mut scheduler),
            TickOutcome::Idle
        ));
    }

    #[test]
    fn restart_after_stop_replaces_timer() {
        let (scene, sensor) = proxy_scene();
        let mut lidar = quiet_lidar();
        lidar.assign(&scene, Some(sensor)).unwrap();
        let mut sink = ArtifactSlot::new();
        let mut scheduler = ManualScheduler::new();
        lidar.start(&sink, &mut scheduler).unwrap();
        let first = lidar.session().unwrap().timer();
        lidar.tick(&scene, &mut sink, &mut scheduler);
        lidar.stop(&mut sink);

        // Restarting before the cancelling tick must not leave two timers behind
        lidar.start(&sink, &mut scheduler).unwrap();
        let second = lidar.session().unwrap().timer();
        assert_ne!(first, second);
        assert_eq!(scheduler.active().len(), 1);
        assert!(scheduler.is_registered(second));
    }

    #[test]
    fn export_needs_points() {
        let lidar = quiet_lidar();
        let path = std::env::temp_dir().join("blidar_lidar_export_needs_points.csv");
        assert!(matches!(
            lidar.export(&ArtifactSlot::new(), &path),
            Err(ScanError::EmptyPointCloud)
        ));

        let mut empty = ArtifactSlot::new();
        empty.publish(crate::PointCloud::default());
        assert!(matches!(
            lidar.export(&empty, &path),
            Err(ScanError::EmptyPointCloud)
        ));
        assert!(!path.exists());
    }
}
