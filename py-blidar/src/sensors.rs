use crate::conversions::{array2_to_faces, array2_to_matrix4, array2_to_points3, points_to_array3};
use blidar::scene::Scene;
use blidar::sensors::{SensorKind, SensorPose};
use blidar::{Noise3, PointCloud, PointCloudFeatures, SweepAxis, Transform};
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

#[pyclass]
#[derive(Clone)]
pub struct SensorConfig {
    pub inner: blidar::SensorConfig,
}

impl SensorConfig {
    pub fn get_inner(&self) -> &blidar::SensorConfig {
        &self.inner
    }
}

#[pymethods]
impl SensorConfig {
    #[new]
    #[pyo3(signature = (range = 10.0, resolution = 360, fov = 360.0, noise = (0.1, 0.1, 0.1), frequency = 15.0, world_up = false))]
    fn new(
        range: f64,
        resolution: usize,
        fov: f64,
        noise: (f64, f64, f64),
        frequency: f64,
        world_up: bool,
    ) -> PyResult<Self> {
        let axis = if world_up {
            SweepAxis::WorldUp
        } else {
            SweepAxis::SensorUp
        };
        let inner = blidar::SensorConfig::try_new(
            range,
            resolution,
            fov,
            Noise3::new(noise.0, noise.1, noise.2),
            frequency,
        )
        .map_err(|e| PyValueError::new_err(e.to_string()))?
        .with_sweep_axis(axis);

        Ok(Self { inner })
    }

    #[getter]
    fn range(&self) -> f64 {
        self.inner.range
    }

    #[getter]
    fn resolution(&self) -> usize {
        self.inner.resolution
    }

    #[getter]
    fn fov(&self) -> f64 {
        self.inner.fov_degrees
    }

    #[getter]
    fn noise(&self) -> (f64, f64, f64) {
        let n = self.inner.noise;
        (n.x, n.y, n.z)
    }

    #[getter]
    fn frequency(&self) -> f64 {
        self.inner.frequency_hz
    }

    /// The time between scan ticks, in seconds
    #[getter]
    fn period(&self) -> PyResult<f64> {
        self.inner
            .period()
            .map(|d| d.as_secs_f64())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "SensorConfig(range={}, resolution={}, fov={}, noise={:?}, frequency={})",
            self.inner.range,
            self.inner.resolution,
            self.inner.fov_degrees,
            self.noise(),
            self.inner.frequency_hz
        )
    }
}

#[pyfunction]
pub fn beam_angles(fov: f64, resolution: usize) -> Vec<f64> {
    blidar::sensors::beam_angles(fov, resolution)
}

/// Run one sweep of a sensor against a triangle mesh given in world coordinates, returning the
/// hits as an (n, 3) array in beam order. Faces must be an (m, 3) array of uint32 indices.
#[pyfunction]
#[pyo3(signature = (config, sensor_matrix, proxy, vertices, faces, seed = None))]
pub fn sweep_mesh<'py>(
    py: Python<'py>,
    config: &SensorConfig,
    sensor_matrix: PyReadonlyArray2<'py, f64>,
    proxy: bool,
    vertices: PyReadonlyArray2<'py, f64>,
    faces: PyReadonlyArray2<'py, u32>,
    seed: Option<u64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let world = array2_to_matrix4(&sensor_matrix.as_array())?;
    let pose = SensorPose::from_world_matrix(&world)
        .ok_or_else(|| PyValueError::new_err("Sensor matrix has no usable orientation"))?;

    let vertices = array2_to_points3(&vertices.as_array())?;
    let faces = array2_to_faces(&faces.as_array())?;
    let mut scene = Scene::new();
    if !faces.is_empty() {
        scene
            .add_mesh("target", None, Transform::identity(), vertices, faces)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
    }

    let kind = if proxy {
        SensorKind::Proxy
    } else {
        SensorKind::Mesh
    };
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let cloud = blidar::sensors::sweep(config.get_inner(), &pose, kind, &scene, &mut rng);
    Ok(points_to_array3(cloud.points()).into_pyarray(py))
}

/// Write an (n, 3) array of points as an X,Y,Z CSV file.
#[pyfunction]
pub fn write_csv(path: PathBuf, points: PyReadonlyArray2<'_, f64>) -> PyResult<()> {
    let cloud = PointCloud::new(array2_to_points3(&points.as_array())?);
    blidar::io::write_csv(&path, &cloud).map_err(|e| PyIOError::new_err(e.to_string()))
}
