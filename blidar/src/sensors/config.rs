use crate::errors::ScanError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// The smallest field of view the editor allows, in degrees.
pub const MIN_FOV_DEGREES: f64 = 1.0;

/// The largest field of view, in degrees: a full revolution.
pub const MAX_FOV_DEGREES: f64 = 360.0;

/// The smallest scan frequency the editor allows, in Hz.
pub const MIN_FREQUENCY_HZ: f64 = 0.1;

/// Per-axis noise magnitudes in world units. Each axis is jittered independently by a uniform
/// draw in `[-m, m]` for that axis's magnitude `m`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Noise3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Noise3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The same magnitude on every axis.
    pub fn uniform(m: f64) -> Self {
        Self::new(m, m, m)
    }

    pub fn zero() -> Self {
        Self::uniform(0.0)
    }

    /// The largest of the three magnitudes, which is used as the range noise.
    pub fn max_component(&self) -> f64 {
        self.x.max(self.y).max(self.z)
    }
}

impl Default for Noise3 {
    fn default() -> Self {
        Self::uniform(0.1)
    }
}

/// The axis about which the beam fan is swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    /// The sensor's own up axis (local +Z) in world space, so that the scan plane tilts with the
    /// sensor.
    #[default]
    SensorUp,

    /// World +Z regardless of the sensor's orientation.
    WorldUp,
}

/// The parameters of the simulated sensor. The engine copies this at the start of every tick,
/// so edits made while a scan is running take effect on the next sweep and never in the middle
/// of one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Maximum range of a beam, in world units
    pub range: f64,

    /// Number of beams in one sweep, at least 2
    pub resolution: usize,

    /// Angular span of the beam fan in degrees, in (0, 360]
    pub fov_degrees: f64,

    pub noise: Noise3,

    /// Number of sweeps per second
    pub frequency_hz: f64,

    pub sweep_axis: SweepAxis,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            range: 10.0,
            resolution: 360,
            fov_degrees: 360.0,
            noise: Noise3::default(),
            frequency_hz: 15.0,
            sweep_axis: SweepAxis::SensorUp,
        }
    }
}

impl SensorConfig {
    /// Create a configuration and check its invariants.
    ///
    /// # Arguments
    ///
    /// * `range`: the maximum range of a beam, must be positive
    /// * `resolution`: the number of beams per sweep, must be at least 2
    /// * `fov_degrees`: the field of view in degrees, must be in (0, 360]
    /// * `noise`: per-axis noise magnitudes, each must be non-negative
    /// * `frequency_hz`: the number of sweeps per second, must be positive
    ///
    /// returns: Result<SensorConfig, ScanError>
    pub fn try_new(
        range: f64,
        resolution: usize,
        fov_degrees: f64,
        noise: Noise3,
        frequency_hz: f64,
    ) -> Result<Self, ScanError> {
        let config = Self {
            range,
            resolution,
            fov_degrees,
            noise,
            frequency_hz,
            sweep_axis: SweepAxis::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_sweep_axis(mut self, axis: SweepAxis) -> Self {
        self.sweep_axis = axis;
        self
    }

    /// Check the invariants of the configuration, returning `InvalidConfig` describing the first
    /// one which is broken.
    pub fn validate(&self) -> Result<(), ScanError> {
        let invalid = |msg: String| Err(ScanError::InvalidConfig(msg));

        if !(self.range.is_finite() && self.range > 0.0) {
            return invalid(format!("range must be positive, got {}", self.range));
        }
        if self.resolution < 2 {
            return invalid(format!(
                "resolution must be at least 2, got {}",
                self.resolution
            ));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees <= MAX_FOV_DEGREES) {
            return invalid(format!(
                "field of view must be in (0, 360] degrees, got {}",
                self.fov_degrees
            ));
        }
        for (axis, m) in [("x", self.noise.x), ("y", self.noise.y), ("z", self.noise.z)] {
            if !(m.is_finite() && m >= 0.0) {
                return invalid(format!("noise {} must be non-negative, got {}", axis, m));
            }
        }
        if !(self.frequency_hz.is_finite() && self.frequency_hz > 0.0) {
            return invalid(format!(
                "frequency must be positive, got {}",
                self.frequency_hz
            ));
        }

        self.period().map(|_| ())
    }

    /// Pull each parameter into the limits the editor's property panel enforces: the field of
    /// view is clamped to [1, 360] degrees, the resolution to at least 2, the noise to at least 0,
    /// and the frequency to at least 0.1 Hz. The range is left alone since a non-positive range
    /// has no sensible clamped value.
    pub fn clamped(mut self) -> Self {
        self.fov_degrees = self.fov_degrees.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES);
        self.resolution = self.resolution.max(2);
        self.noise = Noise3::new(
            self.noise.x.max(0.0),
            self.noise.y.max(0.0),
            self.noise.z.max(0.0),
        );
        self.frequency_hz = self.frequency_hz.max(MIN_FREQUENCY_HZ);
        self
    }

    /// The time between two ticks of a scan.
    pub fn period(&self) -> Result<Duration, ScanError> {
        Duration::try_from_secs_f64(1.0 / self.frequency_hz).map_err(|e| {
            ScanError::InvalidConfig(format!(
                "frequency {} has no usable period: {}",
                self.frequency_hz, e
            ))
        })
    }

    /// Load a configuration from JSON. Missing fields take their default values, and the result
    /// is validated before it is returned.
    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
