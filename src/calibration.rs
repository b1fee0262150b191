//! Startup bias calibration for the inertial sensors
//!
//! Computes per-axis accelerometer and gyroscope offsets from a stationary
//! sampling window, so that a level, motionless vehicle reads exactly
//! (0, 0, 1) g and (0, 0, 0) deg/s after correction. The vehicle must not
//! move for the whole window; motion during calibration silently biases
//! the offsets and is not detected here.

use nalgebra::Vector3;

use crate::sensors::{ImuSource, SensorError};
use crate::types::{CalibrationConfig, SensorSample};

/// Per-axis sensor offsets captured once at startup
///
/// The accelerometer Z offset is stored as `mean(az) − 1.0` so that a
/// level sensor reads 1 g after correction (Z-up gravity convention).
/// Immutable after capture unless recalibration is explicitly run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationOffsets {
    /// Accelerometer bias in g
    pub accel: Vector3<f32>,
    /// Gyroscope bias in degrees per second
    pub gyro: Vector3<f32>,
}

impl CalibrationOffsets {
    /// Subtract the offsets from a raw sample
    ///
    /// Applying the offsets to a raw sample equal to the calibration mean
    /// yields exactly (0, 0, 1) g and (0, 0, 0) deg/s.
    pub fn apply(&self, raw: &SensorSample) -> SensorSample {
        SensorSample {
            accel: raw.accel - self.accel,
            gyro: raw.gyro - self.gyro,
            timestamp_ms: raw.timestamp_ms,
        }
    }
}

/// Stationary-window bias estimator
///
/// Feed raw samples one at a time; the first `settle_samples` are
/// discarded to let the sensor's internal filters settle, the next
/// `window_samples` are averaged. `feed` returns the finished offsets on
/// the sample that completes the window.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use telemetry_fusion::{BiasCalibrator, CalibrationConfig, SensorSample};
///
/// let config = CalibrationConfig { settle_samples: 2, window_samples: 4 };
/// let mut calibrator = BiasCalibrator::new(config);
///
/// let level = SensorSample {
///     accel: Vector3::new(0.0, 0.0, 1.0),
///     gyro: Vector3::zeros(),
///     timestamp_ms: 0,
/// };
///
/// let mut offsets = None;
/// while offsets.is_none() {
///     offsets = calibrator.feed(&level);
/// }
/// assert_eq!(offsets.unwrap().accel, Vector3::zeros());
/// ```
#[derive(Debug, Clone)]
pub struct BiasCalibrator {
    config: CalibrationConfig,
    seen: u32,
    accel_sum: Vector3<f32>,
    gyro_sum: Vector3<f32>,
}

impl BiasCalibrator {
    /// Create a calibrator for the given window configuration
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            seen: 0,
            accel_sum: Vector3::zeros(),
            gyro_sum: Vector3::zeros(),
        }
    }

    /// Feed one raw sample
    ///
    /// Returns `Some(offsets)` on the sample that completes the averaging
    /// window, `None` before that. Feeding further samples after
    /// completion restarts a fresh window.
    pub fn feed(&mut self, raw: &SensorSample) -> Option<CalibrationOffsets> {
        self.seen += 1;

        if self.seen <= self.config.settle_samples {
            return None;
        }

        self.accel_sum += raw.accel;
        self.gyro_sum += raw.gyro;

        let averaged = self.seen - self.config.settle_samples;
        if averaged < self.config.window_samples {
            return None;
        }

        let n = self.config.window_samples as f32;
        let mut accel = self.accel_sum / n;
        // Level-Z must read 1 g after correction
        accel.z -= 1.0;
        let offsets = CalibrationOffsets {
            accel,
            gyro: self.gyro_sum / n,
        };

        log::info!(
            "bias calibration complete over {} samples: accel ({:.4}, {:.4}, {:.4}) g, gyro ({:.4}, {:.4}, {:.4}) deg/s",
            self.config.window_samples,
            offsets.accel.x,
            offsets.accel.y,
            offsets.accel.z,
            offsets.gyro.x,
            offsets.gyro.y,
            offsets.gyro.z,
        );

        self.reset();
        Some(offsets)
    }

    /// Number of samples consumed so far in the current window
    pub fn samples_seen(&self) -> u32 {
        self.seen
    }

    /// Discard any partial window and start over
    pub fn reset(&mut self) {
        self.seen = 0;
        self.accel_sum = Vector3::zeros();
        self.gyro_sum = Vector3::zeros();
    }
}

/// Run a full calibration window against a sensor adapter
///
/// Blocks until the window completes, reading at the adapter's natural
/// rate. A read failure aborts the calibration with the adapter's error
/// rather than folding zeros into the average; calibration runs attended
/// at startup, where a loud failure beats a silently biased estimate.
pub fn calibrate(
    source: &mut impl ImuSource,
    config: CalibrationConfig,
) -> Result<CalibrationOffsets, SensorError> {
    let mut calibrator = BiasCalibrator::new(config);
    loop {
        let raw = source.read_sample()?;
        if let Some(offsets) = calibrator.feed(&raw) {
            return Ok(offsets);
        }
    }
}
