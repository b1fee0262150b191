//! Fixed-order per-tick fusion pipeline
//!
//! One `FusionCore::update` per control-loop iteration, running the stages
//! in a fixed internal order: accel low-pass → tilt → complementary blend
//! → yaw integration → GPS gating → record. Each stage's output is the
//! next stage's input within the same tick, so the order is load-bearing:
//! reordering breaks the dt-based integration.

use nalgebra::Vector3;

use crate::compass::magnetic_heading;
use crate::heading::HeadingFilter;
use crate::lowpass::LowPassFilter;
use crate::orientation::OrientationFilter;
use crate::record::LogRecord;
use crate::types::{FusionThresholds, GpsFix, SensorSample};

/// Complete fusion state for one vehicle, updated once per loop tick
///
/// Owns every filter in the pipeline; nothing else mutates them. Lives for
/// the whole process: there is no shutdown path on the logger, state
/// persists until power-off.
///
/// A cycle with no inertial sample (bus fault surfaced by the adapter)
/// holds all filter state rather than integrating garbage, and the record
/// re-emits the previous estimates. A cycle with no magnetometer reading
/// re-logs the previous magnetic heading, explicitly, not as a silent
/// default.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use telemetry_fusion::{FusionCore, FusionThresholds, GpsFix, SensorSample};
///
/// let mut core = FusionCore::new(FusionThresholds::default());
/// let sample = SensorSample {
///     accel: Vector3::new(0.0, 0.0, 1.0),
///     gyro: Vector3::zeros(),
///     timestamp_ms: 10,
/// };
/// let record = core.update(10, Some(&sample), None, &GpsFix::default(), 0.01);
/// assert_eq!(record.timestamp_ms, 10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FusionCore {
    thresholds: FusionThresholds,
    lowpass: LowPassFilter,
    orientation: OrientationFilter,
    heading: HeadingFilter,
    yaw_mag_deg: f32,
}

impl FusionCore {
    /// Create a core with unseeded filters
    pub fn new(thresholds: FusionThresholds) -> Self {
        Self {
            thresholds,
            lowpass: LowPassFilter::new(thresholds.accel_lpf_alpha),
            orientation: OrientationFilter::new(thresholds),
            heading: HeadingFilter::new(thresholds),
            yaw_mag_deg: 0.0,
        }
    }

    /// Run one control-loop tick and produce the log record
    ///
    /// # Arguments
    /// * `timestamp_ms` - Loop timestamp for the record
    /// * `imu` - This cycle's inertial sample, `None` on a read failure
    /// * `mag` - This cycle's magnetic field reading, `None` on a read
    ///   failure or when no magnetometer is fitted
    /// * `gps` - Latest fix (re-used across cycles between GPS updates)
    /// * `dt` - Elapsed seconds since the previous update
    pub fn update(
        &mut self,
        timestamp_ms: u32,
        imu: Option<&SensorSample>,
        mag: Option<Vector3<f32>>,
        gps: &GpsFix,
        dt: f32,
    ) -> LogRecord {
        if let Some(sample) = imu {
            let accel_lpf = self.lowpass.update(sample.accel);
            self.orientation.update(sample.gyro, accel_lpf, dt);

            // Body-frame lateral acceleration approximates cornering load
            let lateral_g = accel_lpf.y;
            self.heading.update(
                self.orientation.yaw_gyro_mut(),
                lateral_g,
                sample.gyro.z,
                gps,
            );
        }

        if let Some(field) = mag {
            self.yaw_mag_deg = magnetic_heading(
                self.orientation.roll_deg(),
                self.orientation.pitch_deg(),
                field,
                self.thresholds.declination_deg,
            );
        }

        LogRecord {
            timestamp_ms,
            accel_lpf: self.lowpass.value(),
            roll_deg: self.orientation.roll_deg(),
            pitch_deg: self.orientation.pitch_deg(),
            yaw_fused_deg: self.heading.yaw_fused_deg(),
            yaw_gyro_deg: self.orientation.yaw_gyro_deg(),
            yaw_mag_deg: self.yaw_mag_deg,
            yaw_gps_deg: gps.course_deg,
            lat: gps.lat,
            lon: gps.lon,
            speed_mph: gps.speed_mph,
            yaw_mode: self.heading.mode(),
            tach: None,
        }
    }

    /// Orientation filter state for diagnostics
    pub fn orientation(&self) -> &OrientationFilter {
        &self.orientation
    }

    /// Heading filter state for diagnostics
    pub fn heading(&self) -> &HeadingFilter {
        &self.heading
    }

    /// Configured thresholds
    pub fn thresholds(&self) -> &FusionThresholds {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::YawMode;

    fn level_sample(timestamp_ms: u32) -> SensorSample {
        SensorSample {
            accel: Vector3::new(0.0, 0.0, 1.0),
            gyro: Vector3::zeros(),
            timestamp_ms,
        }
    }

    fn moving_fix(speed_mph: f32, course_deg: f32) -> GpsFix {
        GpsFix {
            lat: 33.825591,
            lon: -118.288300,
            speed_mph,
            course_deg,
            location_valid: true,
            speed_valid: true,
            course_valid: true,
        }
    }

    #[test]
    fn test_steady_state_record() {
        let mut core = FusionCore::new(FusionThresholds::default());
        let gps = GpsFix::default();

        let mut record = core.update(0, Some(&level_sample(0)), None, &gps, 0.01);
        for t in 1..200 {
            record = core.update(t * 10, Some(&level_sample(t * 10)), None, &gps, 0.01);
        }

        assert_eq!(record.timestamp_ms, 1990);
        assert!(record.roll_deg.abs() < 0.01);
        assert!(record.pitch_deg.abs() < 0.01);
        assert_eq!(record.yaw_mode, YawMode::GyroOnly);
        assert!((record.accel_lpf.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_missing_imu_holds_every_estimate() {
        let mut core = FusionCore::new(FusionThresholds::default());
        let gps = moving_fix(30.0, 90.0);

        // Initialize heading, then spin up some yaw
        core.update(0, Some(&level_sample(0)), None, &gps, 0.01);
        let spinning = SensorSample {
            accel: Vector3::new(0.0, 0.0, 1.0),
            gyro: Vector3::new(0.0, 0.0, 30.0),
            timestamp_ms: 10,
        };
        let before = core.update(10, Some(&spinning), None, &gps, 0.01);

        // Bus fault: nothing may move, even with a fresh GPS fix in hand
        let held = core.update(20, None, None, &moving_fix(30.0, 180.0), 0.01);
        assert_eq!(held.yaw_gyro_deg, before.yaw_gyro_deg);
        assert_eq!(held.yaw_fused_deg, before.yaw_fused_deg);
        assert_eq!(held.roll_deg, before.roll_deg);
        assert_eq!(held.timestamp_ms, 20);
    }

    #[test]
    fn test_missing_mag_holds_previous_heading() {
        let mut core = FusionCore::new(FusionThresholds::default());
        let gps = GpsFix::default();

        let record = core.update(
            0,
            Some(&level_sample(0)),
            Some(Vector3::new(0.0, -0.5, 0.0)),
            &gps,
            0.01,
        );
        assert!((record.yaw_mag_deg - 90.0).abs() < 1e-3);

        // Magnetometer bus error: previous value is re-logged
        let held = core.update(10, Some(&level_sample(10)), None, &gps, 0.01);
        assert_eq!(held.yaw_mag_deg, record.yaw_mag_deg);
    }

    #[test]
    fn test_heading_initialisation_snaps_both_yaw_outputs() {
        let mut core = FusionCore::new(FusionThresholds::default());

        // No GPS yet: yaw stays at the integration origin
        let record = core.update(0, Some(&level_sample(0)), None, &GpsFix::default(), 0.01);
        assert_eq!(record.yaw_gyro_deg, 0.0);

        // First usable course at 6 mph snaps yaw_gyro and yaw_fused
        let record = core.update(10, Some(&level_sample(10)), None, &moving_fix(6.0, 247.0), 0.01);
        assert_eq!(record.yaw_gyro_deg, 247.0);
        assert_eq!(record.yaw_fused_deg, 247.0);
        assert_eq!(record.yaw_mode, YawMode::GyroOnly);
    }

    #[test]
    fn test_gps_correction_flows_into_record() {
        let mut core = FusionCore::new(FusionThresholds::default());

        core.update(0, Some(&level_sample(0)), None, &moving_fix(6.0, 100.0), 0.01);

        // Straight-line cruise with a 10° course disagreement
        let record = core.update(10, Some(&level_sample(10)), None, &moving_fix(30.0, 110.0), 0.01);
        assert_eq!(record.yaw_mode, YawMode::GpsCorrected);
        assert!((record.yaw_fused_deg - 101.5).abs() < 1e-3);
        assert!((record.yaw_gyro_deg - 100.0).abs() < 1e-3);
    }
}
