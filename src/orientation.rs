//! Complementary filter fusing gyro integration with accelerometer tilt
//!
//! Roll and pitch blend a gyro-integrated angle with the accelerometer's
//! tilt estimate; yaw has no gravity reference and is pure integration
//! here (the heading filter disciplines it with GPS course separately).

use nalgebra::Vector3;

use crate::math::{Vector3Ext, wrap360};
use crate::tilt::{TiltAngles, tilt_from_gravity};
use crate::types::FusionThresholds;

/// Longest loop interval accepted as real, in seconds
const DT_MAX: f32 = 0.1;
/// Substitute interval when dt is implausible, in seconds
const DT_NOMINAL: f32 = 0.01;

/// Roll/pitch/yaw estimator driven once per control-loop tick
///
/// Two states: unseeded and running. The first update seeds roll and pitch
/// directly from the accelerometer tilt (no gyro blend yet); every later
/// update integrates the gyro and, while the vehicle is in a low-dynamic
/// condition, pulls the integral toward the accelerometer tilt with weight
/// `1 − β`. β close to 1 trades fast accelerometer correction for immunity
/// to vibration spikes; roll/pitch drift is corrected slowly, on purpose.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use telemetry_fusion::{FusionThresholds, OrientationFilter};
///
/// let mut filter = OrientationFilter::new(FusionThresholds::default());
/// filter.update(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0), 0.01);
/// assert!(filter.roll_deg().abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OrientationFilter {
    thresholds: FusionThresholds,
    seeded: bool,
    roll_deg: f32,
    pitch_deg: f32,
    yaw_gyro_deg: f32,
    low_dynamic: bool,
}

impl OrientationFilter {
    /// Create an unseeded filter
    pub fn new(thresholds: FusionThresholds) -> Self {
        Self {
            thresholds,
            seeded: false,
            roll_deg: 0.0,
            pitch_deg: 0.0,
            yaw_gyro_deg: 0.0,
            low_dynamic: true,
        }
    }

    /// Advance the filter by one loop tick
    ///
    /// # Arguments
    /// * `gyro` - Bias-corrected angular rate in degrees per second
    /// * `accel_filtered` - Low-pass-filtered acceleration in g
    /// * `dt` - Elapsed seconds since the previous update; values outside
    ///   (0, 0.1] are replaced by a nominal 0.01 s so one bad timer read
    ///   cannot corrupt the integrals
    pub fn update(&mut self, gyro: Vector3<f32>, accel_filtered: Vector3<f32>, dt: f32) {
        let tilt = tilt_from_gravity(accel_filtered);

        if !self.seeded {
            self.roll_deg = tilt.roll_deg;
            self.pitch_deg = tilt.pitch_deg;
            self.seeded = true;
            return;
        }

        let dt = clamp_dt(dt);
        self.low_dynamic =
            (accel_filtered.magnitude() - 1.0).abs() <= self.thresholds.low_dynamic_tolerance_g;

        self.roll_deg = self.blend_axis(self.roll_deg, gyro.x, tilt.roll_deg, dt);
        self.pitch_deg = self.blend_axis(self.pitch_deg, gyro.y, tilt.pitch_deg, dt);
        self.yaw_gyro_deg = wrap360(self.yaw_gyro_deg + gyro.z * dt);
    }

    fn blend_axis(&self, prev_deg: f32, rate_dps: f32, accel_deg: f32, dt: f32) -> f32 {
        let gyro_deg = prev_deg + rate_dps * dt;
        if self.low_dynamic {
            let beta = self.thresholds.blend_beta;
            beta * gyro_deg + (1.0 - beta) * accel_deg
        } else {
            // Accelerometer is measuring vehicle dynamics, not gravity;
            // carry the gyro alone until things settle
            gyro_deg
        }
    }

    /// Fused roll in degrees
    pub fn roll_deg(&self) -> f32 {
        self.roll_deg
    }

    /// Fused pitch in degrees
    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    /// Gyro-integrated yaw in degrees, [0, 360)
    pub fn yaw_gyro_deg(&self) -> f32 {
        self.yaw_gyro_deg
    }

    /// Mutable access to the yaw integral
    ///
    /// The heading filter snaps this to the GPS course when it initializes;
    /// nothing else should write it.
    pub fn yaw_gyro_mut(&mut self) -> &mut f32 {
        &mut self.yaw_gyro_deg
    }

    /// Current fused tilt as a pair
    pub fn tilt(&self) -> TiltAngles {
        TiltAngles {
            roll_deg: self.roll_deg,
            pitch_deg: self.pitch_deg,
        }
    }

    /// True once the first accelerometer seed has happened
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// True when the last update trusted the accelerometer tilt
    pub fn low_dynamic(&self) -> bool {
        self.low_dynamic
    }
}

fn clamp_dt(dt: f32) -> f32 {
    if dt > 0.0 && dt <= DT_MAX { dt } else { DT_NOMINAL }
}
