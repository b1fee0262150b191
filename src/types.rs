//! Core types and configuration for the telemetry fusion library

use nalgebra::Vector3;

/// One bias-corrected inertial sample
///
/// Produced by the sensor adapter once per control-loop iteration and
/// consumed immediately by the fusion pipeline; not retained.
///
/// Units follow the logger convention: acceleration in g, angular rate in
/// degrees per second, timestamp in milliseconds since startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSample {
    /// Acceleration in g (body frame, Z up, 1 g when level and at rest)
    pub accel: Vector3<f32>,
    /// Angular rate in degrees per second (body frame)
    pub gyro: Vector3<f32>,
    /// Milliseconds since startup (monotonic)
    pub timestamp_ms: u32,
}

/// Latest decoded GPS fix with per-field validity
///
/// Delivered at GPS cadence (slower than the IMU loop); the pipeline keeps
/// reading the same fix until the receiver produces a new one. Each field
/// carries its own validity flag because receivers routinely report a valid
/// position before speed and course settle.
///
/// # Example
/// ```
/// use telemetry_fusion::GpsFix;
///
/// let fix = GpsFix {
///     lat: 33.825591,
///     lon: -118.288300,
///     speed_mph: 28.4,
///     course_deg: 101.0,
///     location_valid: true,
///     speed_valid: true,
///     course_valid: true,
/// };
/// assert!(fix.course_usable());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GpsFix {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Ground speed in miles per hour
    pub speed_mph: f32,
    /// Course over ground in degrees, compass convention [0, 360)
    pub course_deg: f32,
    /// True when lat/lon carry a real position
    pub location_valid: bool,
    /// True when speed_mph carries a real reading
    pub speed_valid: bool,
    /// True when course_deg carries a real reading
    pub course_valid: bool,
}

impl GpsFix {
    /// True when both course and speed are valid this cycle
    ///
    /// Course over ground is meaningless without a speed to qualify it, so
    /// every consumer of `course_deg` checks both flags together.
    pub fn course_usable(&self) -> bool {
        self.course_valid && self.speed_valid
    }
}

impl Default for GpsFix {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            speed_mph: 0.0,
            course_deg: 0.0,
            location_valid: false,
            speed_valid: false,
            course_valid: false,
        }
    }
}

/// Heading source currently driving the fused yaw estimate
///
/// Logged as the `yaw_mode` CSV column: 0 while the estimate is carried by
/// gyro integration alone (including before heading initialization), 1
/// while the GPS course correction is engaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YawMode {
    /// Pure gyro integration carries the estimate (drift accumulates)
    #[default]
    GyroOnly,
    /// GPS course correction is nudging the estimate this cycle
    GpsCorrected,
}

impl YawMode {
    /// Numeric encoding used in the log record
    pub fn as_u8(self) -> u8 {
        match self {
            YawMode::GyroOnly => 0,
            YawMode::GpsCorrected => 1,
        }
    }
}

/// Fusion tuning constants
///
/// All thresholds and gains for the orientation and heading filters.
/// These are startup constants in the logger: set them once before the
/// control loop starts and never reconfigure at runtime.
///
/// # Example
/// ```
/// use telemetry_fusion::FusionThresholds;
///
/// let thresholds = FusionThresholds {
///     gps_speed_min_mph: 15.0, // stricter course trust for a tight track
///     ..Default::default()
/// };
/// assert_eq!(thresholds.blend_beta, 0.98);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FusionThresholds {
    /// Exponential smoothing factor for the accelerometer vector, in (0, 1)
    ///
    /// Higher values track transients faster but let more vibration noise
    /// into the tilt estimate.
    pub accel_lpf_alpha: f32,
    /// Complementary blend weight on the gyro-integrated angle, in (0, 1)
    ///
    /// Close to 1 means the gyro dominates short-term and the
    /// accelerometer only corrects drift slowly.
    pub blend_beta: f32,
    /// Tolerance around 1 g for the low-dynamic gate, in g
    ///
    /// When the filtered acceleration magnitude deviates from 1 g by more
    /// than this, the accelerometer tilt is not trusted for blending.
    pub low_dynamic_tolerance_g: f32,
    /// Minimum GPS speed to initialize the heading estimate, in mph
    ///
    /// At this speed, moving roughly straight, course over ground is
    /// assumed equal to the vehicle heading and the yaw estimate is
    /// snapped to it once.
    pub gps_speed_init_mph: f32,
    /// Minimum GPS speed for course corrections, in mph
    ///
    /// Course over ground is noise below walking-pace speeds; corrections
    /// are gated off under this threshold.
    pub gps_speed_min_mph: f32,
    /// Maximum filtered lateral acceleration for course trust, in g
    ///
    /// Cornering produces slip angle that decouples GPS course from body
    /// heading; corrections are gated off above this threshold.
    pub lateral_accel_limit_g: f32,
    /// Maximum yaw rate for course trust, in degrees per second
    pub yaw_rate_limit_dps: f32,
    /// Proportional gain applied to the GPS course error per cycle
    ///
    /// Limits how fast GPS can pull the gyro estimate, so one bad course
    /// reading cannot cause a visible heading jump.
    pub gps_correction_gain: f32,
    /// Magnetic declination added to the magnetometer heading, in degrees
    pub declination_deg: f32,
}

impl Default for FusionThresholds {
    fn default() -> Self {
        Self {
            accel_lpf_alpha: 0.2,
            blend_beta: 0.98,
            low_dynamic_tolerance_g: 0.15,
            gps_speed_init_mph: 5.0,
            gps_speed_min_mph: 12.0,
            lateral_accel_limit_g: 0.15,
            yaw_rate_limit_dps: 25.0,
            gps_correction_gain: 0.15,
            declination_deg: 0.0,
        }
    }
}

/// Bias calibration window configuration
///
/// The vehicle must be stationary and level for the whole window; this is
/// an operator instruction, not a runtime-checked invariant.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationConfig {
    /// Samples discarded before averaging, letting the sensor's internal
    /// filters settle after power-up
    pub settle_samples: u32,
    /// Samples averaged to form the offsets (typical range 500–2000)
    pub window_samples: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            settle_samples: 50,
            window_samples: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds_match_logger_constants() {
        let t = FusionThresholds::default();
        assert_eq!(t.accel_lpf_alpha, 0.2);
        assert_eq!(t.blend_beta, 0.98);
        assert_eq!(t.low_dynamic_tolerance_g, 0.15);
        assert_eq!(t.gps_speed_init_mph, 5.0);
        assert_eq!(t.gps_speed_min_mph, 12.0);
        assert_eq!(t.lateral_accel_limit_g, 0.15);
        assert_eq!(t.yaw_rate_limit_dps, 25.0);
        assert_eq!(t.gps_correction_gain, 0.15);
    }

    #[test]
    fn test_default_fix_is_fully_invalid() {
        let fix = GpsFix::default();
        assert!(!fix.location_valid);
        assert!(!fix.speed_valid);
        assert!(!fix.course_valid);
        assert!(!fix.course_usable());
    }

    #[test]
    fn test_yaw_mode_encoding() {
        assert_eq!(YawMode::GyroOnly.as_u8(), 0);
        assert_eq!(YawMode::GpsCorrected.as_u8(), 1);
    }

    #[test]
    fn test_course_usable_requires_both_flags() {
        let mut fix = GpsFix {
            course_valid: true,
            ..Default::default()
        };
        assert!(!fix.course_usable());
        fix.speed_valid = true;
        assert!(fix.course_usable());
    }
}
