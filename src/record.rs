//! Per-cycle log record and its CSV row format
//!
//! The SD logger writes one headerless CSV row per control-loop iteration.
//! Existing analysis tooling parses these files by column position and
//! count, so the order, the column count, and the numeric precision here
//! are a compatibility contract: 3 decimal places for acceleration, 1 for
//! angles and speed, 6 for latitude/longitude, integers for the timestamp
//! and mode. Records with a tachometer snapshot gain two trailing integer
//! columns.

use nalgebra::Vector3;

use crate::tacho::PulseSnapshot;
use crate::types::YawMode;

/// Everything the fusion core produces in one control-loop iteration
///
/// Formatting a record with `Display` yields the exact CSV row the logger
/// stores:
///
/// ```text
/// time_ms,ax,ay,az,roll,pitch,yaw_fused,yaw_gyro,yaw_mag,yaw_gps,lat,lon,speed,yaw_mode[,tach_pulses,tach_min_dt_us]
/// ```
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use telemetry_fusion::{LogRecord, YawMode};
///
/// let record = LogRecord {
///     timestamp_ms: 1250,
///     accel_lpf: Vector3::new(0.012, -0.104, 0.998),
///     roll_deg: -5.96,
///     pitch_deg: 0.64,
///     yaw_fused_deg: 101.5,
///     yaw_gyro_deg: 100.0,
///     yaw_mag_deg: 103.2,
///     yaw_gps_deg: 110.0,
///     lat: 33.825591,
///     lon: -118.288300,
///     speed_mph: 28.4,
///     yaw_mode: YawMode::GpsCorrected,
///     tach: None,
/// };
/// assert_eq!(
///     record.to_string(),
///     "1250,0.012,-0.104,0.998,-6.0,0.6,101.5,100.0,103.2,110.0,33.825591,-118.288300,28.4,1"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LogRecord {
    /// Milliseconds since startup
    pub timestamp_ms: u32,
    /// Low-pass-filtered acceleration in g
    pub accel_lpf: Vector3<f32>,
    /// Fused roll in degrees
    pub roll_deg: f32,
    /// Fused pitch in degrees
    pub pitch_deg: f32,
    /// GPS-disciplined heading in degrees, [0, 360)
    pub yaw_fused_deg: f32,
    /// Pure gyro-integrated yaw in degrees, [0, 360)
    pub yaw_gyro_deg: f32,
    /// Tilt-compensated magnetic heading in degrees (diagnostic)
    pub yaw_mag_deg: f32,
    /// GPS course over ground in degrees as last reported
    pub yaw_gps_deg: f32,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// GPS ground speed in miles per hour
    pub speed_mph: f32,
    /// Heading source this cycle
    pub yaw_mode: YawMode,
    /// Tachometer counters for this interval, when a pickup is fitted
    pub tach: Option<PulseSnapshot>,
}

impl core::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{},{:.3},{:.3},{:.3},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.6},{:.6},{:.1},{}",
            self.timestamp_ms,
            self.accel_lpf.x,
            self.accel_lpf.y,
            self.accel_lpf.z,
            self.roll_deg,
            self.pitch_deg,
            self.yaw_fused_deg,
            self.yaw_gyro_deg,
            self.yaw_mag_deg,
            self.yaw_gps_deg,
            self.lat,
            self.lon,
            self.speed_mph,
            self.yaw_mode.as_u8(),
        )?;
        if let Some(tach) = self.tach {
            write!(f, ",{},{}", tach.pulses, tach.min_dt_us)?;
        }
        Ok(())
    }
}
