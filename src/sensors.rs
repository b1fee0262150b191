//! Sensor adapter traits decoupling the fusion core from bus access
//!
//! The fusion core never touches I2C/SPI registers or NMEA sentences; it
//! consumes already-decoded samples through these traits. Hardware crates
//! implement them over real buses, tests implement them over canned data.
//!
//! A failed bus transaction surfaces as `Err(SensorError)`. The adapter
//! boundary turns that into "no sample this cycle" for the pipeline, which
//! holds its previous filter state instead of integrating garbage.

use nalgebra::Vector3;

use crate::types::{GpsFix, SensorSample};

/// Transient sensor access failure
///
/// Kept `Copy` and payload-free so adapters can return it from hot paths
/// without allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Bus transaction failed (NACK, arbitration loss, CRC)
    Bus,
    /// Bus transaction exceeded its hardware timeout
    Timeout,
    /// Device has no fresh data ready
    NotReady,
}

impl core::fmt::Display for SensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SensorError::Bus => write!(f, "sensor bus transaction failed"),
            SensorError::Timeout => write!(f, "sensor bus transaction timed out"),
            SensorError::NotReady => write!(f, "sensor has no data ready"),
        }
    }
}

impl core::error::Error for SensorError {}

/// Source of bias-corrected inertial samples
///
/// `read_sample` performs one synchronous bus transaction and returns the
/// calibrated accelerometer (g) and gyroscope (deg/s) readings.
pub trait ImuSource {
    /// Read one inertial sample
    fn read_sample(&mut self) -> Result<SensorSample, SensorError>;
}

/// Source of decoded GPS fixes
///
/// Returns the latest fix known to the receiver; fields that have not
/// settled yet carry `false` validity flags rather than an error.
pub trait GpsSource {
    /// Read the latest fix
    fn read_fix(&mut self) -> Result<GpsFix, SensorError>;
}

/// Source of calibrated magnetometer readings
///
/// Readings are hard/soft-iron corrected by the adapter; units are
/// arbitrary but must be consistent across axes (only the direction is
/// used).
pub trait MagSource {
    /// Read one magnetic field vector
    fn read_field(&mut self) -> Result<Vector3<f32>, SensorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedImu(SensorSample);

    impl ImuSource for FixedImu {
        fn read_sample(&mut self) -> Result<SensorSample, SensorError> {
            Ok(self.0)
        }
    }

    struct StaleGps;

    impl GpsSource for StaleGps {
        fn read_fix(&mut self) -> Result<GpsFix, SensorError> {
            Ok(GpsFix::default())
        }
    }

    struct DeadMag;

    impl MagSource for DeadMag {
        fn read_field(&mut self) -> Result<Vector3<f32>, SensorError> {
            Err(SensorError::Bus)
        }
    }

    #[test]
    fn test_trait_object_safety() {
        let mut imu = FixedImu(SensorSample::default());
        let dynamic: &mut dyn ImuSource = &mut imu;
        assert!(dynamic.read_sample().is_ok());
    }

    #[test]
    fn test_gps_reports_invalid_fields_not_errors() {
        // A receiver that has not settled returns a fix with false flags
        let fix = StaleGps.read_fix().unwrap();
        assert!(!fix.course_usable());
    }

    #[test]
    fn test_mag_failure_becomes_no_sample() {
        // The adapter boundary maps a bus fault to "skip this cycle"
        let field = DeadMag.read_field().ok();
        assert!(field.is_none());
    }

    #[test]
    fn test_error_display() {
        extern crate std;
        use std::string::ToString;
        assert_eq!(
            SensorError::Timeout.to_string(),
            "sensor bus transaction timed out"
        );
    }
}
