#![no_std]

//! Telemetry Fusion - the sensor-fusion core of an IMU + GPS vehicle
//! telemetry logger
//!
//! This library fuses gyroscope, accelerometer, GPS and (diagnostically)
//! magnetometer data into orientation and heading estimates for a small
//! race vehicle, and formats the per-cycle log record the on-board SD
//! logger writes. Roll and pitch come from a complementary filter that
//! blends gyro integration with accelerometer tilt; heading comes from
//! gyro integration disciplined by GPS course over ground, gated on
//! vehicle dynamics so the correction only engages when course actually
//! approximates body heading.
//!
//! # Features
//!
//! - Complementary filter for roll/pitch with a low-dynamic trust gate
//! - GPS-disciplined heading with speed, lateral-g and yaw-rate gates
//! - Stationary-window bias calibration for both inertial sensors
//! - Tilt-compensated magnetic heading, logged as a cross-check
//! - Lap timing against a GPS start/finish gate, engine RPM from
//!   tachometer pulse counts, and slip-angle estimation
//! - Byte-exact CSV record formatting for the existing log tooling
//! - `#![no_std]` compatible for embedded targets
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::Vector3;
//! use telemetry_fusion::{FusionCore, FusionThresholds, GpsFix, SensorSample};
//!
//! let mut core = FusionCore::new(FusionThresholds::default());
//!
//! // this loop should repeat each time new inertial data is available
//! let sample = SensorSample {
//!     accel: Vector3::new(0.0, 0.0, 1.0), // replace with bias-corrected data in g
//!     gyro: Vector3::new(0.0, 0.0, 0.0),  // replace with bias-corrected data in deg/s
//!     timestamp_ms: 10,
//! };
//! let gps = GpsFix::default(); // replace with the latest decoded fix
//!
//! let record = core.update(sample.timestamp_ms, Some(&sample), None, &gps, 0.01);
//!
//! // one CSV row per cycle, ready for the SD card
//! let _row = record; // format with `record.to_string()` on std targets
//! ```

pub mod calibration;
pub mod compass;
pub mod heading;
pub mod lap;
pub mod lowpass;
mod math;
pub mod orientation;
pub mod pipeline;
pub mod record;
pub mod sensors;
pub mod slip;
pub mod tacho;
pub mod tilt;
mod types;

// Re-export all public types and functions
pub use calibration::{BiasCalibrator, CalibrationOffsets, calibrate};
pub use compass::magnetic_heading;
pub use heading::{HeadingFilter, gps_gates_pass};
pub use lap::{GateConfig, Lap, LapTimer, haversine_m};
pub use lowpass::LowPassFilter;
pub use math::{DEG_TO_RAD, RAD_TO_DEG, Vector3Ext, wrap180, wrap360};
pub use orientation::OrientationFilter;
pub use pipeline::FusionCore;
pub use record::LogRecord;
pub use sensors::{GpsSource, ImuSource, MagSource, SensorError};
pub use slip::{SlipConfig, SlipEstimator};
pub use tacho::{PulseCounter, PulseSnapshot, RpmConfig, RpmEstimator};
pub use tilt::{TiltAngles, tilt_from_gravity};
pub use types::{CalibrationConfig, FusionThresholds, GpsFix, SensorSample, YawMode};
