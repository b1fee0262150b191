//! End-to-end scenarios for the fusion core
//!
//! Each test drives the public API with synthetic sensor input and checks
//! the documented filter behavior: calibration arithmetic, wrap laws,
//! complementary-filter convergence, the dynamics gates, and the GPS
//! correction scenario, all through the same entry points the logger uses.

use nalgebra::Vector3;
use telemetry_fusion::{
    BiasCalibrator, CalibrationConfig, CalibrationOffsets, FusionCore, FusionThresholds, GpsFix,
    ImuSource, OrientationFilter, SensorError, SensorSample, YawMode, calibrate, wrap180, wrap360,
};

const EPSILON: f32 = 1e-4;

fn level_sample(timestamp_ms: u32) -> SensorSample {
    SensorSample {
        accel: Vector3::new(0.0, 0.0, 1.0),
        gyro: Vector3::zeros(),
        timestamp_ms,
    }
}

fn cruise_fix(speed_mph: f32, course_deg: f32) -> GpsFix {
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

/// Calibration over a noise-free stationary window yields zero biases
#[test]
fn test_calibration_on_ideal_stationary_input() {
    struct IdealImu;
    impl ImuSource for IdealImu {
        fn read_sample(&mut self) -> Result<SensorSample, SensorError> {
            Ok(level_sample(0))
        }
    }

    let offsets = calibrate(&mut IdealImu, CalibrationConfig::default()).unwrap();
    assert_eq!(offsets.accel, Vector3::zeros());
    assert_eq!(offsets.gyro, Vector3::zeros());
}

/// Correcting the calibration mean itself gives the ideal stationary sample
#[test]
fn test_bias_subtraction_idempotence() {
    let config = CalibrationConfig {
        settle_samples: 10,
        window_samples: 200,
    };
    let mut calibrator = BiasCalibrator::new(config);
    let mean = SensorSample {
        accel: Vector3::new(0.013, -0.008, 1.021),
        gyro: Vector3::new(0.7, -1.2, 0.4),
        timestamp_ms: 0,
    };

    let mut offsets: Option<CalibrationOffsets> = None;
    for _ in 0..210 {
        offsets = calibrator.feed(&mean);
    }
    let offsets = offsets.unwrap();

    let corrected = offsets.apply(&mean);
    assert!((corrected.accel - Vector3::new(0.0, 0.0, 1.0)).norm() < EPSILON);
    assert!(corrected.gyro.norm() < EPSILON);
}

/// wrap360 is idempotent and stays in [0, 360); wrap180 stays in [-180, 180)
#[test]
fn test_angle_wrap_laws() {
    for i in -3600..3600 {
        let a = i as f32 * 0.57;
        let w = wrap360(a);
        assert!((0.0..360.0).contains(&w), "wrap360({a}) = {w}");
        assert!((wrap360(w) - w).abs() < EPSILON, "wrap360 not idempotent at {a}");

        let s = wrap180(a);
        assert!((-180.0..180.0).contains(&s), "wrap180({a}) = {s}");
    }
}

/// With zero gyro rate and a constant 10° accel roll, the filter holds 10°
#[test]
fn test_complementary_filter_convergence() {
    let mut filter = OrientationFilter::new(FusionThresholds::default());
    // 10° roll: ay = sin(10°), az = cos(10°), magnitude exactly 1 g
    let accel = Vector3::new(0.0, 10f32.to_radians().sin(), 10f32.to_radians().cos());

    for _ in 0..2000 {
        filter.update(Vector3::zeros(), accel, 0.01);
    }
    assert!(
        (filter.roll_deg() - 10.0).abs() < 0.05,
        "roll settled at {}",
        filter.roll_deg()
    );
    assert!(filter.pitch_deg().abs() < 0.05);
}

/// Outside the low-dynamic envelope one step is pure gyro integration
#[test]
fn test_high_dynamic_bypass() {
    let mut filter = OrientationFilter::new(FusionThresholds::default());
    filter.update(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0), 0.01);
    let seeded_roll = filter.roll_deg();

    // Heavy braking: 1.3 g magnitude, more than 0.15 g away from 1 g
    let braking = Vector3::new(-0.8, 0.0, 1.02);
    filter.update(Vector3::new(12.0, 0.0, 0.0), braking, 0.01);

    assert!(!filter.low_dynamic());
    assert!(
        (filter.roll_deg() - (seeded_roll + 12.0 * 0.01)).abs() < EPSILON,
        "expected pure integration, got {}",
        filter.roll_deg()
    );
}

/// The documented correction scenario: 100° gyro, 110° course, k = 0.15
#[test]
fn test_gps_gating_end_to_end() {
    let mut core = FusionCore::new(FusionThresholds::default());

    // Roll past the init threshold to snap the heading to 100°
    core.update(0, Some(&level_sample(0)), None, &cruise_fix(6.0, 100.0), 0.01);

    // Straight, fast, flat: all four gates pass
    let record = core.update(10, Some(&level_sample(10)), None, &cruise_fix(30.0, 110.0), 0.01);
    assert_eq!(record.yaw_mode, YawMode::GpsCorrected);
    assert!((record.yaw_fused_deg - 101.5).abs() < 1e-3);
}

/// Same disagreement below the trust speed: GPS is ignored entirely
#[test]
fn test_gps_gate_rejection_at_low_speed() {
    let mut core = FusionCore::new(FusionThresholds::default());
    core.update(0, Some(&level_sample(0)), None, &cruise_fix(6.0, 100.0), 0.01);

    let record = core.update(10, Some(&level_sample(10)), None, &cruise_fix(10.0, 110.0), 0.01);
    assert_eq!(record.yaw_mode, YawMode::GyroOnly);
    assert!((record.yaw_fused_deg - 100.0).abs() < 1e-3);
    assert!((record.yaw_gyro_deg - 100.0).abs() < 1e-3);
}

/// Cornering gates: lateral g and yaw rate each disable the correction
#[test]
fn test_gps_gate_rejection_while_cornering() {
    let thresholds = FusionThresholds::default();

    // Lateral acceleration gate: sustained 0.3 g on the Y axis
    let mut core = FusionCore::new(thresholds);
    core.update(0, Some(&level_sample(0)), None, &cruise_fix(6.0, 100.0), 0.01);
    let cornering = SensorSample {
        accel: Vector3::new(0.0, 0.3, 0.954), // magnitude ≈ 1 g, but y is loaded
        gyro: Vector3::zeros(),
        timestamp_ms: 10,
    };
    let mut record = core.update(10, Some(&cornering), None, &cruise_fix(30.0, 110.0), 0.01);
    for t in 2..40 {
        record = core.update(t * 10, Some(&cornering), None, &cruise_fix(30.0, 110.0), 0.01);
    }
    assert_eq!(record.yaw_mode, YawMode::GyroOnly);

    // Yaw rate gate: 40 deg/s rotation
    let mut core = FusionCore::new(thresholds);
    core.update(0, Some(&level_sample(0)), None, &cruise_fix(6.0, 100.0), 0.01);
    let rotating = SensorSample {
        accel: Vector3::new(0.0, 0.0, 1.0),
        gyro: Vector3::new(0.0, 0.0, 40.0),
        timestamp_ms: 10,
    };
    let record = core.update(10, Some(&rotating), None, &cruise_fix(30.0, 110.0), 0.01);
    assert_eq!(record.yaw_mode, YawMode::GyroOnly);
}

/// An implausible 5 s dt integrates as the nominal 0.01 s
#[test]
fn test_dt_clamping_in_yaw_integration() {
    let mut filter = OrientationFilter::new(FusionThresholds::default());
    filter.update(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0), 0.01);

    filter.update(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, 1.0), 5.0);
    assert!(
        (filter.yaw_gyro_deg() - 0.1).abs() < EPSILON,
        "5 s stall integrated as {}°",
        filter.yaw_gyro_deg()
    );
}

/// A yaw drift scenario: the correction walks the fused heading toward a
/// steady GPS course while the gyro integral keeps its drift
#[test]
fn test_correction_pulls_toward_course_over_time() {
    let mut core = FusionCore::new(FusionThresholds::default());
    core.update(0, Some(&level_sample(0)), None, &cruise_fix(6.0, 100.0), 0.01);

    let record = core.update(10, Some(&level_sample(10)), None, &cruise_fix(30.0, 112.0), 0.01);
    // One cycle removes 15% of the 12° disagreement
    assert!((record.yaw_fused_deg - 101.8).abs() < 1e-3);
    // The raw integral keeps its value for the diagnostic column
    assert!((record.yaw_gyro_deg - 100.0).abs() < 1e-3);
}

/// The record carries the full CSV contract through the pipeline
#[test]
fn test_record_format_from_pipeline() {
    let mut core = FusionCore::new(FusionThresholds::default());
    let record = core.update(1250, Some(&level_sample(1250)), None, &cruise_fix(28.4, 110.0), 0.01);

    let row = record.to_string();
    let columns: Vec<&str> = row.split(',').collect();
    assert_eq!(columns.len(), 14);
    assert_eq!(columns[0], "1250");
    assert_eq!(columns[10], "33.825591");
    assert_eq!(columns[11], "-118.288300");
    assert_eq!(columns[12], "28.4");
    assert_eq!(columns[13], "0");
}
