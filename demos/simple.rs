use nalgebra::Vector3;
use telemetry_fusion::{FusionCore, FusionThresholds, GpsFix, SensorSample};

const SAMPLE_PERIOD: f32 = 0.01; // 10 ms loop period

fn main() {
    env_logger::init();

    let mut core = FusionCore::new(FusionThresholds::default());

    for i in 0..10u32 {
        // this loop should repeat each time new inertial data is available
        let sample = SensorSample {
            accel: Vector3::new(0.0, 0.0, 1.0), // replace this with bias-corrected accelerometer data in g
            gyro: Vector3::new(0.0, 0.0, 0.0),  // replace this with bias-corrected gyroscope data in deg/s
            timestamp_ms: i * 10,
        };
        let gps = GpsFix::default(); // replace this with the latest decoded fix

        let record = core.update(sample.timestamp_ms, Some(&sample), None, &gps, SAMPLE_PERIOD);

        println!(
            "Roll: {:.2}, Pitch: {:.2}, Yaw: {:.2} | csv: {}",
            record.roll_deg, record.pitch_deg, record.yaw_fused_deg, record
        );
    }
}
