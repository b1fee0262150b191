//! Raw sensor log replay through the full fusion pipeline
//!
//! Replays a CSV capture of raw sensor data (IMU at loop rate, GPS fixes
//! interleaved), runs the same fusion the logger runs on the car, detects
//! laps against the start/finish gate, and renders a summary plot of the
//! estimated angles and the heading-source mode.
//!
//! Expected CSV header:
//!
//! ```text
//! Time (s),Gyroscope X (deg/s),Gyroscope Y (deg/s),Gyroscope Z (deg/s),
//! Accelerometer X (g),Accelerometer Y (g),Accelerometer Z (g),
//! Latitude (deg),Longitude (deg),Speed (mph),Course (deg),Fix Valid
//! ```
//!
//! Run with: `cargo run --example replay -- testdata/track_session.csv`

use nalgebra::Vector3;
use plotters::prelude::*;
use serde::Deserialize;
use std::error::Error;
use telemetry_fusion::{
    FusionCore, FusionThresholds, GateConfig, GpsFix, LapTimer, SensorSample, YawMode,
};

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Time (s)")]
    time: f32,
    #[serde(rename = "Gyroscope X (deg/s)")]
    gyro_x: f32,
    #[serde(rename = "Gyroscope Y (deg/s)")]
    gyro_y: f32,
    #[serde(rename = "Gyroscope Z (deg/s)")]
    gyro_z: f32,
    #[serde(rename = "Accelerometer X (g)")]
    accel_x: f32,
    #[serde(rename = "Accelerometer Y (g)")]
    accel_y: f32,
    #[serde(rename = "Accelerometer Z (g)")]
    accel_z: f32,
    #[serde(rename = "Latitude (deg)")]
    lat: f64,
    #[serde(rename = "Longitude (deg)")]
    lon: f64,
    #[serde(rename = "Speed (mph)")]
    speed_mph: f32,
    #[serde(rename = "Course (deg)")]
    course_deg: f32,
    #[serde(rename = "Fix Valid")]
    fix_valid: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "testdata/track_session.csv".to_string());
    println!("Replaying {path} through the fusion pipeline");

    let mut reader = csv::Reader::from_path(&path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: RawRow = result?;
        rows.push(row);
    }
    println!("Loaded {} samples", rows.len());

    let mut core = FusionCore::new(FusionThresholds::default());
    let mut lap_timer: Option<LapTimer> = None;

    let mut times = Vec::new();
    let mut angles = Vec::new(); // (roll, pitch)
    let mut headings = Vec::new(); // (yaw_fused, yaw_gyro, yaw_gps)
    let mut modes = Vec::new();
    let mut prev_time = None;

    for (i, row) in rows.iter().enumerate() {
        let dt = match prev_time {
            Some(prev) => row.time - prev,
            None => 0.01,
        };
        prev_time = Some(row.time);

        let sample = SensorSample {
            accel: Vector3::new(row.accel_x, row.accel_y, row.accel_z),
            gyro: Vector3::new(row.gyro_x, row.gyro_y, row.gyro_z),
            timestamp_ms: (row.time * 1000.0) as u32,
        };
        let valid = row.fix_valid != 0;
        let gps = GpsFix {
            lat: row.lat,
            lon: row.lon,
            speed_mph: row.speed_mph,
            course_deg: row.course_deg,
            location_valid: valid,
            speed_valid: valid,
            course_valid: valid,
        };

        let record = core.update(sample.timestamp_ms, Some(&sample), None, &gps, dt);

        // Arm the lap gate on the first valid position of the session
        if valid {
            let timer = lap_timer
                .get_or_insert_with(|| LapTimer::new(GateConfig::new(row.lat, row.lon)));
            if let Some(lap) = timer.update(row.lat, row.lon, row.time) {
                println!("Lap {}: {:.2} s", lap.number, lap.duration_s);
            }
        }

        times.push(row.time);
        angles.push((record.roll_deg, record.pitch_deg));
        headings.push((record.yaw_fused_deg, record.yaw_gyro_deg, record.yaw_gps_deg));
        modes.push(record.yaw_mode);

        if i % 1000 == 0 {
            println!(
                "Sample {i}: roll={:.1} pitch={:.1} yaw={:.1} mode={}",
                record.roll_deg,
                record.pitch_deg,
                record.yaw_fused_deg,
                record.yaw_mode.as_u8()
            );
        }
    }

    let corrected = modes.iter().filter(|m| **m == YawMode::GpsCorrected).count();
    println!(
        "GPS correction engaged on {corrected}/{} cycles ({:.1}%)",
        modes.len(),
        100.0 * corrected as f32 / modes.len().max(1) as f32
    );

    create_plots(&times, &angles, &headings, &modes)?;
    println!("✓ Plots saved to replay_plots.png");
    Ok(())
}

/// Render roll/pitch, the three heading estimates, and the mode trace
fn create_plots(
    times: &[f32],
    angles: &[(f32, f32)],
    headings: &[(f32, f32, f32)],
    modes: &[YawMode],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new("replay_plots.png", (1000, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((3, 1));

    let t0 = *times.first().unwrap_or(&0.0);
    let t1 = *times.last().unwrap_or(&1.0);

    // 1. Roll and pitch
    let mut tilt_chart = ChartBuilder::on(&panels[0])
        .caption("Fused roll and pitch", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(25)
        .y_label_area_size(50)
        .build_cartesian_2d(t0..t1, -45f32..45f32)?;
    tilt_chart.configure_mesh().y_desc("Degrees").draw()?;

    tilt_chart
        .draw_series(LineSeries::new(
            times.iter().zip(angles.iter()).map(|(t, a)| (*t, a.0)),
            &RED,
        ))?
        .label("Roll")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], RED));
    tilt_chart
        .draw_series(LineSeries::new(
            times.iter().zip(angles.iter()).map(|(t, a)| (*t, a.1)),
            &GREEN,
        ))?
        .label("Pitch")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], GREEN));
    tilt_chart.configure_series_labels().draw()?;

    // 2. Heading estimates
    let mut heading_chart = ChartBuilder::on(&panels[1])
        .caption("Heading: fused vs gyro vs GPS course", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(25)
        .y_label_area_size(50)
        .build_cartesian_2d(t0..t1, 0f32..360f32)?;
    heading_chart.configure_mesh().y_desc("Degrees").draw()?;

    heading_chart
        .draw_series(LineSeries::new(
            times.iter().zip(headings.iter()).map(|(t, h)| (*t, h.0)),
            &BLUE,
        ))?
        .label("Fused")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], BLUE));
    heading_chart
        .draw_series(LineSeries::new(
            times.iter().zip(headings.iter()).map(|(t, h)| (*t, h.1)),
            &RGBColor(128, 128, 0),
        ))?
        .label("Gyro")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], RGBColor(128, 128, 0)));
    heading_chart
        .draw_series(LineSeries::new(
            times.iter().zip(headings.iter()).map(|(t, h)| (*t, h.2)),
            &RGBColor(255, 165, 0),
        ))?
        .label("GPS course")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], RGBColor(255, 165, 0)));
    heading_chart.configure_series_labels().draw()?;

    // 3. Heading-source mode
    let mut mode_chart = ChartBuilder::on(&panels[2])
        .caption("GPS correction engaged", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(t0..t1, -0.1f32..1.1f32)?;
    mode_chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_label_formatter(&|y| {
            if *y < 0.5 {
                "Gyro".to_string()
            } else {
                "GPS".to_string()
            }
        })
        .draw()?;

    mode_chart.draw_series(LineSeries::new(
        times
            .iter()
            .zip(modes.iter())
            .map(|(t, m)| (*t, m.as_u8() as f32)),
        &CYAN,
    ))?;

    root.present()?;
    Ok(())
}
