//! Tilt-compensated magnetic heading, diagnostic only
//!
//! Computed from the fused roll/pitch and a calibrated magnetometer
//! reading, then logged next to the fused heading as a cross-check. It is
//! never fed back into the heading filter.

use nalgebra::{ComplexField, RealField, Vector3};

use crate::math::{DEG_TO_RAD, RAD_TO_DEG, wrap360};

/// Compute a tilt-compensated magnetic heading in degrees, [0, 360)
///
/// The field vector is rotated into the horizontal plane with the standard
/// roll-then-pitch decomposition, the heading is `atan2(−my′, mx′)`, and a
/// fixed declination correction is added to reference true rather than
/// magnetic north.
///
/// The magnetometer must be hard/soft-iron corrected upstream; only the
/// field direction matters here, not its magnitude.
///
/// # Arguments
/// * `roll_deg` - Fused roll from the orientation filter, degrees
/// * `pitch_deg` - Fused pitch from the orientation filter, degrees
/// * `mag` - Calibrated magnetic field vector in the body frame
/// * `declination_deg` - Local magnetic declination, degrees
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use telemetry_fusion::magnetic_heading;
///
/// // Level, field straight along the body X axis
/// let heading = magnetic_heading(0.0, 0.0, Vector3::new(0.4, 0.0, -0.3), 0.0);
/// assert!(heading.abs() < 1e-3);
/// ```
pub fn magnetic_heading(
    roll_deg: f32,
    pitch_deg: f32,
    mag: Vector3<f32>,
    declination_deg: f32,
) -> f32 {
    let phi = roll_deg * DEG_TO_RAD;
    let theta = pitch_deg * DEG_TO_RAD;

    let (sin_phi, cos_phi) = (phi.sin(), phi.cos());
    let (sin_theta, cos_theta) = (theta.sin(), theta.cos());

    // Project the field onto the horizontal plane
    let mx_h = mag.x * cos_theta + mag.y * sin_phi * sin_theta + mag.z * cos_phi * sin_theta;
    let my_h = mag.y * cos_phi - mag.z * sin_phi;

    wrap360((-my_h).atan2(mx_h) * RAD_TO_DEG + declination_deg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_forward_field_reads_zero() {
        let heading = magnetic_heading(0.0, 0.0, Vector3::new(0.5, 0.0, 0.0), 0.0);
        assert!(heading.abs() < 1e-3);
    }

    #[test]
    fn test_level_quarter_turns() {
        // Level vehicle: heading comes straight from atan2(−my, mx)
        let right = magnetic_heading(0.0, 0.0, Vector3::new(0.0, -0.5, 0.0), 0.0);
        assert!((right - 90.0).abs() < 1e-3);

        let back = magnetic_heading(0.0, 0.0, Vector3::new(-0.5, 0.0, 0.0), 0.0);
        assert!((back - 180.0).abs() < 1e-3);

        let left = magnetic_heading(0.0, 0.0, Vector3::new(0.0, 0.5, 0.0), 0.0);
        assert!((left - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_pitch_compensation_cancels_vertical_leakage() {
        // A horizontal field seen from a pitched body picks up a Z
        // component; compensation must recover the level heading
        let pitch = 25.0;
        let (s, c) = ((pitch * DEG_TO_RAD).sin(), (pitch * DEG_TO_RAD).cos());
        let tilted_field = Vector3::new(0.5 * c, 0.0, 0.5 * s);

        let heading = magnetic_heading(0.0, pitch, tilted_field, 0.0);
        assert!(heading.abs() < 1e-2, "heading leaked to {}", heading);
    }

    #[test]
    fn test_roll_compensation_cancels_vertical_leakage() {
        // Field along body Y, rolled: my/mz mix and compensation undoes it
        let roll = 30.0;
        let (s, c) = ((roll * DEG_TO_RAD).sin(), (roll * DEG_TO_RAD).cos());
        let tilted_field = Vector3::new(0.0, 0.5 * c, -0.5 * s);

        let heading = magnetic_heading(roll, 0.0, tilted_field, 0.0);
        assert!((heading - 270.0).abs() < 1e-2, "heading drifted to {}", heading);
    }

    #[test]
    fn test_declination_shifts_and_wraps() {
        let heading = magnetic_heading(0.0, 0.0, Vector3::new(0.5, 0.0, 0.0), 12.5);
        assert!((heading - 12.5).abs() < 1e-3);

        // 350° + 20° declination wraps past north
        let wrapped = magnetic_heading(0.0, 0.0, Vector3::new(0.49, 0.085, 0.0), 20.0);
        assert!((10.0 - wrapped).abs() < 0.2, "got {}", wrapped);
    }

    #[test]
    fn test_output_range() {
        for i in 0..36 {
            let a = (i as f32) * 10.0 * DEG_TO_RAD;
            let mag = Vector3::new(a.cos(), -a.sin(), 0.2);
            let heading = magnetic_heading(0.0, 0.0, mag, -7.0);
            assert!((0.0..360.0).contains(&heading));
        }
    }
}
