//! Roll and pitch from a gravity-dominated acceleration vector

use nalgebra::{ComplexField, RealField, Vector3};

use crate::math::{RAD_TO_DEG, Vector3Ext};

/// Magnitude below which normalization is skipped to avoid division blow-up
const NORM_EPSILON: f32 = 1e-3;

/// Accelerometer-derived tilt angles in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TiltAngles {
    /// Rotation about the forward (X) axis
    pub roll_deg: f32,
    /// Rotation about the lateral (Y) axis
    pub pitch_deg: f32,
}

/// Decompose a gravity vector into roll and pitch
///
/// `roll = atan2(ay, az)`, `pitch = atan2(−ax, sqrt(ay² + az²))`, both in
/// degrees. Valid only while the vector is dominated by gravity; under
/// braking or cornering the caller must gate the result (the complementary
/// filter does this with its low-dynamic check).
///
/// Near-zero vectors are used unnormalized; atan2 is scale-invariant, so
/// skipping the division only avoids amplifying noise in a degenerate
/// reading.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use telemetry_fusion::tilt_from_gravity;
///
/// let level = tilt_from_gravity(Vector3::new(0.0, 0.0, 1.0));
/// assert!(level.roll_deg.abs() < 1e-4);
/// assert!(level.pitch_deg.abs() < 1e-4);
/// ```
pub fn tilt_from_gravity(accel: Vector3<f32>) -> TiltAngles {
    let gravity = if accel.magnitude() < NORM_EPSILON {
        accel
    } else {
        accel.safe_normalize()
    };

    let roll = gravity.y.atan2(gravity.z);
    let pitch = (-gravity.x).atan2((gravity.y * gravity.y + gravity.z * gravity.z).sqrt());

    TiltAngles {
        roll_deg: roll * RAD_TO_DEG,
        pitch_deg: pitch * RAD_TO_DEG,
    }
}
