//! Angle arithmetic and nalgebra extensions shared across the fusion core

use nalgebra::Vector3;

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Wrap an angle in degrees to the range [0, 360)
///
/// Compass-style wrapping used for heading outputs. The result is always
/// non-negative, including for large negative inputs.
///
/// # Example
/// ```
/// use telemetry_fusion::wrap360;
///
/// assert_eq!(wrap360(370.0), 10.0);
/// assert_eq!(wrap360(-90.0), 270.0);
/// ```
pub fn wrap360(angle: f32) -> f32 {
    let mut wrapped = angle % 360.0;
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    wrapped
}

/// Wrap an angle in degrees to the range [-180, 180)
///
/// Signed wrapping used for angle differences, so that the shortest
/// rotation between two headings keeps its sign.
///
/// # Example
/// ```
/// use telemetry_fusion::wrap180;
///
/// assert_eq!(wrap180(190.0), -170.0);
/// assert_eq!(wrap180(-190.0), 170.0);
/// ```
pub fn wrap180(angle: f32) -> f32 {
    wrap360(angle + 180.0) - 180.0
}

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Calculate the magnitude of the vector
    fn magnitude(&self) -> f32;

    /// Normalize the vector, returning zero vector if magnitude is zero
    fn safe_normalize(&self) -> Vector3<f32>;
}

impl Vector3Ext for Vector3<f32> {
    fn magnitude(&self) -> f32 {
        use nalgebra::ComplexField;
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn safe_normalize(&self) -> Vector3<f32> {
        let mag = self.magnitude();
        if mag > 0.0 {
            *self / mag
        } else {
            Vector3::zeros()
        }
    }
}
