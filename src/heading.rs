//! GPS-disciplined heading fusion
//!
//! Yaw has no gravity reference, so the gyro integral must be disciplined
//! by an independent absolute source: GPS course over ground. Course only
//! approximates body heading while the vehicle is moving briskly and
//! roughly straight, so every cycle a set of dynamics gates decides
//! whether the correction may engage.

use nalgebra::ComplexField;

use crate::math::{wrap180, wrap360};
use crate::types::{FusionThresholds, GpsFix, YawMode};

/// Dynamics gates for trusting GPS course as a heading reference
///
/// All four must hold:
/// 1. the course reading is valid this cycle,
/// 2. speed is above the course-trust threshold (course over ground is
///    noise at low speed),
/// 3. filtered body-frame lateral acceleration is below the cornering
///    gate (slip angle decouples course from heading),
/// 4. yaw rate is below the rotation gate (same rationale).
///
/// Evaluated fresh every cycle with no hysteresis; a gate hovering at its
/// threshold will flick the correction on and off each cycle. Known
/// oscillation risk, matching the deployed behavior.
///
/// # Example
/// ```
/// use telemetry_fusion::{FusionThresholds, GpsFix, gps_gates_pass};
///
/// let thresholds = FusionThresholds::default();
/// let fix = GpsFix {
///     speed_mph: 30.0,
///     course_deg: 90.0,
///     speed_valid: true,
///     course_valid: true,
///     ..Default::default()
/// };
/// assert!(gps_gates_pass(&thresholds, &fix, 0.05, 3.0));
/// assert!(!gps_gates_pass(&thresholds, &fix, 0.40, 3.0)); // cornering
/// ```
pub fn gps_gates_pass(
    thresholds: &FusionThresholds,
    fix: &GpsFix,
    lateral_g: f32,
    yaw_rate_dps: f32,
) -> bool {
    fix.course_usable()
        && fix.speed_mph >= thresholds.gps_speed_min_mph
        && lateral_g.abs() < thresholds.lateral_accel_limit_g
        && yaw_rate_dps.abs() < thresholds.yaw_rate_limit_dps
}

/// Heading fusion state machine
///
/// Uninitialised until a valid GPS course arrives above the initialization
/// speed; at that instant the gyro yaw integral is snapped to the course
/// (hard reset, not a blend). Afterwards, whenever the gates pass, the
/// fused heading is the gyro integral nudged a fraction `k` of the way
/// toward the course; otherwise the gyro integral carries the estimate
/// unaided and drift accumulates.
#[derive(Debug, Clone, Copy)]
pub struct HeadingFilter {
    thresholds: FusionThresholds,
    initialised: bool,
    yaw_fused_deg: f32,
    mode: YawMode,
}

impl HeadingFilter {
    /// Create an uninitialised heading filter
    pub fn new(thresholds: FusionThresholds) -> Self {
        Self {
            thresholds,
            initialised: false,
            yaw_fused_deg: 0.0,
            mode: YawMode::GyroOnly,
        }
    }

    /// Advance the state machine by one loop tick
    ///
    /// `yaw_gyro_deg` is the orientation filter's yaw integral; it is
    /// written exactly once, at initialization, when both estimates snap
    /// to the GPS course. Returns the fused heading in [0, 360).
    ///
    /// # Arguments
    /// * `yaw_gyro_deg` - Gyro-integrated yaw, degrees [0, 360)
    /// * `lateral_g` - Filtered body-frame lateral (Y) acceleration in g
    /// * `yaw_rate_dps` - Yaw rate (gz) in degrees per second
    /// * `fix` - Latest GPS fix
    pub fn update(
        &mut self,
        yaw_gyro_deg: &mut f32,
        lateral_g: f32,
        yaw_rate_dps: f32,
        fix: &GpsFix,
    ) -> f32 {
        if !self.initialised {
            if fix.course_usable() && fix.speed_mph >= self.thresholds.gps_speed_init_mph {
                // At low speed moving roughly straight, course ≈ heading
                *yaw_gyro_deg = wrap360(fix.course_deg);
                self.initialised = true;
                log::debug!(
                    "heading initialised from GPS course {:.1} deg at {:.1} mph",
                    fix.course_deg,
                    fix.speed_mph
                );
            }
            self.mode = YawMode::GyroOnly;
            self.yaw_fused_deg = *yaw_gyro_deg;
            return self.yaw_fused_deg;
        }

        if gps_gates_pass(&self.thresholds, fix, lateral_g, yaw_rate_dps) {
            let diff = wrap180(fix.course_deg - *yaw_gyro_deg);
            self.yaw_fused_deg =
                wrap360(*yaw_gyro_deg + self.thresholds.gps_correction_gain * diff);
            self.mode = YawMode::GpsCorrected;
        } else {
            self.yaw_fused_deg = *yaw_gyro_deg;
            self.mode = YawMode::GyroOnly;
        }
        self.yaw_fused_deg
    }

    /// Fused heading in degrees, [0, 360)
    pub fn yaw_fused_deg(&self) -> f32 {
        self.yaw_fused_deg
    }

    /// Heading source engaged on the last update
    pub fn mode(&self) -> YawMode {
        self.mode
    }

    /// True once the estimate has been snapped to a GPS course
    pub fn is_initialised(&self) -> bool {
        self.initialised
    }
}
