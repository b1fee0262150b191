//! Slip-angle estimate from body yaw versus GPS course
//!
//! While cornering, the vehicle travels along a path (GPS course) that is
//! not quite where the nose points (fused yaw); the difference is the slip
//! angle. It is only meaningful at speed with a GPS-corrected heading, so
//! the estimate is gated and reported as `None` elsewhere: a gap in the
//! trace, not a zero.

use crate::math::wrap180;
use crate::types::{GpsFix, YawMode};

/// Slip estimator configuration
#[derive(Debug, Clone, Copy)]
pub struct SlipConfig {
    /// Minimum GPS speed for a meaningful slip reading, in mph
    pub speed_min_mph: f32,
    /// Exponential smoothing factor for the slip output, in (0, 1)
    pub smooth_alpha: f32,
}

impl Default for SlipConfig {
    fn default() -> Self {
        Self {
            speed_min_mph: 25.0,
            smooth_alpha: 0.15,
        }
    }
}

/// Smoothed, gated slip angle in degrees
///
/// Positive when the nose points left of the travel direction. The
/// smoothing state is held across gated-out stretches, so the trace
/// resumes from its last value instead of re-converging from zero.
///
/// # Example
/// ```
/// use telemetry_fusion::{GpsFix, SlipConfig, SlipEstimator, YawMode};
///
/// let mut slip = SlipEstimator::new(SlipConfig::default());
/// let fix = GpsFix {
///     speed_mph: 40.0,
///     course_deg: 95.0,
///     speed_valid: true,
///     course_valid: true,
///     ..Default::default()
/// };
/// let angle = slip.update(100.0, &fix, YawMode::GpsCorrected);
/// assert!(angle.is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SlipEstimator {
    config: SlipConfig,
    smoothed_deg: f32,
    seeded: bool,
}

impl SlipEstimator {
    /// Create an estimator with no slip history
    pub fn new(config: SlipConfig) -> Self {
        Self {
            config,
            smoothed_deg: 0.0,
            seeded: false,
        }
    }

    /// Feed one cycle; returns the smoothed slip angle while the gates hold
    pub fn update(&mut self, yaw_fused_deg: f32, fix: &GpsFix, mode: YawMode) -> Option<f32> {
        let usable = mode == YawMode::GpsCorrected
            && fix.course_usable()
            && fix.speed_mph >= self.config.speed_min_mph;
        if !usable {
            return None;
        }

        let raw = wrap180(yaw_fused_deg - fix.course_deg);
        if self.seeded {
            let alpha = self.config.smooth_alpha;
            self.smoothed_deg = alpha * raw + (1.0 - alpha) * self.smoothed_deg;
        } else {
            self.smoothed_deg = raw;
            self.seeded = true;
        }
        Some(self.smoothed_deg)
    }
}
