//! Exponential low-pass filtering of the acceleration vector
//!
//! Suppresses engine and chassis vibration before the accelerometer enters
//! tilt computation. One first-order filter per axis.

use nalgebra::Vector3;

/// Per-axis exponential moving average of the acceleration vector
///
/// `filtered = α·raw + (1−α)·filtered_prev` on each axis. State starts at
/// the neutral gravity-up vector (0, 0, 1) so the first tilt estimates are
/// sane rather than converging up from zero.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use telemetry_fusion::LowPassFilter;
///
/// let mut lpf = LowPassFilter::new(0.2);
/// let filtered = lpf.update(Vector3::new(0.0, 0.0, 1.5));
/// assert!((filtered.z - 1.1).abs() < 1e-6); // 0.2·1.5 + 0.8·1.0
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LowPassFilter {
    alpha: f32,
    state: Vector3<f32>,
}

impl LowPassFilter {
    /// Create a filter with the given smoothing factor, α ∈ (0, 1)
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            state: Vector3::new(0.0, 0.0, 1.0),
        }
    }

    /// Fold one raw acceleration vector into the filter state
    pub fn update(&mut self, raw: Vector3<f32>) -> Vector3<f32> {
        self.state = raw * self.alpha + self.state * (1.0 - self.alpha);
        self.state
    }

    /// Current filtered vector without feeding a new sample
    pub fn value(&self) -> Vector3<f32> {
        self.state
    }

    /// Reset to the neutral gravity-up state
    pub fn reset(&mut self) {
        self.state = Vector3::new(0.0, 0.0, 1.0);
    }
}
