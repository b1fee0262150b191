//! Start/finish gate detection and lap timing from GPS positions
//!
//! The gate is a circle around a surveyed start/finish point. A lap
//! completes on each outside→inside crossing, with the crossing instant
//! linearly interpolated between the bracketing GPS samples so lap times
//! are not quantized to the logging rate. Laps shorter than a minimum
//! plausible time are discarded (gate jitter while parked on the line),
//! but their crossing still starts the next lap.

use nalgebra::{ComplexField, RealField};

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

const DEG_TO_RAD_F64: f64 = core::f64::consts::PI / 180.0;

/// Great-circle distance between two WGS84 positions in meters
///
/// Haversine formulation; accurate to well under a meter over the few
/// hundred meters a lap gate cares about.
///
/// # Example
/// ```
/// use telemetry_fusion::haversine_m;
///
/// // One degree of latitude is about 111.2 km
/// let d = haversine_m(33.0, -118.0, 34.0, -118.0);
/// assert!((d - 111_195.0).abs() < 100.0);
/// ```
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1 * DEG_TO_RAD_F64;
    let phi2 = lat2 * DEG_TO_RAD_F64;
    let dphi = (lat2 - lat1) * DEG_TO_RAD_F64;
    let dlambda = (lon2 - lon1) * DEG_TO_RAD_F64;

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Start/finish gate definition
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// Gate center latitude in degrees
    pub lat: f64,
    /// Gate center longitude in degrees
    pub lon: f64,
    /// Gate radius in meters
    pub radius_m: f64,
    /// Laps shorter than this are discarded, in seconds
    pub min_lap_time_s: f32,
}

impl GateConfig {
    /// Gate at the given position with the stock radius and minimum lap time
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            radius_m: 3.0,
            min_lap_time_s: 5.0,
        }
    }
}

/// One completed lap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lap {
    /// 1-based lap count
    pub number: u32,
    /// Gate-to-gate time in seconds
    pub duration_s: f32,
    /// Interpolated crossing time that closed this lap, in seconds
    pub crossed_at_s: f32,
}

/// Incremental lap detector fed one GPS position per fix
///
/// # Example
/// ```
/// use telemetry_fusion::{GateConfig, LapTimer};
///
/// let gate = GateConfig::new(33.825591, -118.288300);
/// let mut timer = LapTimer::new(gate);
///
/// // Approach, cross, leave, come back around...
/// assert!(timer.update(33.826000, -118.288300, 0.0).is_none());
/// assert!(timer.update(33.825591, -118.288300, 1.0).is_none()); // first crossing arms the timer
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LapTimer {
    config: GateConfig,
    prev: Option<PrevSample>,
    inside_prev: bool,
    last_crossing_s: Option<f32>,
    laps_completed: u32,
}

#[derive(Debug, Clone, Copy)]
struct PrevSample {
    distance_m: f64,
    time_s: f32,
}

impl LapTimer {
    /// Create a detector with no crossing history
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            prev: None,
            inside_prev: false,
            last_crossing_s: None,
            laps_completed: 0,
        }
    }

    /// Feed one position; returns the lap completed by this fix, if any
    ///
    /// Positions should only be fed while `location_valid` holds on the
    /// fix; invalid coordinates would register as a teleport through the
    /// gate.
    pub fn update(&mut self, lat: f64, lon: f64, time_s: f32) -> Option<Lap> {
        let distance_m = haversine_m(lat, lon, self.config.lat, self.config.lon);
        let inside = distance_m <= self.config.radius_m;

        let Some(prev) = self.prev else {
            // First fix establishes state only; a car that starts parked
            // on the line must not count a crossing
            self.prev = Some(PrevSample { distance_m, time_s });
            self.inside_prev = inside;
            return None;
        };

        let mut completed = None;
        if inside && !self.inside_prev {
            let crossing_s = interpolate_crossing(
                prev.distance_m,
                distance_m,
                prev.time_s,
                time_s,
                self.config.radius_m,
            );

            if let Some(opened_s) = self.last_crossing_s {
                let duration_s = crossing_s - opened_s;
                if duration_s >= self.config.min_lap_time_s {
                    self.laps_completed += 1;
                    completed = Some(Lap {
                        number: self.laps_completed,
                        duration_s,
                        crossed_at_s: crossing_s,
                    });
                }
            }
            // Every crossing opens the next lap, even when the lap it
            // closed was discarded as implausible
            self.last_crossing_s = Some(crossing_s);
        }

        self.prev = Some(PrevSample { distance_m, time_s });
        self.inside_prev = inside;
        completed
    }

    /// Laps completed so far
    pub fn laps_completed(&self) -> u32 {
        self.laps_completed
    }
}

/// Interpolate when the track crossed the gate radius between two samples
fn interpolate_crossing(d_outside: f64, d_inside: f64, t_a: f32, t_b: f32, radius_m: f64) -> f32 {
    if d_outside == d_inside {
        return t_b;
    }
    let ratio = ((d_outside - radius_m) / (d_outside - d_inside)).clamp(0.0, 1.0) as f32;
    t_a + ratio * (t_b - t_a)
}
