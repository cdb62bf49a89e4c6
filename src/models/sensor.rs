/// Decoded device samples
///
/// The acquisition layer owns the sensors; the core only ever sees these
/// already-materialized, time-ordered snapshots of one test attempt.

use serde::{Deserialize, Serialize};

/// Linear acceleration in m/s²
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One accelerometer reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertialSample {
    pub acceleration: Acceleration,
    pub timestamp_ms: u64,
}

impl InertialSample {
    pub fn new(x: f64, y: f64, z: f64, timestamp_ms: u64) -> Self {
        Self {
            acceleration: Acceleration { x, y, z },
            timestamp_ms,
        }
    }

    /// Vertical channel used for jump detection
    pub fn vertical(&self) -> f64 {
        self.acceleration.y
    }
}

/// One device-orientation reading, angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationSample {
    /// Heading around the vertical axis [0, 360)
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub timestamp_ms: u64,
}

impl OrientationSample {
    pub fn heading(alpha: f64, timestamp_ms: u64) -> Self {
        Self {
            alpha,
            beta: 0.0,
            gamma: 0.0,
            timestamp_ms,
        }
    }
}

/// One geolocation fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub lat: f64,
    pub lng: f64,
    pub timestamp_ms: u64,
    pub accuracy_meters: f64,
}

impl GpsFix {
    pub fn new(lat: f64, lng: f64, timestamp_ms: u64, accuracy_meters: f64) -> Self {
        Self {
            lat,
            lng,
            timestamp_ms,
            accuracy_meters,
        }
    }
}
