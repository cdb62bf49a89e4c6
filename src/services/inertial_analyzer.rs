/// Inertial Signal Analyzer
///
/// Works on caller-owned accelerometer and orientation windows from one test
/// attempt. Detects jump takeoff/landing and shuttle heading reversals.

use serde::Serialize;
use tracing::debug;

use crate::errors::{AnalysisError, AnalysisResult};
use crate::models::{InertialSample, OrientationSample};

/// Minimum samples for any inertial analysis
pub const MIN_INERTIAL_SAMPLES: usize = 10;

/// Vertical acceleration below this marks takeoff (m/s²)
pub const TAKEOFF_THRESHOLD: f64 = -2.0;

/// Vertical acceleration above this, after takeoff, marks landing (m/s²)
pub const LANDING_THRESHOLD: f64 = 2.0;

pub const GRAVITY: f64 = 9.81;

/// Heading jump that counts as a direction change (degrees)
pub const DIRECTION_CHANGE_DEG: f64 = 90.0;

/// Takeoff and landing located in an accelerometer window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightPhase {
    pub takeoff_index: usize,
    pub landing_index: usize,
    pub flight_time_s: f64,
}

impl FlightPhase {
    /// Peak height in meters for a symmetric flight: g·t²/8
    pub fn height_m(&self) -> f64 {
        0.125 * GRAVITY * self.flight_time_s * self.flight_time_s
    }
}

fn require_samples(actual: usize) -> AnalysisResult<()> {
    if actual < MIN_INERTIAL_SAMPLES {
        return Err(AnalysisError::InsufficientSamples {
            required: MIN_INERTIAL_SAMPLES,
            actual,
        });
    }
    Ok(())
}

/// Locate the first takeoff and the first landing after it
pub fn detect_flight(samples: &[InertialSample]) -> AnalysisResult<Option<FlightPhase>> {
    require_samples(samples.len())?;

    let Some(takeoff_index) = samples.iter().position(|s| s.vertical() < TAKEOFF_THRESHOLD) else {
        debug!("No takeoff below {} m/s²", TAKEOFF_THRESHOLD);
        return Ok(None);
    };
    let Some(offset) = samples[takeoff_index + 1..]
        .iter()
        .position(|s| s.vertical() > LANDING_THRESHOLD)
    else {
        debug!("Takeoff at index {} but no landing", takeoff_index);
        return Ok(None);
    };
    let landing_index = takeoff_index + 1 + offset;

    let takeoff_ms = samples[takeoff_index].timestamp_ms;
    let landing_ms = samples[landing_index].timestamp_ms;
    if landing_ms <= takeoff_ms {
        debug!(
            "Landing at {} ms does not follow takeoff at {} ms",
            landing_ms, takeoff_ms
        );
        return Ok(None);
    }
    let flight_time_s = (landing_ms - takeoff_ms) as f64 / 1000.0;

    debug!(
        "Takeoff at index {}, landing at index {}, flight {:.3}s",
        takeoff_index, landing_index, flight_time_s
    );

    Ok(Some(FlightPhase {
        takeoff_index,
        landing_index,
        flight_time_s,
    }))
}

/// Jump height in whole centimeters.
///
/// Returns 0 when takeoff or landing is not found; treat that as
/// "undetected", not as a real zero-height jump.
pub fn jump_height(samples: &[InertialSample]) -> AnalysisResult<f64> {
    Ok(detect_flight(samples)?
        .map(|flight| (flight.height_m() * 100.0).round())
        .unwrap_or(0.0))
}

/// Completed shuttle legs, counted from heading reversals.
///
/// A change is a successive heading difference above 90° but below 270°,
/// which filters wraparound near 0°/360°. Two reversals make one leg.
pub fn direction_changes(samples: &[OrientationSample]) -> AnalysisResult<u32> {
    require_samples(samples.len())?;

    let raw_changes = samples
        .windows(2)
        .filter(|pair| {
            let delta = (pair[1].alpha - pair[0].alpha).abs();
            delta > DIRECTION_CHANGE_DEG && delta < 360.0 - DIRECTION_CHANGE_DEG
        })
        .count() as u32;

    debug!("{} raw heading changes", raw_changes);
    Ok(raw_changes / 2)
}

/// Span of an orientation window in seconds
pub fn orientation_elapsed_s(samples: &[OrientationSample]) -> f64 {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) if samples.len() >= 2 => {
            last.timestamp_ms.saturating_sub(first.timestamp_ms) as f64 / 1000.0
        }
        _ => 0.0,
    }
}
