/// GPS Track Analyzer
///
/// Cumulative great-circle distance and elapsed time over a time-ordered
/// list of fixes, plus the course sanity checks evaluators apply.

use statrs::statistics::Statistics;
use tracing::debug;

use crate::errors::{AnalysisError, AnalysisResult};
use crate::models::GpsFix;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Minimum fixes for distance or time
pub const MIN_FIXES: usize = 2;

/// Great-circle distance between two fixes in meters
pub fn haversine_m(a: &GpsFix, b: &GpsFix) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Sum of consecutive haversine legs; 0 with fewer than two fixes
pub fn total_distance(fixes: &[GpsFix]) -> f64 {
    if fixes.len() < MIN_FIXES {
        return 0.0;
    }
    let total: f64 = fixes.windows(2).map(|w| haversine_m(&w[0], &w[1])).sum();
    debug!("{} fixes cover {:.1} m", fixes.len(), total);
    total
}

/// Seconds between first and last fix; 0 with fewer than two fixes
pub fn elapsed_time(fixes: &[GpsFix]) -> f64 {
    match (fixes.first(), fixes.last()) {
        (Some(first), Some(last)) if fixes.len() >= MIN_FIXES => {
            last.timestamp_ms.saturating_sub(first.timestamp_ms) as f64 / 1000.0
        }
        _ => 0.0,
    }
}

/// At least two fixes, all with coordinates on the globe
pub fn require_fixes(fixes: &[GpsFix]) -> AnalysisResult<()> {
    if fixes.len() < MIN_FIXES {
        return Err(AnalysisError::InsufficientSamples {
            required: MIN_FIXES,
            actual: fixes.len(),
        });
    }
    if let Some(fix) = fixes
        .iter()
        .find(|f| !((-90.0..=90.0).contains(&f.lat) && (-180.0..=180.0).contains(&f.lng)))
    {
        return Err(AnalysisError::InvalidMeasurement(format!(
            "fix at {} ms has coordinates out of range ({}, {})",
            fix.timestamp_ms, fix.lat, fix.lng
        )));
    }
    Ok(())
}

fn require_finite(distance_m: f64) -> AnalysisResult<()> {
    if !distance_m.is_finite() {
        return Err(AnalysisError::ImplausibleTrack(format!(
            "track distance is not a number ({})",
            distance_m
        )));
    }
    Ok(())
}

/// Reject a track deviating from `expected_m` by more than `tolerance`
/// (fraction of the course)
pub fn check_relative_deviation(distance_m: f64, expected_m: f64, tolerance: f64) -> AnalysisResult<()> {
    require_finite(distance_m)?;
    let deviation = (distance_m - expected_m).abs() / expected_m;
    if deviation > tolerance {
        return Err(AnalysisError::ImplausibleTrack(format!(
            "measured {:.1} m on a {:.0} m course ({:.0}% off, limit {:.0}%)",
            distance_m,
            expected_m,
            deviation * 100.0,
            tolerance * 100.0
        )));
    }
    Ok(())
}

/// Reject a track outside `expected_m ± band_m`
pub fn check_absolute_band(distance_m: f64, expected_m: f64, band_m: f64) -> AnalysisResult<()> {
    require_finite(distance_m)?;
    if (distance_m - expected_m).abs() > band_m {
        return Err(AnalysisError::ImplausibleTrack(format!(
            "measured {:.1} m, expected {:.0} ± {:.0} m",
            distance_m, expected_m, band_m
        )));
    }
    Ok(())
}

/// Accuracy score from the mean reported fix accuracy: 100 at 0 m, losing
/// five points per meter of uncertainty
pub fn track_accuracy(fixes: &[GpsFix]) -> f64 {
    if fixes.is_empty() {
        return 0.0;
    }
    let mean_error = fixes.iter().map(|f| f.accuracy_meters.max(0.0)).mean();
    (100.0 - mean_error * 5.0).clamp(0.0, 100.0)
}
