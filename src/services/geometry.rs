/// Geometry helpers shared by the vision analyzers
///
/// All inputs are pixel coordinates from a single frame. Conversions to
/// physical units go through a validated pixels-per-cm scale.

use crate::errors::{AnalysisError, AnalysisResult};
use crate::models::Point2D;

/// Reject scales that would make unit conversion meaningless
pub fn validate_scale(pixels_per_cm: f64) -> AnalysisResult<f64> {
    if pixels_per_cm.is_finite() && pixels_per_cm > 0.0 {
        Ok(pixels_per_cm)
    } else {
        Err(AnalysisError::InvalidScale(pixels_per_cm))
    }
}

/// Euclidean distance in pixels
pub fn pixel_distance(p1: Point2D, p2: Point2D) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

/// Convert a pixel length to centimeters
pub fn pixels_to_cm(pixels: f64, pixels_per_cm: f64) -> AnalysisResult<f64> {
    Ok(pixels / validate_scale(pixels_per_cm)?)
}

/// Distance between two points in centimeters
pub fn distance(p1: Point2D, p2: Point2D, pixels_per_cm: f64) -> AnalysisResult<f64> {
    pixels_to_cm(pixel_distance(p1, p2), pixels_per_cm)
}

/// Angle at `vertex` between the rays to `p1` and `p3`, in degrees [0, 180]
pub fn angle(p1: Point2D, vertex: Point2D, p3: Point2D) -> AnalysisResult<f64> {
    let (ax, ay) = (p1.x - vertex.x, p1.y - vertex.y);
    let (cx, cy) = (p3.x - vertex.x, p3.y - vertex.y);

    let mag_a = ax.hypot(ay);
    let mag_c = cx.hypot(cy);

    if mag_a == 0.0 || mag_c == 0.0 {
        return Err(AnalysisError::DegenerateGeometry(
            "cannot measure an angle with a zero-length ray".to_string(),
        ));
    }

    let cos_angle = (ax * cx + ay * cy) / (mag_a * mag_c);
    // Float error can push the ratio just past ±1
    Ok(cos_angle.clamp(-1.0, 1.0).acos().to_degrees())
}

/// Round to the nearest `1 / divisions` step, e.g. `divisions = 2.0` for 0.5
pub fn round_to(value: f64, divisions: f64) -> f64 {
    (value * divisions).round() / divisions
}
