/// Reference-object calibration
///
/// Turns a recognized reference object and its detected pixel extent into a
/// pixels-per-centimeter scale for the session.

use tracing::{debug, warn};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::models::{CalibrationData, ReferenceDetection, ReferenceDimensions, ReferenceObjectKind};
use crate::services::geometry::validate_scale;

/// Scale returned for an unrecognized reference label
pub const IDENTITY_SCALE: f64 = 1.0;

/// Aspect mismatch beyond which a detection is reported as suspicious
const ASPECT_WARN_RATIO: f64 = 0.15;

/// Pixels per centimeter from a reference object's detected width.
///
/// Coins divide by their diameter, everything else by its physical width.
/// `pixel_height` only feeds a consistency check and never changes the scale.
pub fn calibrate(
    kind: ReferenceObjectKind,
    pixel_width: f64,
    pixel_height: Option<f64>,
) -> AnalysisResult<f64> {
    if !(pixel_width.is_finite() && pixel_width > 0.0) {
        return Err(AnalysisError::InvalidScale(pixel_width));
    }

    let (scale, expected_height_cm) = match kind.dimensions() {
        ReferenceDimensions::Circle { diameter_cm } => (pixel_width / diameter_cm, diameter_cm),
        ReferenceDimensions::Rectangle {
            width_cm,
            height_cm,
        } => (pixel_width / width_cm, height_cm),
    };

    if let Some(pixel_height) = pixel_height.filter(|h| h.is_finite() && *h > 0.0) {
        let implied = pixel_height / expected_height_cm;
        if (implied - scale).abs() / scale > ASPECT_WARN_RATIO {
            warn!(
                "Reference {} height implies {:.3} px/cm but width gives {:.3} px/cm",
                kind, implied, scale
            );
        }
    }

    debug!("Calibrated {} at {:.3} px/cm", kind, scale);
    validate_scale(scale)
}

/// Calibrate from a free-form reference label.
///
/// Unrecognized labels yield [`IDENTITY_SCALE`] so downstream math stays
/// defined even with a bad detection.
pub fn calibrate_label(label: &str, pixel_width: f64, pixel_height: Option<f64>) -> AnalysisResult<f64> {
    match label.parse::<ReferenceObjectKind>() {
        Ok(kind) => calibrate(kind, pixel_width, pixel_height),
        Err(_) => {
            warn!("Unrecognized reference object {:?}, using identity scale", label);
            Ok(IDENTITY_SCALE)
        }
    }
}

/// Session calibration from a vision-backend detection
pub fn calibrate_detection(detection: &ReferenceDetection) -> AnalysisResult<CalibrationData> {
    let scale = calibrate(
        detection.kind,
        detection.bounds.width,
        Some(detection.bounds.height),
    )?;
    Ok(CalibrationData::from_reference(detection.kind, scale))
}

/// Scale an evaluator should use, and whether it came from the fallback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedScale {
    pub pixels_per_cm: f64,
    pub is_fallback: bool,
}

/// Session scale, or `default_pixels_per_cm` when none was recorded
pub fn resolve_scale(
    calibration: &CalibrationData,
    default_pixels_per_cm: f64,
) -> AnalysisResult<ResolvedScale> {
    match calibration.pixels_per_cm {
        Some(scale) => Ok(ResolvedScale {
            pixels_per_cm: validate_scale(scale)?,
            is_fallback: false,
        }),
        None => {
            warn!(
                "No pixels-per-cm in calibration, falling back to {} px/cm",
                default_pixels_per_cm
            );
            Ok(ResolvedScale {
                pixels_per_cm: validate_scale(default_pixels_per_cm)?,
                is_fallback: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PixelBounds;
    use assert_matches::assert_matches;

    #[test]
    fn test_credit_card_width() {
        let scale = calibrate(ReferenceObjectKind::CreditCard, 85.6, None).unwrap();
        assert!((scale - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_coin_uses_diameter() {
        let scale = calibrate(ReferenceObjectKind::CoinQuarter, 24.26, None).unwrap();
        assert!((scale - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_height_does_not_change_scale() {
        let without = calibrate(ReferenceObjectKind::A4Paper, 420.0, None).unwrap();
        let with = calibrate(ReferenceObjectKind::A4Paper, 420.0, Some(100.0)).unwrap();
        assert_eq!(without, with);
    }

    #[test]
    fn test_unknown_label_is_identity() {
        assert_eq!(calibrate_label("banana", 120.0, None).unwrap(), IDENTITY_SCALE);
        let scale = calibrate_label("credit_card", 85.6, None).unwrap();
        assert!((scale - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_width_is_invalid() {
        assert_matches!(
            calibrate(ReferenceObjectKind::Smartphone, 0.0, None),
            Err(AnalysisError::InvalidScale(_))
        );
    }

    #[test]
    fn test_detection_produces_session_calibration() {
        let detection = ReferenceDetection {
            kind: ReferenceObjectKind::CreditCard,
            bounds: PixelBounds {
                x: 10.0,
                y: 10.0,
                width: 171.2,
                height: 107.96,
            },
        };
        let calibration = calibrate_detection(&detection).unwrap();
        assert!(calibration.is_calibrated());
        assert!((calibration.pixels_per_cm.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_scale_fallback() {
        let resolved = resolve_scale(&CalibrationData::default(), 5.0).unwrap();
        assert_eq!(resolved.pixels_per_cm, 5.0);
        assert!(resolved.is_fallback);

        let bad = CalibrationData {
            pixels_per_cm: Some(-1.0),
            ..Default::default()
        };
        assert_matches!(resolve_scale(&bad, 5.0), Err(AnalysisError::InvalidScale(_)));
    }
}
