use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::geometry::PixelBounds;

/// Physical reference objects the calibrator recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceObjectKind {
    CreditCard,
    CoinQuarter,
    CoinPenny,
    Smartphone,
    A4Paper,
}

/// Known physical size of a reference object, in centimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceDimensions {
    Rectangle { width_cm: f64, height_cm: f64 },
    Circle { diameter_cm: f64 },
}

impl ReferenceObjectKind {
    pub fn all() -> [Self; 5] {
        [
            Self::CreditCard,
            Self::CoinQuarter,
            Self::CoinPenny,
            Self::Smartphone,
            Self::A4Paper,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::CoinQuarter => "coin_quarter",
            Self::CoinPenny => "coin_penny",
            Self::Smartphone => "smartphone",
            Self::A4Paper => "a4_paper",
        }
    }

    /// ISO/IEC 7810 ID-1 for cards, US Mint specs for coins, ISO 216 for A4.
    /// The smartphone entry is a typical 6.1" handset.
    pub fn dimensions(&self) -> ReferenceDimensions {
        match self {
            Self::CreditCard => ReferenceDimensions::Rectangle {
                width_cm: 8.56,
                height_cm: 5.398,
            },
            Self::CoinQuarter => ReferenceDimensions::Circle { diameter_cm: 2.426 },
            Self::CoinPenny => ReferenceDimensions::Circle { diameter_cm: 1.905 },
            Self::Smartphone => ReferenceDimensions::Rectangle {
                width_cm: 7.15,
                height_cm: 14.67,
            },
            Self::A4Paper => ReferenceDimensions::Rectangle {
                width_cm: 21.0,
                height_cm: 29.7,
            },
        }
    }
}

impl fmt::Display for ReferenceObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReferenceObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| format!("unrecognized reference object: {}", s))
    }
}

/// A reference object found in a frame by the vision backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDetection {
    pub kind: ReferenceObjectKind,
    pub bounds: PixelBounds,
}

/// Per-session calibration, read-only for evaluators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationData {
    #[serde(default)]
    pub reference_object: Option<ReferenceObjectKind>,
    #[serde(default)]
    pub pixels_per_cm: Option<f64>,
    #[serde(default)]
    pub camera_height_m: Option<f64>,
}

impl CalibrationData {
    pub fn from_reference(kind: ReferenceObjectKind, pixels_per_cm: f64) -> Self {
        Self {
            reference_object: Some(kind),
            pixels_per_cm: Some(pixels_per_cm),
            camera_height_m: None,
        }
    }

    /// True when a reference object was detected and produced a scale
    pub fn is_calibrated(&self) -> bool {
        self.reference_object.is_some() && self.pixels_per_cm.is_some()
    }
}
