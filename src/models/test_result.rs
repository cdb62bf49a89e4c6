use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fitness tests supported by the scoring pipeline
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestType {
    Height,
    Weight,
    SitAndReach,
    VerticalJump,
    BroadJump,
    MedicineBallThrow,
    Sprint30m,
    ShuttleRun,
    SitUps,
    EnduranceRun,
    Other(String),
}

impl TestType {
    /// The ten tests with evaluators
    pub fn all() -> [Self; 10] {
        [
            Self::Height,
            Self::Weight,
            Self::SitAndReach,
            Self::VerticalJump,
            Self::BroadJump,
            Self::MedicineBallThrow,
            Self::Sprint30m,
            Self::ShuttleRun,
            Self::SitUps,
            Self::EnduranceRun,
        ]
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Height => "height",
            Self::Weight => "weight",
            Self::SitAndReach => "sit_and_reach",
            Self::VerticalJump => "vertical_jump",
            Self::BroadJump => "broad_jump",
            Self::MedicineBallThrow => "medicine_ball_throw",
            Self::Sprint30m => "30m_sprint",
            Self::ShuttleRun => "shuttle_run",
            Self::SitUps => "sit_ups",
            Self::EnduranceRun => "endurance_run",
            Self::Other(s) => s,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Height => "Height",
            Self::Weight => "Weight",
            Self::SitAndReach => "Sit and Reach",
            Self::VerticalJump => "Vertical Jump",
            Self::BroadJump => "Standing Broad Jump",
            Self::MedicineBallThrow => "Medicine Ball Throw",
            Self::Sprint30m => "30m Sprint",
            Self::ShuttleRun => "Shuttle Run",
            Self::SitUps => "Sit-ups",
            Self::EnduranceRun => "Endurance Run",
            Self::Other(s) => s,
        }
    }

    /// Unit the raw score is reported in
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Height | Self::VerticalJump => "cm",
            Self::Weight => "kg",
            Self::SitAndReach => "inches",
            Self::BroadJump | Self::MedicineBallThrow => "meters",
            Self::Sprint30m | Self::ShuttleRun => "seconds",
            Self::SitUps => "reps",
            Self::EnduranceRun => "minutes",
            Self::Other(_) => "",
        }
    }

    /// Lower scores are better for timed tests
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Self::Sprint30m | Self::ShuttleRun | Self::EnduranceRun)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TestType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl From<String> for TestType {
    fn from(s: String) -> Self {
        Self::all()
            .into_iter()
            .find(|t| t.id() == s)
            .unwrap_or(Self::Other(s))
    }
}

impl From<TestType> for String {
    fn from(t: TestType) -> Self {
        t.id().to_string()
    }
}

/// Four-bucket performance rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Poor,
    Average,
    Good,
    Excellent,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Poor => write!(f, "Poor"),
            Rating::Average => write!(f, "Average"),
            Rating::Good => write!(f, "Good"),
            Rating::Excellent => write!(f, "Excellent"),
        }
    }
}

/// Where a score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultSource {
    /// Derived from sensor or vision measurements
    Measured,
    /// Randomized stand-in produced without sensor ground truth
    SimulatedEstimate { low_confidence: bool },
}

/// Outcome of one test attempt; immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: Uuid,
    pub test_type: TestType,
    pub score: f64,
    pub unit: String,
    /// Confidence in the score, 0-100
    pub accuracy: f64,
    pub timestamp: DateTime<Utc>,
    pub rating: Option<Rating>,
    pub source: ResultSource,
    /// Diagnostic payload from the analyzers
    pub raw_data: serde_json::Value,
    pub feedback: String,
}

impl TestResult {
    pub fn is_simulated(&self) -> bool {
        matches!(self.source, ResultSource::SimulatedEstimate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ids_round_trip() {
        for t in TestType::all() {
            let parsed: TestType = t.id().parse().unwrap();
            assert_eq!(parsed, t);
        }
    }

    #[test]
    fn test_unknown_id_becomes_other() {
        let parsed: TestType = "plank_hold".parse().unwrap();
        assert_eq!(parsed, TestType::Other("plank_hold".to_string()));
        assert!(!parsed.is_known());
    }

    #[test]
    fn test_type_serializes_as_plain_identifier() {
        let json = serde_json::to_string(&TestType::Sprint30m).unwrap();
        assert_eq!(json, "\"30m_sprint\"");
        let back: TestType = serde_json::from_str("\"sit_and_reach\"").unwrap();
        assert_eq!(back, TestType::SitAndReach);
    }

    #[test]
    fn test_rating_ordering() {
        assert!(Rating::Excellent > Rating::Good);
        assert!(Rating::Average > Rating::Poor);
    }
}
