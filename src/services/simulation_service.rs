/// Upload-mode estimates
///
/// When a clip is uploaded without sensor data there is nothing to measure
/// for jumps and runs. These results are drawn from a plausible range,
/// marked low-confidence and flagged `simulated` so they are never mistaken
/// for measurements.

use rand::Rng;
use serde_json::json;
use tracing::warn;

use crate::errors::{AnalysisError, AnalysisResult};
use crate::models::{EnduranceCourse, ResultSource, TestResult, TestType};
use crate::services::geometry::round_to;
use crate::services::test_evaluator::{build_result, Measurement};

/// Accuracy ceiling for any simulated estimate
pub const SIMULATED_ACCURACY_CAP: f64 = 60.0;

/// Plausible range and rounding for one estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateRange {
    pub low: f64,
    pub high: f64,
    /// Rounding divisions, as for the measured result
    pub divisions: f64,
}

/// Range a test may be estimated from, `None` when it must be measured
pub fn estimate_range(test_type: &TestType, course: Option<EnduranceCourse>) -> Option<EstimateRange> {
    let (low, high, divisions) = match test_type {
        TestType::VerticalJump => (25.0, 55.0, 1.0),
        TestType::Sprint30m => (3.0, 4.5, 100.0),
        TestType::ShuttleRun => (9.5, 13.0, 10.0),
        TestType::EnduranceRun => match course.unwrap_or(EnduranceCourse::M1600) {
            EnduranceCourse::M800 => (2.5, 4.5, 100.0),
            EnduranceCourse::M1600 => (5.5, 10.0, 100.0),
        },
        _ => return None,
    };
    Some(EstimateRange {
        low,
        high,
        divisions,
    })
}

/// Draw a labelled estimate for a test that has an estimate range
pub fn simulate_estimate<R: Rng + ?Sized>(
    test_type: &TestType,
    course: Option<EnduranceCourse>,
    rng: &mut R,
) -> AnalysisResult<TestResult> {
    let range = estimate_range(test_type, course).ok_or_else(|| {
        AnalysisError::InputMismatch(format!("{} cannot be estimated from an upload", test_type))
    })?;

    let drawn = rng.gen_range(range.low..=range.high);
    let score = round_to(drawn, range.divisions);
    let accuracy = rng.gen_range(40.0..=SIMULATED_ACCURACY_CAP);

    warn!(
        "{} result is a simulated estimate ({} in {}..{})",
        test_type, score, range.low, range.high
    );

    let mut measurement = Measurement::new(
        score,
        accuracy,
        json!({
            "simulated": true,
            "range": [range.low, range.high],
        }),
    );
    if *test_type == TestType::EnduranceRun {
        let course = course.unwrap_or(EnduranceCourse::M1600);
        measurement.raw_data["course"] = json!(course);
        measurement = measurement.on_course(course);
    }

    Ok(build_result(
        test_type.clone(),
        measurement,
        ResultSource::SimulatedEstimate {
            low_confidence: true,
        },
    ))
}
