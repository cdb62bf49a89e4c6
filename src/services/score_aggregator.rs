/// Score Normalizer & Aggregator
///
/// Maps each test's raw score onto 0-100 and combines results into one
/// weighted fitness score. Never fails: unmapped tests normalize to a
/// neutral 50 and an empty set aggregates to 0.

use tracing::{debug, warn};

use crate::models::{TestResult, TestType};

/// Neutral score for tests without a normalization curve
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Weight for tests missing from the weight table
pub const DEFAULT_WEIGHT: f64 = 0.10;

/// Linear 0-100 curve for a test's raw score, `None` when the test has none
pub fn normalize_score(test_type: &TestType, score: f64) -> Option<f64> {
    let value = match test_type {
        TestType::SitAndReach => score / 12.0 * 100.0,
        TestType::VerticalJump => score / 60.0 * 100.0,
        TestType::BroadJump => score / 3.0 * 100.0,
        TestType::MedicineBallThrow => score / 10.0 * 100.0,
        TestType::Sprint30m => 100.0 - (score - 2.5) / 2.0 * 100.0,
        TestType::ShuttleRun => 100.0 - (score - 9.0) / 5.0 * 100.0,
        TestType::SitUps => score / 60.0 * 100.0,
        TestType::EnduranceRun => 100.0 - (score - 4.0) / 8.0 * 100.0,
        TestType::Height | TestType::Weight | TestType::Other(_) => return None,
    };
    Some(value.clamp(0.0, 100.0))
}

/// Result on the common 0-100 scale
pub fn normalize(result: &TestResult) -> f64 {
    normalize_score(&result.test_type, result.score).unwrap_or_else(|| {
        debug!("No normalization curve for {}, using neutral score", result.test_type);
        NEUTRAL_SCORE
    })
}

/// Contribution of a test to the overall score
pub fn weight(test_type: &TestType) -> f64 {
    match test_type {
        TestType::Height => 0.05,
        TestType::Weight => 0.05,
        TestType::SitAndReach => 0.10,
        TestType::VerticalJump => 0.15,
        TestType::BroadJump => 0.15,
        TestType::MedicineBallThrow => 0.10,
        TestType::Sprint30m => 0.15,
        TestType::ShuttleRun => 0.10,
        TestType::SitUps => 0.10,
        TestType::EnduranceRun => 0.15,
        TestType::Other(_) => DEFAULT_WEIGHT,
    }
}

/// Weighted mean of normalized scores over the tests present.
///
/// Weights are rescaled by the weight actually present, so a partial set
/// still yields 0-100 and a single result returns its own normalized value.
pub fn aggregate<'a, I>(results: I) -> f64
where
    I: IntoIterator<Item = &'a TestResult>,
{
    let scored: Vec<(f64, f64)> = results
        .into_iter()
        .map(|r| (weight(&r.test_type), normalize(r)))
        .collect();

    let total_weight: f64 = scored.iter().map(|(w, _)| w).sum();
    if scored.is_empty() || total_weight <= 0.0 {
        return 0.0;
    }

    let overall: f64 = scored
        .iter()
        .map(|(w, v)| (w / total_weight) * v)
        .sum();
    overall.clamp(0.0, 100.0)
}

/// Aggregate a result set, logging simulated entries
pub fn normalize_and_aggregate(results: &[TestResult]) -> f64 {
    let simulated = results.iter().filter(|r| r.is_simulated()).count();
    if simulated > 0 {
        warn!(
            "{} of {} results are simulated estimates",
            simulated,
            results.len()
        );
    }
    let overall = aggregate(results);
    debug!("Overall score {:.2} from {} results", overall, results.len());
    overall
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResultSource;
    use chrono::Utc;
    use uuid::Uuid;

    fn result(test_type: TestType, score: f64) -> TestResult {
        TestResult {
            id: Uuid::new_v4(),
            unit: test_type.unit().to_string(),
            test_type,
            score,
            accuracy: 90.0,
            timestamp: Utc::now(),
            rating: None,
            source: ResultSource::Measured,
            raw_data: serde_json::Value::Null,
            feedback: String::new(),
        }
    }

    #[test]
    fn test_documented_curves() {
        assert!((normalize(&result(TestType::VerticalJump, 45.0)) - 75.0).abs() < 1e-9);
        assert!((normalize(&result(TestType::Sprint30m, 3.5)) - 50.0).abs() < 1e-9);
        assert!((normalize(&result(TestType::EnduranceRun, 8.0)) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalization_clamps() {
        assert_eq!(normalize(&result(TestType::VerticalJump, 90.0)), 100.0);
        assert_eq!(normalize(&result(TestType::Sprint30m, 10.0)), 0.0);
    }

    #[test]
    fn test_unmapped_tests_are_neutral() {
        assert_eq!(normalize(&result(TestType::Height, 172.0)), NEUTRAL_SCORE);
        assert_eq!(
            normalize(&result(TestType::Other("plank".to_string()), 120.0)),
            NEUTRAL_SCORE
        );
        assert_eq!(weight(&TestType::Other("plank".to_string())), DEFAULT_WEIGHT);
    }

    #[test]
    fn test_empty_set_is_zero() {
        assert_eq!(normalize_and_aggregate(&[]), 0.0);
    }

    #[test]
    fn test_weighted_mean() {
        // vertical jump 60 cm → 100 (w 0.15), sit-ups 30 → 50 (w 0.10)
        let results = vec![
            result(TestType::VerticalJump, 60.0),
            result(TestType::SitUps, 30.0),
        ];
        let overall = normalize_and_aggregate(&results);
        assert!((overall - 80.0).abs() < 1e-9);
    }
}
