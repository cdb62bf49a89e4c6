use fitscore::models::{Point2D, Rating, ResultSource, TestResult, TestType};
use fitscore::services::{angle, distance, geometry::round_to, rate, score_aggregator};
use fitscore::AnalysisError;
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = f64> {
    -10_000.0..10_000.0f64
}

fn point() -> impl Strategy<Value = Point2D> {
    (coordinate(), coordinate()).prop_map(|(x, y)| Point2D::new(x, y))
}

fn known_test_type() -> impl Strategy<Value = TestType> {
    prop::sample::select(TestType::all().to_vec())
}

fn any_score() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1.0e6..1.0e6f64,
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(0.0),
    ]
}

fn result_with(test_type: TestType, score: f64) -> TestResult {
    TestResult {
        id: uuid::Uuid::new_v4(),
        unit: test_type.unit().to_string(),
        test_type,
        score,
        accuracy: 90.0,
        timestamp: chrono::Utc::now(),
        rating: None,
        source: ResultSource::Measured,
        raw_data: serde_json::Value::Null,
        feedback: String::new(),
    }
}

proptest! {
    #[test]
    fn distance_to_self_is_zero(p in point(), pixels_per_cm in 0.001..1000.0f64) {
        prop_assert_eq!(distance(p, p, pixels_per_cm).unwrap(), 0.0);
    }

    #[test]
    fn distance_rejects_non_positive_scale(p in point(), q in point(), pixels_per_cm in -1000.0..=0.0f64) {
        prop_assert!(matches!(
            distance(p, q, pixels_per_cm),
            Err(AnalysisError::InvalidScale(_))
        ));
    }

    #[test]
    fn angle_is_symmetric_and_bounded(p1 in point(), v in point(), p3 in point()) {
        prop_assume!(p1 != v && p3 != v);
        let forward = angle(p1, v, p3).unwrap();
        let backward = angle(p3, v, p1).unwrap();
        prop_assert_eq!(forward, backward);
        prop_assert!((0.0..=180.0).contains(&forward));
    }

    #[test]
    fn every_score_gets_exactly_one_bucket(test_type in known_test_type(), score in any_score()) {
        let rating = rate(&test_type, score, None);
        match test_type {
            TestType::Height | TestType::Weight => prop_assert_eq!(rating, None),
            _ => prop_assert!(matches!(
                rating,
                Some(Rating::Poor | Rating::Average | Rating::Good | Rating::Excellent)
            )),
        }
    }

    #[test]
    fn normalized_scores_stay_in_range(test_type in known_test_type(), score in -1.0e6..1.0e6f64) {
        let value = score_aggregator::normalize(&result_with(test_type, score));
        prop_assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn single_result_aggregates_to_itself(score in 0.0..120.0f64) {
        let result = result_with(TestType::VerticalJump, score);
        let v = score_aggregator::normalize(&result);
        prop_assert_eq!(score_aggregator::aggregate([&result]), v);
    }

    #[test]
    fn half_unit_rounding_lands_on_grid(value in 0.0..500.0f64) {
        let rounded = round_to(value, 2.0);
        prop_assert_eq!((rounded * 2.0).fract(), 0.0);
        prop_assert!((rounded - value).abs() <= 0.25 + 1e-9);
    }
}
