use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::test_result::{TestResult, TestType};
use crate::services::score_aggregator;

/// Most recent result per test type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FitnessProfile {
    results: HashMap<TestType, TestResult>,
}

impl FitnessProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result unless a newer one for the same test is already held
    pub fn record(&mut self, result: TestResult) {
        match self.results.get(&result.test_type) {
            Some(existing) if existing.timestamp > result.timestamp => {}
            _ => {
                self.results.insert(result.test_type.clone(), result);
            }
        }
    }

    pub fn latest(&self, test_type: &TestType) -> Option<&TestResult> {
        self.results.get(test_type)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> impl Iterator<Item = &TestResult> {
        self.results.values()
    }

    /// Normalized 0-100 score per recorded test
    pub fn normalized_scores(&self) -> HashMap<TestType, f64> {
        self.results
            .iter()
            .map(|(t, r)| (t.clone(), score_aggregator::normalize(r)))
            .collect()
    }

    /// Weighted overall fitness score over whatever tests are recorded
    pub fn overall_score(&self) -> f64 {
        let results: Vec<&TestResult> = self.results.values().collect();
        score_aggregator::aggregate(results)
    }
}
