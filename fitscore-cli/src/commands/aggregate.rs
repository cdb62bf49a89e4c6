use anyhow::Result;
use clap::Args;
use colored::Colorize;
use fitscore::models::{FitnessProfile, TestResult};
use fitscore::services::score_aggregator;
use serde::Serialize;
use std::path::PathBuf;

use super::evaluate::read_json;
use super::render::{print_json, rating_label};
use super::Context;
use crate::config::OutputFormat;

#[derive(Args)]
pub struct AggregateCommand {
    /// JSON array of results, e.g. built with `evaluate --append`
    results: PathBuf,
}

#[derive(Serialize)]
struct TestSummary {
    test_type: String,
    score: f64,
    unit: String,
    normalized: f64,
    weight: f64,
    simulated: bool,
}

#[derive(Serialize)]
struct AggregateReport {
    tests: Vec<TestSummary>,
    overall: f64,
}

impl AggregateCommand {
    pub fn execute(&self, ctx: &Context) -> Result<()> {
        let results: Vec<TestResult> = read_json(&self.results)?;

        // Retakes replace earlier attempts at the same test
        let mut profile = FitnessProfile::new();
        for result in results {
            profile.record(result);
        }

        let mut latest: Vec<&TestResult> = profile.results().collect();
        latest.sort_by_key(|r| r.test_type.id().to_string());

        let report = AggregateReport {
            tests: latest
                .iter()
                .map(|r| TestSummary {
                    test_type: r.test_type.id().to_string(),
                    score: r.score,
                    unit: r.unit.clone(),
                    normalized: score_aggregator::normalize(r),
                    weight: score_aggregator::weight(&r.test_type),
                    simulated: r.is_simulated(),
                })
                .collect(),
            overall: profile.overall_score(),
        };

        match ctx.format {
            OutputFormat::Json => print_json(&report)?,
            OutputFormat::Text => {
                println!("{}", "Fitness Profile".bold());
                println!("────────────────────────────────");
                for (summary, result) in report.tests.iter().zip(&latest) {
                    let marker = if summary.simulated { " *" } else { "" };
                    println!(
                        "  {:<22} {:>8} {:<8} {:>6.1}/100  {}{}",
                        result.test_type.display_name(),
                        summary.score,
                        summary.unit,
                        summary.normalized,
                        rating_label(result.rating),
                        marker
                    );
                }
                println!();
                println!("Overall score: {}", format!("{:.1}", report.overall).bold());
                if report.tests.iter().any(|t| t.simulated) {
                    println!("{}", "* simulated estimate, not a measurement".yellow());
                }
            }
        }

        Ok(())
    }
}
