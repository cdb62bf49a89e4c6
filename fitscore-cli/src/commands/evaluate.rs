use anyhow::{Context as _, Result};
use clap::Args;
use fitscore::models::{CalibrationData, TestInputs, TestResult, TestType};
use fitscore::services::evaluate_with_config;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use super::render::{print_json, print_result};
use super::Context;
use crate::config::OutputFormat;

#[derive(Args)]
pub struct EvaluateCommand {
    /// Test identifier (e.g. height, vertical_jump, 30m_sprint)
    test_type: String,

    /// JSON file holding the test inputs
    #[arg(short, long)]
    inputs: PathBuf,

    /// JSON calibration written by `fitscore calibrate --save`
    #[arg(short, long)]
    calibration: Option<PathBuf>,

    /// Append the result to a JSON array file
    #[arg(long)]
    append: Option<PathBuf>,
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Add a result to the array stored at `path`, creating the file if needed
pub(crate) fn append_result(path: &Path, result: &TestResult) -> Result<()> {
    let mut results: Vec<TestResult> = if path.exists() {
        read_json(path)?
    } else {
        Vec::new()
    };
    results.push(result.clone());
    fs::write(path, serde_json::to_string_pretty(&results)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

impl EvaluateCommand {
    pub fn execute(&self, ctx: &Context) -> Result<()> {
        let test_type: TestType = self.test_type.parse()?;
        let inputs: TestInputs = read_json(&self.inputs)?;
        let calibration: CalibrationData = match &self.calibration {
            Some(path) => read_json(path)?,
            None => CalibrationData::default(),
        };

        let result = evaluate_with_config(test_type, inputs, &calibration, &ctx.config.scoring)?;

        if let Some(path) = &self.append {
            append_result(path, &result)?;
        }

        match ctx.format {
            OutputFormat::Json => print_json(&result)?,
            OutputFormat::Text => print_result(&result),
        }

        Ok(())
    }
}
