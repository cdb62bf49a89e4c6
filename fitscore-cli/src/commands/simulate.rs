use anyhow::{bail, Result};
use clap::Args;
use fitscore::models::{EnduranceCourse, TestType};
use fitscore::services::simulate_estimate;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

use super::evaluate::append_result;
use super::render::{print_json, print_result};
use super::Context;
use crate::config::OutputFormat;

#[derive(Args)]
pub struct SimulateCommand {
    /// Test identifier (vertical_jump, 30m_sprint, shuttle_run, endurance_run)
    test_type: String,

    /// Seed for a reproducible estimate
    #[arg(long)]
    seed: Option<u64>,

    /// Endurance course (800m or 1600m)
    #[arg(long)]
    course: Option<String>,

    /// Append the result to a JSON array file
    #[arg(long)]
    append: Option<PathBuf>,
}

fn parse_course(s: &str) -> Result<EnduranceCourse> {
    match s {
        "800m" | "800" => Ok(EnduranceCourse::M800),
        "1600m" | "1600" => Ok(EnduranceCourse::M1600),
        other => bail!("Unknown endurance course: {}", other),
    }
}

impl SimulateCommand {
    pub fn execute(&self, ctx: &Context) -> Result<()> {
        let test_type: TestType = self.test_type.parse()?;
        let course = self.course.as_deref().map(parse_course).transpose()?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let result = simulate_estimate(&test_type, course, &mut rng)?;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_course() {
        assert_eq!(parse_course("800m").unwrap(), EnduranceCourse::M800);
        assert_eq!(parse_course("1600").unwrap(), EnduranceCourse::M1600);
        assert!(parse_course("5k").is_err());
    }
}
