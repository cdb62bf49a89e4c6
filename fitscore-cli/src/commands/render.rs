use anyhow::Result;
use colored::{ColoredString, Colorize};
use fitscore::{Rating, TestResult};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn rating_label(rating: Option<Rating>) -> ColoredString {
    match rating {
        Some(Rating::Excellent) => "Excellent".green().bold(),
        Some(Rating::Good) => "Good".green(),
        Some(Rating::Average) => "Average".yellow(),
        Some(Rating::Poor) => "Poor".red(),
        None => "n/a".dimmed(),
    }
}

pub fn print_result(result: &TestResult) {
    println!("{}", result.test_type.display_name().bold());
    println!("────────────────────────────────");
    println!("  Score:    {} {}", result.score, result.unit);
    println!("  Rating:   {}", rating_label(result.rating));
    println!("  Accuracy: {:.0}%", result.accuracy);
    if result.is_simulated() {
        println!("  Source:   {}", "simulated estimate (low confidence)".yellow());
    }
    println!();
    println!("{}", result.feedback);
}
