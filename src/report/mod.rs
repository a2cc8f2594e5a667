pub mod console;
pub mod html;
pub mod json;
pub mod junit;
pub mod types;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::runner::state::SuiteReport;

/// File name of the machine-readable results inside the output directory
pub const RESULTS_FILE: &str = "test-results.json";

/// Generate report from a saved results file
pub fn generate_report(results_path: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let results = std::fs::read_to_string(results_path)
        .with_context(|| format!("Failed to read results: {}", results_path.display()))?;
    let test_results: types::TestResults = serde_json::from_str(&results)?;

    match format {
        "json" => json::generate(&test_results, output),
        "html" => html::generate(&test_results, output),
        "junit" => {
            let xml = junit::generate_junit_xml(&test_results)?;
            match output {
                Some(path) => {
                    std::fs::write(path, xml)?;
                    println!("JUnit report saved to: {}", path.display());
                }
                None => println!("{}", xml),
            }
            Ok(())
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}

/// Write JSON, HTML and JUnit reports for a finished run
pub fn write_reports(report: &SuiteReport, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output dir: {}", output_dir.display()))?;

    let test_results = types::TestResults::from(report);

    let json_path = output_dir.join(RESULTS_FILE);
    json::generate(&test_results, Some(&json_path))?;

    let html_path = output_dir.join("report.html");
    html::generate(&test_results, Some(&html_path))?;

    junit::write_report(&test_results, output_dir)?;

    println!(
        "\n{} Reports written to: {}",
        "📄".to_string().blue(),
        output_dir.display().to_string().cyan()
    );
    Ok(())
}
