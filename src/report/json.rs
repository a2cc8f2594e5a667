use super::types::TestResults;
use anyhow::{Context, Result};
use std::path::Path;

/// Pretty-printed results document, as read back by `generate_report`
pub fn render(results: &TestResults) -> Result<String> {
    serde_json::to_string_pretty(results).context("Failed to serialize test results")
}

/// Write the results document to `output`, or print it when no path is given
pub fn generate(results: &TestResults, output: Option<&Path>) -> Result<()> {
    let json = render(results)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("    Generated JSON results: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::{SuiteSummary, TestResult};

    #[test]
    fn test_render_uses_camel_case_and_reads_back() {
        let results = vec![TestResult {
            test: "Invalid Submission ID".to_string(),
            success: true,
            message: "Correctly returned 404 for invalid ID".to_string(),
            details: Some("Error: Results not found".to_string()),
            timestamp: "2026-01-01T12:00:00+00:00".to_string(),
            duration_ms: 42,
        }];
        let results = TestResults {
            session_id: "s-1".to_string(),
            base_url: "http://localhost:3000".to_string(),
            summary: SuiteSummary::from_results(&results, Some(42)),
            results,
            generated_at: "2026-01-01 12:00:01".to_string(),
        };

        let json = render(&results).unwrap();
        assert!(json.contains("\"sessionId\": \"s-1\""));
        assert!(json.contains("\"durationMs\": 42"));

        let back: TestResults = serde_json::from_str(&json).unwrap();
        assert_eq!(back.results.len(), 1);
        assert_eq!(back.summary.passed, 1);
    }
}
