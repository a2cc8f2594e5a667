use crate::runner::state::{SuiteReport, SuiteSummary, TestResult};
use serde::{Deserialize, Serialize};

/// Test results for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    pub session_id: String,
    pub base_url: String,
    pub results: Vec<TestResult>,
    pub summary: SuiteSummary,
    pub generated_at: String,
}

impl From<&SuiteReport> for TestResults {
    fn from(report: &SuiteReport) -> Self {
        Self {
            session_id: report.session_id.clone(),
            base_url: report.base_url.clone(),
            results: report.results.clone(),
            summary: report.summary.clone(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
