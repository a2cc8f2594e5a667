use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Test cases in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseId {
    CreateValidSubmission,
    GetPublicResults,
    AdminSubmissionsUnauthorized,
    AdminSubmissionsAuthorized,
    AdminExport,
    ValidationMissingFields,
    HoneypotProtection,
    InvalidSubmissionId,
    AdminSubmissionsInvalidKey,
    AdminSubmissionsHeaderKey,
    AdminSubmissionDetail,
    AdminExportUnauthorized,
}

impl CaseId {
    /// Always run, in this order
    pub const CORE: [CaseId; 8] = [
        CaseId::CreateValidSubmission,
        CaseId::GetPublicResults,
        CaseId::AdminSubmissionsUnauthorized,
        CaseId::AdminSubmissionsAuthorized,
        CaseId::AdminExport,
        CaseId::ValidationMissingFields,
        CaseId::HoneypotProtection,
        CaseId::InvalidSubmissionId,
    ];

    /// Run after the core cases with `--extended`
    pub const EXTENDED: [CaseId; 4] = [
        CaseId::AdminSubmissionsInvalidKey,
        CaseId::AdminSubmissionsHeaderKey,
        CaseId::AdminSubmissionDetail,
        CaseId::AdminExportUnauthorized,
    ];

    /// Display name used in results and reports
    pub fn name(self) -> &'static str {
        match self {
            CaseId::CreateValidSubmission => "Create Valid Submission",
            CaseId::GetPublicResults => "Get Public Results",
            CaseId::AdminSubmissionsUnauthorized => "Admin Submissions Unauthorized",
            CaseId::AdminSubmissionsAuthorized => "Admin Submissions Authorized",
            CaseId::AdminExport => "Admin CSV Export",
            CaseId::ValidationMissingFields => "Validation Missing Fields",
            CaseId::HoneypotProtection => "Honeypot Protection",
            CaseId::InvalidSubmissionId => "Invalid Submission ID",
            CaseId::AdminSubmissionsInvalidKey => "Admin Submissions Invalid Key",
            CaseId::AdminSubmissionsHeaderKey => "Admin Submissions Header Key",
            CaseId::AdminSubmissionDetail => "Admin Submission Detail",
            CaseId::AdminExportUnauthorized => "Admin Export Unauthorized",
        }
    }

    /// Cases selected for a run
    pub fn plan(extended: bool) -> Vec<CaseId> {
        let mut cases = CaseId::CORE.to_vec();
        if extended {
            cases.extend(CaseId::EXTENDED);
        }
        cases
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of the submission created by the first case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a case concluded, before it is stamped into a `TestResult`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub success: bool,
    pub message: String,
    pub details: Option<String>,
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            details: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Recorded outcome of one case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test: String,
    pub success: bool,
    pub message: String,
    pub details: Option<String>,
    pub timestamp: String,
    pub duration_ms: u64,
}

impl TestResult {
    pub fn new(case: CaseId, verdict: Verdict, started_at: Instant) -> Self {
        Self {
            test: case.name().to_string(),
            success: verdict.success,
            message: verdict.message,
            details: verdict.details,
            timestamp: chrono::Local::now().to_rfc3339(),
            duration_ms: started_at.elapsed().as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    /// Percentage of passed cases
    pub success_rate: f64,
    pub duration_ms: Option<u64>,
}

impl SuiteSummary {
    pub fn from_results(results: &[TestResult], duration_ms: Option<u64>) -> Self {
        let total = results.len() as u32;
        let passed = results.iter().filter(|r| r.success).count() as u32;
        let failed = total - passed;
        let success_rate = if total > 0 {
            passed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total,
            passed,
            failed,
            success_rate,
            duration_ms,
        }
    }

    /// Process exit code: 0 when nothing failed
    pub fn exit_code(&self) -> u8 {
        if self.failed == 0 {
            0
        } else {
            1
        }
    }
}

/// Everything one run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
    pub session_id: String,
    pub base_url: String,
    pub started_at: String,
    pub results: Vec<TestResult>,
    pub summary: SuiteSummary,
}

impl SuiteReport {
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn passes(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| r.success)
    }
}
