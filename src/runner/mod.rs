pub mod cases;
pub mod events;
pub mod state;

use std::time::Instant;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::client::{ApiClient, ClientError};
use crate::utils::config::SuiteConfig;

pub use events::*;
pub use state::*;

/// Runs the conformance cases, in order, against one deployment
pub struct ConformanceRunner {
    config: SuiteConfig,
    client: ApiClient,
    emitter: EventEmitter,
    session_id: String,
    results: Vec<TestResult>,
}

impl ConformanceRunner {
    pub fn new(config: SuiteConfig) -> Result<Self, ClientError> {
        let client = ApiClient::new(&config.base_url, config.timeout)?;
        let (emitter, _) = EventEmitter::new();

        Ok(Self {
            config,
            client,
            emitter,
            session_id: Uuid::new_v4().to_string(),
            results: Vec::new(),
        })
    }

    /// Subscribe to suite events. The stream ends when `run` returns.
    pub fn subscribe(&self) -> broadcast::Receiver<TestEvent> {
        self.emitter.subscribe()
    }

    /// Run every planned case and collect the results.
    ///
    /// Never fails: transport errors are recorded as failed cases.
    pub async fn run(mut self) -> SuiteReport {
        let started = Instant::now();
        let started_at = chrono::Local::now().to_rfc3339();
        let plan = CaseId::plan(self.config.extended);

        log::info!(
            "Session {}: running {} cases against {}",
            self.session_id,
            plan.len(),
            self.config.base_url
        );
        self.emitter.emit(TestEvent::SuiteStarted {
            session_id: self.session_id.clone(),
            base_url: self.config.base_url.clone(),
            case_count: plan.len(),
        });

        // Written by the first case only, passed by reference to the cases that need it
        let mut submission_id: Option<SubmissionId> = None;

        for (index, case) in plan.into_iter().enumerate() {
            self.emitter.emit(TestEvent::CaseStarted {
                index,
                name: case.name().to_string(),
            });

            let case_started = Instant::now();
            let outcome = self.run_case(case, &mut submission_id).await;
            self.record(index, case, outcome, case_started);
        }

        let summary =
            SuiteSummary::from_results(&self.results, Some(started.elapsed().as_millis() as u64));
        let report = SuiteReport {
            session_id: self.session_id.clone(),
            base_url: self.config.base_url.clone(),
            started_at,
            results: std::mem::take(&mut self.results),
            summary,
        };

        log::info!(
            "Session {} finished: {} passed, {} failed",
            report.session_id,
            report.summary.passed,
            report.summary.failed
        );
        self.emitter.emit(TestEvent::SuiteFinished {
            report: report.clone(),
        });

        report
    }

    async fn run_case(
        &self,
        case: CaseId,
        submission_id: &mut Option<SubmissionId>,
    ) -> Result<Verdict, ClientError> {
        let client = &self.client;
        let admin_key = self.config.admin_key.as_str();

        match case {
            CaseId::CreateValidSubmission => {
                let (verdict, id) = cases::create_valid_submission(client).await?;
                *submission_id = id;
                Ok(verdict)
            }
            CaseId::GetPublicResults => {
                cases::get_public_results(client, submission_id.as_ref()).await
            }
            CaseId::AdminSubmissionsUnauthorized => {
                cases::admin_submissions_unauthorized(client).await
            }
            CaseId::AdminSubmissionsAuthorized => {
                cases::admin_submissions_authorized(client, admin_key).await
            }
            CaseId::AdminExport => cases::admin_export(client, admin_key).await,
            CaseId::ValidationMissingFields => cases::validation_missing_fields(client).await,
            CaseId::HoneypotProtection => {
                cases::honeypot_protection(client, self.config.honeypot_policy).await
            }
            CaseId::InvalidSubmissionId => cases::invalid_submission_id(client).await,
            CaseId::AdminSubmissionsInvalidKey => {
                cases::admin_submissions_invalid_key(client, admin_key).await
            }
            CaseId::AdminSubmissionsHeaderKey => {
                cases::admin_submissions_header_key(client, admin_key).await
            }
            CaseId::AdminSubmissionDetail => {
                cases::admin_submission_detail(client, admin_key, submission_id.as_ref()).await
            }
            CaseId::AdminExportUnauthorized => cases::admin_export_unauthorized(client).await,
        }
    }

    fn record(
        &mut self,
        index: usize,
        case: CaseId,
        outcome: Result<Verdict, ClientError>,
        started_at: Instant,
    ) {
        let verdict =
            outcome.unwrap_or_else(|e| Verdict::fail(format!("Request failed: {}", e)));
        let result = TestResult::new(case, verdict, started_at);

        if result.success {
            log::info!("{}: {} ({}ms)", result.test, result.message, result.duration_ms);
        } else {
            log::warn!("{}: {} ({}ms)", result.test, result.message, result.duration_ms);
        }

        self.emitter.emit(TestEvent::CaseFinished {
            index,
            result: result.clone(),
        });
        self.results.push(result);
    }
}
