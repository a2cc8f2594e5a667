//! Runs the whole suite against an in-process stub of the submission API.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use benefits_api_tester::report;
use benefits_api_tester::runner::{CaseId, ConformanceRunner, SuiteReport};
use benefits_api_tester::schema::SubmissionForm;
use benefits_api_tester::utils::config::{HoneypotPolicy, SuiteConfig};

const ADMIN_KEY: &str = "test-admin-key";

/// What the service matches for a low-income, uninsured veteran over 65 who rents
const SENIOR_VETERAN_BENEFITS: &[&str] = &[
    "snap",
    "medicaid",
    "medicare_savings",
    "liheap",
    "va_benefits",
    "housing_assistance",
    "ssi",
];

/// Same, for an insured, employed renter aged 25-34 earning 2000-3000
const YOUNG_RENTER_BENEFITS: &[&str] = &["snap", "medicaid", "liheap", "housing_assistance"];

const REQUIRED_FIELDS: &[&str] = &[
    "age_range",
    "zip_code",
    "household_size",
    "monthly_income_range",
    "employment_status",
    "veteran",
    "disability",
    "student",
    "pregnant_or_children",
    "housing_status",
    "has_health_insurance",
];

#[derive(Clone)]
struct Stub {
    store: Arc<Mutex<Vec<Value>>>,
    /// Public results echo contact fields
    leak_pii: bool,
    /// Honeypot submissions get the `blocked` sentinel
    honeypot_blocks: bool,
    /// Benefit tag left out of every match
    omit_benefit: Option<&'static str>,
    /// Delay before the export answers
    export_delay: Option<Duration>,
}

impl Default for Stub {
    fn default() -> Self {
        Self {
            store: Arc::default(),
            leak_pii: false,
            honeypot_blocks: true,
            omit_benefit: None,
            export_delay: None,
        }
    }
}

fn router(stub: Stub) -> Router {
    Router::new()
        .route("/api/submissions", post(create_submission))
        .route("/api/public-results/:id", get(public_results))
        .route("/api/admin/submissions", get(admin_submissions))
        .route("/api/admin/submissions/:id", get(admin_submission))
        .route("/api/admin/export", get(admin_export))
        .with_state(stub)
}

async fn create_submission(State(stub): State<Stub>, Json(data): Json<Value>) -> Response {
    let website = data.get("website").and_then(Value::as_str).unwrap_or("");
    if !website.is_empty() && stub.honeypot_blocks {
        return Json(json!({"id": "blocked", "matched_benefits": []})).into_response();
    }

    if serde_json::from_value::<SubmissionForm>(data.clone()).is_err() {
        let details: Vec<Value> = REQUIRED_FIELDS
            .iter()
            .filter(|f| data.get(**f).is_none())
            .map(|f| json!({"path": [f], "message": "Required"}))
            .collect();
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Validation failed", "details": details})),
        )
            .into_response();
    }

    let id = uuid::Uuid::new_v4().to_string();
    let tags = if data["age_range"] == "65_plus" {
        SENIOR_VETERAN_BENEFITS
    } else {
        YOUNG_RENTER_BENEFITS
    };
    let matched: Vec<&str> = tags
        .iter()
        .copied()
        .filter(|t| Some(*t) != stub.omit_benefit)
        .collect();

    let mut record = data;
    record["id"] = json!(id);
    record["matched_benefits"] = json!(matched);
    record["created_at"] = json!("2026-01-01T00:00:00.000Z");
    record["status"] = json!("new");
    stub.store.lock().unwrap().push(record);

    Json(json!({"id": id, "matched_benefits": matched})).into_response()
}

fn find(stub: &Stub, id: &str) -> Option<Value> {
    stub.store
        .lock()
        .unwrap()
        .iter()
        .find(|r| r["id"] == id)
        .cloned()
}

async fn public_results(State(stub): State<Stub>, Path(id): Path<String>) -> Response {
    let Some(record) = find(&stub, &id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Results not found"})),
        )
            .into_response();
    };

    let benefits: Vec<Value> = record["matched_benefits"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|tag| json!({"id": tag, "name": tag}))
        .collect();

    let mut body = json!({
        "id": record["id"],
        "age_range": record["age_range"],
        "zip_code": record["zip_code"],
        "household_size": record["household_size"],
        "matched_benefits": benefits,
        "created_at": record["created_at"],
    });
    if stub.leak_pii {
        body["full_name"] = record["full_name"].clone();
        body["email"] = record["email"].clone();
    }
    Json(body).into_response()
}

fn authorized(headers: &HeaderMap, query: &HashMap<String, String>) -> bool {
    let header_key = headers.get("x-admin-key").and_then(|v| v.to_str().ok());
    header_key == Some(ADMIN_KEY) || query.get("adminKey").map(String::as_str) == Some(ADMIN_KEY)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response()
}

async fn admin_submissions(
    State(stub): State<Stub>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers, &query) {
        return unauthorized();
    }
    let submissions = stub.store.lock().unwrap().clone();
    let total = submissions.len();
    Json(json!({
        "submissions": submissions,
        "pagination": {"page": 1, "limit": 50, "total": total, "pages": 1}
    }))
    .into_response()
}

async fn admin_submission(
    State(stub): State<Stub>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers, &query) {
        return unauthorized();
    }
    match find(&stub, &id) {
        Some(submission) => Json(json!({"submission": submission})).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))).into_response(),
    }
}

async fn admin_export(
    State(stub): State<Stub>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Some(delay) = stub.export_delay {
        tokio::time::sleep(delay).await;
    }
    if !authorized(&headers, &query) {
        return unauthorized();
    }

    let mut csv = String::from("ID,Created At,Full Name,Matched Benefits");
    for record in stub.store.lock().unwrap().iter() {
        let benefits: Vec<String> = record["matched_benefits"]
            .as_array()
            .map(|a| a.iter().filter_map(|b| b.as_str().map(String::from)).collect())
            .unwrap_or_default();
        csv.push_str(&format!(
            "\n{},{},\"{}\",{}",
            record["id"].as_str().unwrap_or(""),
            record["created_at"].as_str().unwrap_or(""),
            record["full_name"].as_str().unwrap_or(""),
            benefits.join("; ")
        ));
    }

    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"submissions.csv\"",
            ),
        ],
        csv,
    )
        .into_response()
}

async fn spawn_stub(stub: Stub) -> String {
    // Local requests must not go through an ambient proxy
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(stub)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config(base_url: &str) -> SuiteConfig {
    SuiteConfig {
        timeout: Duration::from_secs(5),
        ..SuiteConfig::new(base_url, ADMIN_KEY)
    }
}

fn closed_port_url() -> String {
    // Reserve a port, then free it so nothing listens there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    format!("http://{}", addr)
}

async fn run(config: SuiteConfig) -> SuiteReport {
    ConformanceRunner::new(config)
        .expect("Failed to build runner")
        .run()
        .await
}

fn failed_names(report: &SuiteReport) -> Vec<&str> {
    report.failures().map(|r| r.test.as_str()).collect()
}

#[tokio::test]
async fn test_conforming_service_passes_everything() {
    let base_url = spawn_stub(Stub::default()).await;
    let report = run(SuiteConfig {
        extended: true,
        ..config(&base_url)
    })
    .await;

    assert!(failed_names(&report).is_empty(), "{:#?}", report.results);
    assert_eq!(report.summary.total, 12);
    assert_eq!(report.summary.exit_code(), 0);

    let names: Vec<&str> = report.results.iter().map(|r| r.test.as_str()).collect();
    let expected: Vec<&str> = CaseId::plan(true).iter().map(|c| c.name()).collect();
    assert_eq!(names, expected);

    let created = &report.results[0];
    assert!(created.message.starts_with("Submission created successfully with ID: "));
    assert!(created.details.as_deref().unwrap().contains("Match: true"));
}

#[tokio::test]
async fn test_pii_leak_fails_only_public_results() {
    let base_url = spawn_stub(Stub {
        leak_pii: true,
        ..Stub::default()
    })
    .await;
    let report = run(config(&base_url)).await;

    assert_eq!(report.results.len(), 8);
    assert_eq!(failed_names(&report), vec!["Get Public Results"]);
    assert_eq!(report.results[1].message, "Response contains PII data");
    assert_eq!(report.summary.exit_code(), 1);
}

#[tokio::test]
async fn test_honeypot_policy_decides_unblocked_submissions() {
    let stub = Stub {
        honeypot_blocks: false,
        ..Stub::default()
    };
    let base_url = spawn_stub(stub).await;

    let strict = run(config(&base_url)).await;
    assert_eq!(failed_names(&strict), vec!["Honeypot Protection"]);

    let lenient = run(SuiteConfig {
        honeypot_policy: HoneypotPolicy::Lenient,
        ..config(&base_url)
    })
    .await;
    assert!(failed_names(&lenient).is_empty());
    assert_eq!(
        lenient.results[6].message,
        "Honeypot accepted submission (may not be saved)"
    );
}

#[tokio::test]
async fn test_unreachable_service_fails_every_case_without_panicking() {
    let report = run(SuiteConfig {
        extended: true,
        ..config(&closed_port_url())
    })
    .await;

    assert_eq!(report.summary.total, 12);
    assert_eq!(report.summary.failed, 12);
    assert_eq!(report.summary.exit_code(), 1);

    for result in &report.results {
        match result.test.as_str() {
            "Get Public Results" | "Admin Submission Detail" => assert_eq!(
                result.message,
                "No submission ID available from previous test"
            ),
            _ => assert!(
                result.message.starts_with("Request failed: "),
                "{}: {}",
                result.test,
                result.message
            ),
        }
    }
}

#[tokio::test]
async fn test_outcomes_are_stable_across_runs() {
    let base_url = spawn_stub(Stub::default()).await;

    let first = run(config(&base_url)).await;
    let second = run(config(&base_url)).await;

    let outcomes = |r: &SuiteReport| -> Vec<(String, bool)> {
        r.results
            .iter()
            .map(|t| (t.test.clone(), t.success))
            .collect()
    };
    assert_eq!(outcomes(&first), outcomes(&second));
    assert_ne!(first.session_id, second.session_id);
}

#[tokio::test]
async fn test_benefit_mismatch_is_reported_without_failing() {
    let base_url = spawn_stub(Stub {
        omit_benefit: Some("va_benefits"),
        ..Stub::default()
    })
    .await;
    let report = run(config(&base_url)).await;

    let created = &report.results[0];
    assert!(created.success);
    let details = created.details.as_deref().unwrap();
    assert!(details.contains("Match: false"), "{}", details);
}

#[tokio::test]
async fn test_timeout_fails_one_case_and_the_rest_still_run() {
    let base_url = spawn_stub(Stub {
        export_delay: Some(Duration::from_secs(3)),
        ..Stub::default()
    })
    .await;
    let report = run(SuiteConfig {
        timeout: Duration::from_secs(1),
        ..config(&base_url)
    })
    .await;

    assert_eq!(report.results.len(), 8);
    assert_eq!(failed_names(&report), vec!["Admin CSV Export"]);
    assert_eq!(
        report.results[4].message,
        format!("Request failed: request to {}/api/admin/export timed out", base_url)
    );

    let after: Vec<&str> = report.results[5..].iter().map(|r| r.test.as_str()).collect();
    let expected: Vec<&str> = CaseId::CORE[5..].iter().map(|c| c.name()).collect();
    assert_eq!(after, expected);
}

#[tokio::test]
async fn test_admin_key_stays_out_of_results_and_reports() {
    let report = run(SuiteConfig {
        extended: true,
        ..config(&closed_port_url())
    })
    .await;

    for result in &report.results {
        assert!(
            !result.message.contains(ADMIN_KEY),
            "{}: {}",
            result.test,
            result.message
        );
        assert!(!result
            .details
            .as_deref()
            .unwrap_or("")
            .contains(ADMIN_KEY));
    }
    assert!(!serde_json::to_string(&report).unwrap().contains(ADMIN_KEY));

    let dir = std::env::temp_dir().join(format!("benefits-api-tester-{}", report.session_id));
    report::write_reports(&report, &dir).unwrap();
    for file in ["test-results.json", "report.html", "junit.xml"] {
        let written = std::fs::read_to_string(dir.join(file)).unwrap();
        assert!(!written.contains(ADMIN_KEY), "key written to {}", file);
    }
    std::fs::remove_dir_all(&dir).unwrap();
}
