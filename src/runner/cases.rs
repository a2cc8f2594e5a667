//! Test cases
//!
//! Each case is an async function that performs its requests and hands the
//! response to a pure `judge_*` function. Transport errors are returned to the
//! runner, which records them; contract violations become failed verdicts here.

use reqwest::StatusCode;
use serde_json::Value;

use super::state::{SubmissionId, Verdict};
use crate::benefits::BenefitCheck;
use crate::client::{AdminAuth, ApiClient, ApiResponse, ClientError};
use crate::schema::responses::{
    AdminDetail, AdminListing, CreatedSubmission, ErrorBody, PublicResults, ValidationFailure,
    ADMIN_DETAIL, ADMIN_LISTING, CREATED_SUBMISSION, ERROR_BODY, PII_FIELDS, PUBLIC_RESULTS,
    VALIDATION_FAILURE,
};
use crate::schema::{Contact, ContactOnlyForm, SubmissionForm};
use crate::utils::config::HoneypotPolicy;

/// Syntactically invalid id used for the not-found check
pub const INVALID_SUBMISSION_ID: &str = "invalid-id-12345";

/// Sentinel id the service answers with when the honeypot trips
pub const BLOCKED_ID: &str = "blocked";

const MISSING_ID_MESSAGE: &str = "No submission ID available from previous test";

const BODY_EXCERPT_CHARS: usize = 500;

// ============================================================================
// Requests
// ============================================================================

pub async fn create_valid_submission(
    client: &ApiClient,
) -> Result<(Verdict, Option<SubmissionId>), ClientError> {
    let form = SubmissionForm::senior_veteran(Contact::fake());
    let res = client.create_submission(&form).await?;
    Ok(judge_created_submission(&form, &res))
}

pub async fn get_public_results(
    client: &ApiClient,
    id: Option<&SubmissionId>,
) -> Result<Verdict, ClientError> {
    let Some(id) = id else {
        return Ok(Verdict::fail(MISSING_ID_MESSAGE));
    };
    let res = client.public_results(id.as_str()).await?;
    Ok(judge_public_results(id, &res))
}

pub async fn admin_submissions_unauthorized(client: &ApiClient) -> Result<Verdict, ClientError> {
    let res = client.admin_submissions(AdminAuth::None).await?;
    Ok(judge_rejected(&res))
}

pub async fn admin_submissions_authorized(
    client: &ApiClient,
    admin_key: &str,
) -> Result<Verdict, ClientError> {
    let res = client
        .admin_submissions(AdminAuth::QueryKey(admin_key))
        .await?;
    Ok(judge_admin_listing(&res))
}

pub async fn admin_export(client: &ApiClient, admin_key: &str) -> Result<Verdict, ClientError> {
    let res = client.admin_export(AdminAuth::QueryKey(admin_key)).await?;
    Ok(judge_export(&res))
}

pub async fn validation_missing_fields(client: &ApiClient) -> Result<Verdict, ClientError> {
    let res = client
        .create_submission(&ContactOnlyForm::default())
        .await?;
    Ok(judge_validation_failure(&res))
}

pub async fn honeypot_protection(
    client: &ApiClient,
    policy: HoneypotPolicy,
) -> Result<Verdict, ClientError> {
    let res = client
        .create_submission(&SubmissionForm::honeypot_bot())
        .await?;
    Ok(judge_honeypot(policy, &res))
}

pub async fn invalid_submission_id(client: &ApiClient) -> Result<Verdict, ClientError> {
    let res = client.public_results(INVALID_SUBMISSION_ID).await?;
    Ok(judge_not_found(&res))
}

pub async fn admin_submissions_invalid_key(
    client: &ApiClient,
    admin_key: &str,
) -> Result<Verdict, ClientError> {
    let wrong_key = format!("{}-invalid", admin_key);
    let res = client
        .admin_submissions(AdminAuth::QueryKey(&wrong_key))
        .await?;
    Ok(judge_rejected(&res))
}

pub async fn admin_submissions_header_key(
    client: &ApiClient,
    admin_key: &str,
) -> Result<Verdict, ClientError> {
    let res = client
        .admin_submissions(AdminAuth::HeaderKey(admin_key))
        .await?;
    Ok(judge_admin_listing(&res))
}

pub async fn admin_submission_detail(
    client: &ApiClient,
    admin_key: &str,
    id: Option<&SubmissionId>,
) -> Result<Verdict, ClientError> {
    let Some(id) = id else {
        return Ok(Verdict::fail(MISSING_ID_MESSAGE));
    };
    let res = client
        .admin_submission(id.as_str(), AdminAuth::QueryKey(admin_key))
        .await?;
    Ok(judge_admin_detail(id, &res))
}

pub async fn admin_export_unauthorized(client: &ApiClient) -> Result<Verdict, ClientError> {
    let res = client.admin_export(AdminAuth::None).await?;
    Ok(judge_rejected(&res))
}

// ============================================================================
// Judges
// ============================================================================

pub fn judge_created_submission(
    form: &SubmissionForm,
    res: &ApiResponse,
) -> (Verdict, Option<SubmissionId>) {
    if res.status != StatusCode::OK {
        return (unexpected_status(res), None);
    }
    let body = match res.json() {
        Ok(body) => body,
        Err(e) => return (not_json(e, res), None),
    };

    let schema = CREATED_SUBMISSION.check(&body);
    if !schema.is_valid() {
        return (
            Verdict::fail("Response missing required fields")
                .with_details(format!("{}; Response: {}", schema, body)),
            None,
        );
    }

    let created: CreatedSubmission = match serde_json::from_value(body) {
        Ok(created) => created,
        Err(e) => return (wrong_types(e), None),
    };
    if created.id.trim().is_empty() {
        return (Verdict::fail("Response contains an empty id"), None);
    }

    let check = BenefitCheck::compare(form, &created.matched_benefits);
    let expected: Vec<&str> = check.expected.iter().map(|b| b.tag()).collect();
    if !check.is_match() {
        log::warn!(
            "Submission {} is missing expected benefits: {:?}",
            created.id,
            check.missing
        );
    }

    let mut details = format!(
        "Matched benefits: {:?}, Expected: {:?}, Match: {}",
        created.matched_benefits,
        expected,
        check.is_match()
    );
    if !check.unexpected.is_empty() {
        details.push_str(&format!(", Unexpected: {:?}", check.unexpected));
    }
    if uuid::Uuid::parse_str(&created.id).is_err() {
        details.push_str(", Note: id is not a UUID");
    }

    (
        Verdict::pass(format!(
            "Submission created successfully with ID: {}",
            created.id
        ))
        .with_details(details),
        Some(SubmissionId::new(&created.id)),
    )
}

pub fn judge_public_results(id: &SubmissionId, res: &ApiResponse) -> Verdict {
    match res.status {
        StatusCode::OK => {}
        StatusCode::NOT_FOUND => {
            return Verdict::fail("Submission not found").with_details(format!("ID: {}", id))
        }
        _ => return unexpected_status(res),
    }
    let body = match res.json() {
        Ok(body) => body,
        Err(e) => return not_json(e, res),
    };

    let schema = PUBLIC_RESULTS.check(&body);
    if !schema.forbidden.is_empty() {
        return Verdict::fail("Response contains PII data").with_details(format!(
            "Found PII fields: {:?}; Schema: {}",
            schema.forbidden, schema
        ));
    }
    if !schema.is_valid() {
        return Verdict::fail("Response missing required fields")
            .with_details(format!("Missing: {:?}", schema.missing));
    }

    let results: PublicResults = match serde_json::from_value(body) {
        Ok(results) => results,
        Err(e) => return wrong_types(e),
    };

    let mut details = format!("Benefits count: {}", results.matched_benefits.len());
    if results.id != id.as_str() {
        details.push_str(&format!(", Note: returned id {} differs", results.id));
    }
    if !schema.extra.is_empty() {
        details.push_str(&format!(", Extra fields: {:?}", schema.extra));
    }

    Verdict::pass("Public results retrieved successfully without PII").with_details(details)
}

/// Admin endpoint called without a valid credential
pub fn judge_rejected(res: &ApiResponse) -> Verdict {
    if res.status == StatusCode::UNAUTHORIZED {
        Verdict::pass("Correctly rejected unauthorized request")
    } else {
        expected_status(StatusCode::UNAUTHORIZED, res)
    }
}

pub fn judge_admin_listing(res: &ApiResponse) -> Verdict {
    if res.status != StatusCode::OK {
        return unexpected_status(res);
    }
    let body = match res.json() {
        Ok(body) => body,
        Err(e) => return not_json(e, res),
    };

    let schema = ADMIN_LISTING.check(&body);
    if !schema.is_valid() {
        return Verdict::fail("Response missing required fields")
            .with_details(format!("Response keys: {:?}", object_keys(&body)));
    }

    let listing: AdminListing = match serde_json::from_value(body) {
        Ok(listing) => listing,
        Err(e) => return wrong_types(e),
    };

    Verdict::pass(format!("Retrieved {} submissions", listing.submissions.len()))
        .with_details(format!("Pagination: {}", listing.pagination))
}

pub fn judge_export(res: &ApiResponse) -> Verdict {
    if res.status != StatusCode::OK {
        return unexpected_status(res);
    }

    let content_type = res.content_type.as_deref().unwrap_or("");
    let disposition = res.content_disposition.as_deref().unwrap_or("");
    if !content_type.contains("text/csv") || !disposition.contains("attachment") {
        return Verdict::fail("Invalid CSV response headers").with_details(format!(
            "Content-Type: {}, Content-Disposition: {}",
            content_type, disposition
        ));
    }

    if res.body.trim().is_empty() {
        return Verdict::fail("CSV export is empty")
            .with_details(format!("Content-Type: {}", content_type));
    }

    let lines = res.body.split('\n').count();
    let mut details = format!(
        "Content-Type: {}, Size: {} bytes",
        content_type,
        res.body.len()
    );
    match csv_shape(&res.body) {
        Ok((columns, records)) => {
            details.push_str(&format!(", Columns: {}, Records: {}", columns, records))
        }
        Err(e) => details.push_str(&format!(", Note: CSV did not parse cleanly ({})", e)),
    }

    Verdict::pass(format!("CSV export successful with {} lines", lines)).with_details(details)
}

/// Column count of the header row and number of data records
fn csv_shape(body: &str) -> Result<(usize, usize), csv::Error> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let columns = reader.headers()?.len();
    let mut records = 0;
    for record in reader.records() {
        record?;
        records += 1;
    }
    Ok((columns, records))
}

pub fn judge_validation_failure(res: &ApiResponse) -> Verdict {
    if res.status != StatusCode::BAD_REQUEST {
        return expected_status(StatusCode::BAD_REQUEST, res);
    }
    let body = match res.json() {
        Ok(body) => body,
        Err(e) => return not_json(e, res),
    };

    if !VALIDATION_FAILURE.check(&body).is_valid() {
        return Verdict::fail("400 response but missing error structure")
            .with_details(format!("Response: {}", body));
    }

    let failure: ValidationFailure = match serde_json::from_value(body) {
        Ok(failure) => failure,
        Err(e) => return wrong_types(e),
    };
    let fields: Vec<String> = failure.details.iter().map(|d| d.field()).collect();

    Verdict::pass("Correctly rejected invalid submission").with_details(format!(
        "Error: {}, Details count: {}, Fields: {:?}",
        failure.error,
        failure.details.len(),
        fields
    ))
}

pub fn judge_honeypot(policy: HoneypotPolicy, res: &ApiResponse) -> Verdict {
    if res.status != StatusCode::OK {
        return unexpected_status(res);
    }
    let body = match res.json() {
        Ok(body) => body,
        Err(e) => return not_json(e, res),
    };

    let id = body.get("id").and_then(Value::as_str);
    if id == Some(BLOCKED_ID) {
        return Verdict::pass("Honeypot correctly blocked spam submission")
            .with_details(format!("Response: {}", body));
    }

    match policy {
        HoneypotPolicy::Lenient => Verdict::pass("Honeypot accepted submission (may not be saved)")
            .with_details(format!("Response: {}", body)),
        HoneypotPolicy::Strict => Verdict::fail(format!(
            "Honeypot submission was not blocked (expected id \"{}\")",
            BLOCKED_ID
        ))
        .with_details(format!("Response: {}", body)),
    }
}

pub fn judge_not_found(res: &ApiResponse) -> Verdict {
    if res.status != StatusCode::NOT_FOUND {
        return expected_status(StatusCode::NOT_FOUND, res);
    }
    let body = match res.json() {
        Ok(body) => body,
        Err(e) => return not_json(e, res),
    };

    let error = if ERROR_BODY.check(&body).is_valid() {
        serde_json::from_value::<ErrorBody>(body.clone())
            .ok()
            .map(|b| b.error)
            .filter(|e| !e.trim().is_empty())
    } else {
        None
    };

    match error {
        Some(error) => Verdict::pass("Correctly returned 404 for invalid ID")
            .with_details(format!("Error: {}", error)),
        None => Verdict::fail("404 response but missing error message")
            .with_details(format!("Response: {}", body)),
    }
}

pub fn judge_admin_detail(id: &SubmissionId, res: &ApiResponse) -> Verdict {
    match res.status {
        StatusCode::OK => {}
        StatusCode::NOT_FOUND => {
            return Verdict::fail("Submission not found").with_details(format!("ID: {}", id))
        }
        _ => return unexpected_status(res),
    }
    let body = match res.json() {
        Ok(body) => body,
        Err(e) => return not_json(e, res),
    };

    if !ADMIN_DETAIL.check(&body).is_valid() {
        return Verdict::fail("Response missing required fields")
            .with_details(format!("Response keys: {:?}", object_keys(&body)));
    }
    let detail: AdminDetail = match serde_json::from_value(body) {
        Ok(detail) => detail,
        Err(e) => return wrong_types(e),
    };

    let Some(returned_id) = detail.submission.get("id").and_then(Value::as_str) else {
        return Verdict::fail("Submission record has no id");
    };

    let contact: Vec<&str> = PII_FIELDS
        .iter()
        .copied()
        .filter(|f| detail.submission.get(*f).is_some())
        .collect();
    let mut details = format!("Contact fields present: {:?}", contact);
    if returned_id != id.as_str() {
        details.push_str(&format!(", Note: returned id {} differs", returned_id));
    }

    Verdict::pass(format!("Retrieved submission {}", returned_id)).with_details(details)
}

// ============================================================================
// Helpers
// ============================================================================

/// `HTTP <code>`, flagging throttling
pub fn describe_status(status: StatusCode) -> String {
    if status == StatusCode::TOO_MANY_REQUESTS {
        format!("HTTP {} (rate limited)", status.as_u16())
    } else {
        format!("HTTP {}", status.as_u16())
    }
}

fn unexpected_status(res: &ApiResponse) -> Verdict {
    Verdict::fail(describe_status(res.status)).with_details(body_excerpt(&res.body))
}

fn expected_status(expected: StatusCode, res: &ApiResponse) -> Verdict {
    Verdict::fail(format!(
        "Expected {}, got {}",
        expected.as_u16(),
        describe_status(res.status).trim_start_matches("HTTP ")
    ))
    .with_details(body_excerpt(&res.body))
}

fn not_json(err: serde_json::Error, res: &ApiResponse) -> Verdict {
    Verdict::fail("Response is not valid JSON")
        .with_details(format!("{}: {}", err, body_excerpt(&res.body)))
}

fn wrong_types(err: serde_json::Error) -> Verdict {
    Verdict::fail("Response has unexpected field types").with_details(err.to_string())
}

fn object_keys(body: &Value) -> Vec<String> {
    body.as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default()
}

fn body_excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_CHARS {
        body.to_string()
    } else {
        let cut: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{}...", cut)
    }
}
