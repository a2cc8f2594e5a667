//! HTTP client for the submission API
//!
//! Thin wrapper over `reqwest` that knows the endpoint paths and how the admin
//! key is passed. Every call returns the raw status, the headers the suite
//! inspects and the body text; judging the response is left to the caller.

use reqwest::header::{HeaderMap, HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Query parameter carrying the admin key
pub const ADMIN_KEY_PARAM: &str = "adminKey";

/// Header alternative to `adminKey`
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Transport-level failures. Contract violations are never errors here.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// `url` is the path without query. reqwest's own URL is dropped since it
    /// may carry the admin key.
    fn from_send(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            ClientError::Timeout { url }
        } else if err.is_connect() {
            ClientError::Connect {
                url,
                source: err.without_url(),
            }
        } else {
            ClientError::Transport {
                url,
                source: err.without_url(),
            }
        }
    }

    fn from_body(url: &str, err: reqwest::Error) -> Self {
        ClientError::Body {
            url: url.to_string(),
            source: err.without_url(),
        }
    }
}

/// How a request authenticates against the admin endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAuth<'a> {
    None,
    QueryKey(&'a str),
    HeaderKey(&'a str),
}

/// What the suite keeps from an HTTP response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            content_type: None,
            content_disposition: None,
            body: body.to_string(),
        }
    }

    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Submission API client
pub struct ApiClient {
    /// Base URL, without trailing slash
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `POST /api/submissions`
    pub async fn create_submission<T: Serialize + ?Sized>(
        &self,
        form: &T,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url("/api/submissions");
        log::debug!("POST {}", url);
        let request = self.client.post(&url).json(form);
        self.send(&url, request).await
    }

    /// `GET /api/public-results/{id}`
    pub async fn public_results(&self, id: &str) -> Result<ApiResponse, ClientError> {
        let url = self.url(&format!("/api/public-results/{}", id));
        log::debug!("GET {}", url);
        self.send(&url, self.client.get(&url)).await
    }

    /// `GET /api/admin/submissions`
    pub async fn admin_submissions(&self, auth: AdminAuth<'_>) -> Result<ApiResponse, ClientError> {
        self.admin_get("/api/admin/submissions", auth).await
    }

    /// `GET /api/admin/submissions/{id}`
    pub async fn admin_submission(
        &self,
        id: &str,
        auth: AdminAuth<'_>,
    ) -> Result<ApiResponse, ClientError> {
        self.admin_get(&format!("/api/admin/submissions/{}", id), auth)
            .await
    }

    /// `GET /api/admin/export`
    pub async fn admin_export(&self, auth: AdminAuth<'_>) -> Result<ApiResponse, ClientError> {
        self.admin_get("/api/admin/export", auth).await
    }

    async fn admin_get(&self, path: &str, auth: AdminAuth<'_>) -> Result<ApiResponse, ClientError> {
        let url = self.url(path);
        log::debug!("GET {} ({})", url, auth_kind(auth));

        let request = match auth {
            AdminAuth::None => self.client.get(&url),
            AdminAuth::QueryKey(key) => self.client.get(&url).query(&[(ADMIN_KEY_PARAM, key)]),
            AdminAuth::HeaderKey(key) => self.client.get(&url).header(ADMIN_KEY_HEADER, key),
        };
        self.send(&url, request).await
    }

    async fn send(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse, ClientError> {
        let res = request
            .send()
            .await
            .map_err(|e| ClientError::from_send(url, e))?;

        let status = res.status();
        let content_type = header_value(res.headers(), CONTENT_TYPE);
        let content_disposition = header_value(res.headers(), CONTENT_DISPOSITION);

        let body = res
            .text()
            .await
            .map_err(|e| ClientError::from_body(url, e))?;

        log::debug!("{} -> {} ({} bytes)", url, status, body.len());

        Ok(ApiResponse {
            status,
            content_type,
            content_disposition,
            body,
        })
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

// Never log the key itself
fn auth_kind(auth: AdminAuth<'_>) -> &'static str {
    match auth {
        AdminAuth::None => "no key",
        AdminAuth::QueryKey(_) => "query key",
        AdminAuth::HeaderKey(_) => "header key",
    }
}
