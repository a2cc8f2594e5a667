use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deployment the suite targets when no base URL is given
pub const DEFAULT_BASE_URL: &str = "https://benefit-buddy-5.preview.emergentagent.com";

/// Admin key of the default deployment
pub const DEFAULT_ADMIN_KEY: &str = "ChangeMe-SetStrongKey-2026";

/// Per-request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the honeypot case judges a 200 response that is not the `blocked` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HoneypotPolicy {
    /// Only the `blocked` sentinel id passes
    #[default]
    Strict,
    /// A normal-looking accepted response also passes
    Lenient,
}

/// Suite configuration, fixed for the lifetime of one run
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Service base URL, without trailing slash
    pub base_url: String,

    /// Shared admin secret
    pub admin_key: String,

    /// Timeout applied to every request
    pub timeout: Duration,

    pub honeypot_policy: HoneypotPolicy,

    /// Also run the admin detail / header-key / wrong-key checks
    pub extended: bool,
}

impl SuiteConfig {
    pub fn new(base_url: &str, admin_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_key: admin_key.to_string(),
            ..Self::default()
        }
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            admin_key: DEFAULT_ADMIN_KEY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            honeypot_policy: HoneypotPolicy::Strict,
            extended: false,
        }
    }
}
