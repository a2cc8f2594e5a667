//! Response schemas
//!
//! Each endpoint gets a `FieldSchema` (presence rules, checked in one pass over
//! the raw JSON) and a typed body that the response is deserialized into once
//! the presence rules hold.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Contact fields that public responses must never contain
pub const PII_FIELDS: &[&str] = &["full_name", "email", "phone"];

/// Presence rules for the top-level keys of a JSON object
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    pub required: &'static [&'static str],
    pub forbidden: &'static [&'static str],
    pub optional: &'static [&'static str],
}

pub const CREATED_SUBMISSION: FieldSchema = FieldSchema {
    required: &["id", "matched_benefits"],
    forbidden: &[],
    optional: &[],
};

pub const PUBLIC_RESULTS: FieldSchema = FieldSchema {
    required: &[
        "id",
        "age_range",
        "zip_code",
        "household_size",
        "matched_benefits",
        "created_at",
    ],
    forbidden: PII_FIELDS,
    optional: &[],
};

pub const ADMIN_LISTING: FieldSchema = FieldSchema {
    required: &["submissions", "pagination"],
    forbidden: &[],
    optional: &[],
};

pub const ADMIN_DETAIL: FieldSchema = FieldSchema {
    required: &["submission"],
    forbidden: &[],
    optional: &[],
};

pub const VALIDATION_FAILURE: FieldSchema = FieldSchema {
    required: &["error", "details"],
    forbidden: &[],
    optional: &[],
};

pub const ERROR_BODY: FieldSchema = FieldSchema {
    required: &["error"],
    forbidden: &[],
    optional: &[],
};

impl FieldSchema {
    /// Check every rule against `body` and collect all violations
    pub fn check(&self, body: &Value) -> SchemaReport {
        let Some(object) = body.as_object() else {
            return SchemaReport {
                not_an_object: true,
                missing: self.required.iter().map(|f| f.to_string()).collect(),
                ..SchemaReport::default()
            };
        };

        let missing = self
            .required
            .iter()
            .filter(|f| !object.contains_key(**f))
            .map(|f| f.to_string())
            .collect();

        let forbidden = self
            .forbidden
            .iter()
            .filter(|f| object.contains_key(**f))
            .map(|f| f.to_string())
            .collect();

        let extra = object
            .keys()
            .filter(|k| {
                let k = k.as_str();
                !self.required.contains(&k)
                    && !self.optional.contains(&k)
                    && !self.forbidden.contains(&k)
            })
            .cloned()
            .collect();

        SchemaReport {
            not_an_object: false,
            missing,
            forbidden,
            extra,
        }
    }
}

/// Outcome of a `FieldSchema::check`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub not_an_object: bool,
    pub missing: Vec<String>,
    pub forbidden: Vec<String>,
    /// Keys outside the schema; reported, never fatal
    pub extra: Vec<String>,
}

impl SchemaReport {
    pub fn is_valid(&self) -> bool {
        !self.not_an_object && self.missing.is_empty() && self.forbidden.is_empty()
    }
}

impl fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.not_an_object {
            parts.push("Body is not a JSON object".to_string());
        }
        if !self.missing.is_empty() {
            parts.push(format!("Missing: {:?}", self.missing));
        }
        if !self.forbidden.is_empty() {
            parts.push(format!("Forbidden: {:?}", self.forbidden));
        }
        if !self.extra.is_empty() {
            parts.push(format!("Extra: {:?}", self.extra));
        }
        if parts.is_empty() {
            write!(f, "OK")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// `POST /api/submissions` success body
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedSubmission {
    pub id: String,
    pub matched_benefits: Vec<String>,
}

/// Benefit entry as returned by the public endpoint: a bare tag or a detailed object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BenefitEntry {
    Tag(String),
    Detailed {
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl BenefitEntry {
    pub fn id(&self) -> &str {
        match self {
            BenefitEntry::Tag(id) => id,
            BenefitEntry::Detailed { id, .. } => id,
        }
    }
}

/// `GET /api/public-results/{id}` body
#[derive(Debug, Clone, Deserialize)]
pub struct PublicResults {
    pub id: String,
    pub age_range: String,
    pub zip_code: String,
    pub household_size: String,
    pub matched_benefits: Vec<BenefitEntry>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub total: Option<u64>,
    pub pages: Option<u64>,
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<u64>| v.map_or_else(|| "?".to_string(), |n| n.to_string());
        write!(
            f,
            "page {} of {} (limit {}, total {})",
            show(self.page),
            show(self.pages),
            show(self.limit),
            show(self.total)
        )
    }
}

/// `GET /api/admin/submissions` body
#[derive(Debug, Clone, Deserialize)]
pub struct AdminListing {
    pub submissions: Vec<Value>,
    pub pagination: Pagination,
}

/// `GET /api/admin/submissions/{id}` body
#[derive(Debug, Clone, Deserialize)]
pub struct AdminDetail {
    pub submission: Value,
}

/// One field-level validation problem
#[derive(Debug, Clone, Deserialize)]
pub struct FieldIssue {
    #[serde(default)]
    pub path: Vec<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FieldIssue {
    /// Dotted field path, e.g. `age_range`
    pub fn field(&self) -> String {
        self.path
            .iter()
            .map(|p| match p {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// 400 body of `POST /api/submissions`
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationFailure {
    pub error: String,
    pub details: Vec<FieldIssue>,
}

/// Generic `{error}` body
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
