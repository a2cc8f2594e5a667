//! Submission payloads
//!
//! Typed versions of the eligibility form accepted by `POST /api/submissions`,
//! plus the fixed payloads the suite sends.

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeRange {
    #[serde(rename = "18_24")]
    From18To24,
    #[serde(rename = "25_34")]
    From25To34,
    #[serde(rename = "35_49")]
    From35To49,
    #[serde(rename = "50_64")]
    From50To64,
    #[serde(rename = "65_plus")]
    SixtyFivePlus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeRange {
    #[serde(rename = "under_1000")]
    Under1000,
    #[serde(rename = "1000_2000")]
    From1000To2000,
    #[serde(rename = "2000_3000")]
    From2000To3000,
    #[serde(rename = "3000_4000")]
    From3000To4000,
    #[serde(rename = "4000_plus")]
    Over4000,
}

impl IncomeRange {
    /// Monthly income below 3000
    pub fn is_low(self) -> bool {
        matches!(
            self,
            IncomeRange::Under1000 | IncomeRange::From1000To2000 | IncomeRange::From2000To3000
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    PartTime,
    Unemployed,
    Retired,
    Disabled,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HousingStatus {
    Rent,
    Own,
    Unhoused,
    Other,
}

/// Contact block of the form (the PII the public endpoint must never echo)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

impl Contact {
    pub fn new(full_name: &str, email: &str, phone: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    /// Random contact details, so each run creates an independent record
    pub fn fake() -> Self {
        Self {
            full_name: Name().fake(),
            email: SafeEmail().fake(),
            phone: PhoneNumber().fake(),
        }
    }
}

/// Fully populated eligibility form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionForm {
    #[serde(flatten)]
    pub contact: Contact,
    pub age_range: AgeRange,
    pub zip_code: String,
    pub household_size: String,
    pub monthly_income_range: IncomeRange,
    pub employment_status: EmploymentStatus,
    pub veteran: YesNo,
    pub disability: YesNo,
    pub student: YesNo,
    pub pregnant_or_children: YesNo,
    pub housing_status: HousingStatus,
    pub has_health_insurance: YesNo,

    /// Honeypot decoy, hidden from humans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl SubmissionForm {
    /// Retired, uninsured veteran over 65 renting on a low income.
    ///
    /// Matches most benefit programs, including `medicare_savings` and `va_benefits`.
    pub fn senior_veteran(contact: Contact) -> Self {
        Self {
            contact,
            age_range: AgeRange::SixtyFivePlus,
            zip_code: "12345".to_string(),
            household_size: "2".to_string(),
            monthly_income_range: IncomeRange::From1000To2000,
            employment_status: EmploymentStatus::Retired,
            veteran: YesNo::Yes,
            disability: YesNo::No,
            student: YesNo::No,
            pregnant_or_children: YesNo::No,
            housing_status: HousingStatus::Rent,
            has_health_insurance: YesNo::No,
            website: None,
        }
    }

    /// Valid-looking form with the honeypot field filled in, as a naive bot would
    pub fn honeypot_bot() -> Self {
        Self {
            contact: Contact::new("Bot User", "bot@spam.com", "555-999-9999"),
            age_range: AgeRange::From25To34,
            zip_code: "99999".to_string(),
            household_size: "1".to_string(),
            monthly_income_range: IncomeRange::From2000To3000,
            employment_status: EmploymentStatus::Employed,
            veteran: YesNo::No,
            disability: YesNo::No,
            student: YesNo::No,
            pregnant_or_children: YesNo::No,
            housing_status: HousingStatus::Rent,
            has_health_insurance: YesNo::Yes,
            website: Some("http://spam-bot-site.com".to_string()),
        }
    }
}

/// Deliberately incomplete form: contact fields only
#[derive(Debug, Clone, Serialize)]
pub struct ContactOnlyForm {
    pub full_name: String,
    pub email: String,
}

impl Default for ContactOnlyForm {
    fn default() -> Self {
        Self {
            full_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
        }
    }
}
