//! Benefit programs and the eligibility rules the service applies.
//!
//! The suite uses these to predict which tags a submission should match.

use crate::schema::forms::{AgeRange, EmploymentStatus, HousingStatus, IncomeRange, SubmissionForm};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Benefit {
    Snap,
    Medicaid,
    MedicareSavings,
    Chip,
    Liheap,
    Wic,
    Unemployment,
    VaBenefits,
    HousingAssistance,
    Ssi,
}

impl Benefit {
    /// Every program, in the order the service evaluates them
    pub const ALL: [Benefit; 10] = [
        Benefit::Snap,
        Benefit::Medicaid,
        Benefit::MedicareSavings,
        Benefit::Chip,
        Benefit::Liheap,
        Benefit::Wic,
        Benefit::Unemployment,
        Benefit::VaBenefits,
        Benefit::HousingAssistance,
        Benefit::Ssi,
    ];

    /// Wire tag, as found in `matched_benefits`
    pub fn tag(self) -> &'static str {
        match self {
            Benefit::Snap => "snap",
            Benefit::Medicaid => "medicaid",
            Benefit::MedicareSavings => "medicare_savings",
            Benefit::Chip => "chip",
            Benefit::Liheap => "liheap",
            Benefit::Wic => "wic",
            Benefit::Unemployment => "unemployment",
            Benefit::VaBenefits => "va_benefits",
            Benefit::HousingAssistance => "housing_assistance",
            Benefit::Ssi => "ssi",
        }
    }

    pub fn matches(self, form: &SubmissionForm) -> bool {
        let low_income = form.monthly_income_range.is_low();
        match self {
            Benefit::Snap | Benefit::Liheap => low_income,
            Benefit::Medicaid => low_income || !form.has_health_insurance.is_yes(),
            Benefit::MedicareSavings => form.age_range == AgeRange::SixtyFivePlus && low_income,
            Benefit::Chip | Benefit::Wic => form.pregnant_or_children.is_yes(),
            Benefit::Unemployment => form.employment_status == EmploymentStatus::Unemployed,
            Benefit::VaBenefits => form.veteran.is_yes(),
            Benefit::HousingAssistance => low_income && form.housing_status != HousingStatus::Own,
            Benefit::Ssi => {
                // SSI uses a tighter income cut than the other programs
                let senior_or_disabled =
                    form.age_range == AgeRange::SixtyFivePlus || form.disability.is_yes();
                senior_or_disabled
                    && matches!(
                        form.monthly_income_range,
                        IncomeRange::Under1000 | IncomeRange::From1000To2000
                    )
            }
        }
    }
}

impl fmt::Display for Benefit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Programs the service should match for `form`
pub fn expected_benefits(form: &SubmissionForm) -> Vec<Benefit> {
    Benefit::ALL
        .into_iter()
        .filter(|b| b.matches(form))
        .collect()
}

/// Result of comparing predicted programs with what the service returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenefitCheck {
    pub expected: Vec<Benefit>,
    /// Predicted but not returned
    pub missing: Vec<Benefit>,
    /// Returned but not predicted
    pub unexpected: Vec<String>,
}

impl BenefitCheck {
    pub fn compare(form: &SubmissionForm, matched: &[String]) -> Self {
        let expected = expected_benefits(form);
        let missing = expected
            .iter()
            .copied()
            .filter(|b| !matched.iter().any(|m| m == b.tag()))
            .collect();
        let unexpected = matched
            .iter()
            .filter(|m| !expected.iter().any(|b| b.tag() == m.as_str()))
            .cloned()
            .collect();

        Self {
            expected,
            missing,
            unexpected,
        }
    }

    /// Every predicted program was returned
    pub fn is_match(&self) -> bool {
        self.missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::forms::{Contact, YesNo};

    fn tags(benefits: &[Benefit]) -> Vec<&'static str> {
        benefits.iter().map(|b| b.tag()).collect()
    }

    #[test]
    fn test_senior_veteran_matches() {
        let form = SubmissionForm::senior_veteran(Contact::new("A", "a@b.c", "1"));
        assert_eq!(
            tags(&expected_benefits(&form)),
            vec![
                "snap",
                "medicaid",
                "medicare_savings",
                "liheap",
                "va_benefits",
                "housing_assistance",
                "ssi"
            ]
        );
    }

    #[test]
    fn test_insured_homeowner_with_high_income_matches_nothing() {
        let mut form = SubmissionForm::senior_veteran(Contact::new("A", "a@b.c", "1"));
        form.monthly_income_range = IncomeRange::Over4000;
        form.has_health_insurance = YesNo::Yes;
        form.housing_status = HousingStatus::Own;
        form.veteran = YesNo::No;
        assert!(expected_benefits(&form).is_empty());
    }

    #[test]
    fn test_ssi_income_cut() {
        let mut form = SubmissionForm::senior_veteran(Contact::new("A", "a@b.c", "1"));
        form.monthly_income_range = IncomeRange::From2000To3000;
        assert!(!Benefit::Ssi.matches(&form));
        assert!(Benefit::MedicareSavings.matches(&form));
    }

    #[test]
    fn test_compare_reports_missing_and_unexpected() {
        let form = SubmissionForm::senior_veteran(Contact::new("A", "a@b.c", "1"));
        let matched: Vec<String> = ["snap", "medicaid", "wic"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let check = BenefitCheck::compare(&form, &matched);
        assert!(!check.is_match());
        assert!(check.missing.contains(&Benefit::VaBenefits));
        assert_eq!(check.unexpected, vec!["wic".to_string()]);
    }
}
