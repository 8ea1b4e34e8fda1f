// src/models/topic.rs

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// The seven legal subject-matter categories.
///
/// Mapped to the Postgres enum type `legal_topic`. Quiz questions and
/// community board questions are both tagged with one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "legal_topic", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegalTopic {
    ConstitutionalRightsAndRemedies,
    CriminalJusticeSystem,
    FamilyAndPersonalLaws,
    PropertyAndContractBasics,
    ConsumerAndDigitalProtection,
    EmploymentAndLabourRights,
    EverydayLegalProcedures,
}

impl LegalTopic {
    /// All topics in declaration order.
    pub const ALL: [LegalTopic; 7] = [
        LegalTopic::ConstitutionalRightsAndRemedies,
        LegalTopic::CriminalJusticeSystem,
        LegalTopic::FamilyAndPersonalLaws,
        LegalTopic::PropertyAndContractBasics,
        LegalTopic::ConsumerAndDigitalProtection,
        LegalTopic::EmploymentAndLabourRights,
        LegalTopic::EverydayLegalProcedures,
    ];

    /// Topic of the daily quiz for a given weekday.
    ///
    /// Indexed Sunday=0 .. Saturday=6, so every topic comes up once a week.
    pub fn for_weekday(day: Weekday) -> Self {
        Self::ALL[day.num_days_from_sunday() as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LegalTopic::ConstitutionalRightsAndRemedies => "CONSTITUTIONAL_RIGHTS_AND_REMEDIES",
            LegalTopic::CriminalJusticeSystem => "CRIMINAL_JUSTICE_SYSTEM",
            LegalTopic::FamilyAndPersonalLaws => "FAMILY_AND_PERSONAL_LAWS",
            LegalTopic::PropertyAndContractBasics => "PROPERTY_AND_CONTRACT_BASICS",
            LegalTopic::ConsumerAndDigitalProtection => "CONSUMER_AND_DIGITAL_PROTECTION",
            LegalTopic::EmploymentAndLabourRights => "EMPLOYMENT_AND_LABOUR_RIGHTS",
            LegalTopic::EverydayLegalProcedures => "EVERYDAY_LEGAL_PROCEDURES",
        }
    }
}

impl fmt::Display for LegalTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
