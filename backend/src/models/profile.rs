// src/models/profile.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Most tip sets kept per user; older ones are deleted.
pub const TIPS_RETENTION: i64 = 7;

/// Number of tips in one generated set.
pub const TIPS_PER_SET: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "gender", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    Other,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "marital_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Separated,
    Widowed,
    DomesticPartnership,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "income_range")]
pub enum IncomeRange {
    #[serde(rename = "UNDER_25K")]
    #[sqlx(rename = "UNDER_25K")]
    Under25k,
    #[serde(rename = "BETWEEN_25K_50K")]
    #[sqlx(rename = "BETWEEN_25K_50K")]
    Between25k50k,
    #[serde(rename = "BETWEEN_50K_75K")]
    #[sqlx(rename = "BETWEEN_50K_75K")]
    Between50k75k,
    #[serde(rename = "BETWEEN_75K_100K")]
    #[sqlx(rename = "BETWEEN_75K_100K")]
    Between75k100k,
    #[serde(rename = "OVER_100K")]
    #[sqlx(rename = "OVER_100K")]
    Over100k,
    #[serde(rename = "PREFER_NOT_TO_SAY")]
    #[sqlx(rename = "PREFER_NOT_TO_SAY")]
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "education_level", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EducationLevel {
    HighSchool,
    AssociatesDegree,
    BachelorsDegree,
    MastersDegree,
    DoctoralDegree,
    ProfessionalDegree,
    Other,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "residence_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResidenceType {
    Owned,
    Rented,
    LivingWithFamily,
    Other,
    PreferNotToSay,
}

/// Represents the 'user_profiles' table in the database.
/// One row per user; every field but the user id is optional.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i64,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub marital_status: Option<MaritalStatus>,
    pub occupation: Option<String>,
    pub income: Option<IncomeRange>,
    pub education: Option<EducationLevel>,
    pub has_children: Option<bool>,
    pub residence_type: Option<ResidenceType>,
    pub location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating or replacing the caller's profile.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub marital_status: Option<MaritalStatus>,
    #[validate(length(max = 100, message = "Occupation must be at most 100 chars"))]
    pub occupation: Option<String>,
    pub income: Option<IncomeRange>,
    pub education: Option<EducationLevel>,
    pub has_children: Option<bool>,
    pub residence_type: Option<ResidenceType>,
    #[validate(length(max = 200, message = "Location must be at most 200 chars"))]
    pub location: Option<String>,
}

/// Represents the 'user_tips' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTips {
    pub id: i64,
    pub user_id: i64,
    pub tips: Vec<String>,
    /// Server-local calendar date of `created_at`. Unique per user.
    pub tips_day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUserTips {
    pub user_id: i64,
    pub tips: Vec<String>,
    pub tips_day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Response body of the profile endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOutcome {
    pub success: bool,
    pub message: String,
    pub profile: Option<UserProfile>,
}

/// Response body of the tips endpoint. `tips` is empty on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipsOutcome {
    pub success: bool,
    pub message: String,
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub user_profile_not_found: bool,
}
