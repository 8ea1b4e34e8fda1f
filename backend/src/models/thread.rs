// src/models/thread.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use super::topic::LegalTopic;

/// Represents the 'legal_questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LegalQuestion {
    pub id: i64,
    pub title: String,
    pub content: String,

    /// Assigned by keyword scoring at submission time.
    pub topic: LegalTopic,

    /// Author, if the question was asked while signed in.
    pub user_id: Option<i64>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'legal_answers' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LegalAnswer {
    pub id: i64,
    pub question_id: i64,
    pub content: String,
    pub user_id: Option<i64>,
    pub is_accepted: bool,
    pub upvotes: i32,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Row of the question list, with the number of answers posted.
#[derive(Debug, Serialize, FromRow)]
pub struct QuestionSummary {
    pub id: i64,
    pub title: String,
    pub topic: LegalTopic,
    pub user_id: Option<i64>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub answers_count: i64,
}

/// A question together with its answers, best first.
#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: LegalQuestion,
    pub answers: Vec<LegalAnswer>,
}

/// DTO for asking a question on the board.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitQuestionRequest {
    #[validate(
        custom(function = not_blank, message = "Question cannot be empty"),
        length(max = 5000, message = "Question must be at most 5000 chars")
    )]
    pub question: String,
}

/// DTO for answering a question on the board.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(
        custom(function = not_blank, message = "Answer cannot be empty"),
        length(max = 10000, message = "Answer must be at most 10000 chars")
    )]
    pub answer: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
