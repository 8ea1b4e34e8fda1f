// src/models/quiz.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::topic::LegalTopic;

/// Number of questions in every daily quiz.
pub const DAILY_QUIZ_SIZE: usize = 10;

/// Represents the 'quizzes' table in the database.
/// One row per calendar day, referencing its questions by id.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,

    /// Server-local calendar date the quiz belongs to. Unique.
    pub quiz_day: NaiveDate,

    /// Ordered ids of the rows in 'quiz_questions'.
    pub questions: Vec<i64>,

    pub created_at: DateTime<Utc>,
}

/// Represents the 'quiz_questions' table in the database.
/// Rows are written once when the quiz is generated and never updated.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,
    pub question: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,

    /// 0-based index of the correct option, as declared by the generator.
    pub correct: i32,

    pub explanation: String,
    pub topic: LegalTopic,
    pub created_at: DateTime<Utc>,
}

/// A question as returned by the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: i32,
    pub explanation: String,
}

impl GeneratedQuestion {
    /// Exactly four options and a correct index pointing at one of them.
    pub fn is_well_formed(&self) -> bool {
        self.options.len() == 4 && (0..4).contains(&self.correct_index)
    }
}

/// Everything needed to persist one day's quiz in a single unit of work.
#[derive(Debug, Clone)]
pub struct NewDailyQuiz {
    pub quiz_day: NaiveDate,
    pub topic: LegalTopic,
    pub questions: Vec<GeneratedQuestion>,
    pub created_at: DateTime<Utc>,
}

/// Result of trying to insert a day's quiz.
#[derive(Debug, Clone)]
pub enum DailyQuizInsert {
    /// The quiz and its questions were committed.
    Created {
        quiz: Quiz,
        questions: Vec<QuizQuestion>,
    },
    /// A quiz for that day was already there; nothing was written.
    AlreadyExists,
}

/// Response body shared by every quiz endpoint.
///
/// `quizQuestions` is null whenever `success` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub success: bool,
    pub message: String,
    pub quiz_questions: Option<Vec<QuizQuestion>>,
}

impl QuizOutcome {
    pub fn found(message: impl Into<String>, questions: Vec<QuizQuestion>) -> Self {
        Self {
            success: true,
            message: message.into(),
            quiz_questions: Some(questions),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            quiz_questions: None,
        }
    }
}
