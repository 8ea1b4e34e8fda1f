//! Daily quiz coordination: serve today's quiz, or generate it on the first
//! request of the day.

use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{Datelike, NaiveDate, Utc};
use thiserror::Error;

use crate::{
    models::{
        quiz::{DailyQuizInsert, NewDailyQuiz, QuizOutcome, QuizQuestion},
        topic::LegalTopic,
    },
    services::{
        clock::{Clock, SystemClock, local_day},
        question_generator::{GenerationError, QuestionGenerator, validate_questions},
        quiz_store::{QuizStore, StoreError},
    },
    utils::jwt::Claims,
};

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("User not authenticated")]
    Unauthenticated,
    #[error("{0}")]
    GenerationFailure(#[from] GenerationError),
    #[error("{0}")]
    StoreFailure(#[from] StoreError),
    #[error("quiz not found")]
    NotFound,
}

impl QuizError {
    pub fn status(&self) -> StatusCode {
        match self {
            QuizError::Unauthenticated => StatusCode::UNAUTHORIZED,
            QuizError::NotFound => StatusCode::NOT_FOUND,
            QuizError::GenerationFailure(_) => StatusCode::BAD_GATEWAY,
            QuizError::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Outcome of a quiz operation together with the HTTP status it maps to.
pub struct QuizReply {
    pub status: StatusCode,
    pub outcome: QuizOutcome,
}

impl From<Result<QuizOutcome, QuizError>> for QuizReply {
    fn from(result: Result<QuizOutcome, QuizError>) -> Self {
        match result {
            Ok(outcome) => QuizReply {
                status: StatusCode::OK,
                outcome,
            },
            Err(err) => {
                match &err {
                    QuizError::StoreFailure(e) => tracing::error!("Quiz store failure: {}", e),
                    QuizError::GenerationFailure(e) => {
                        tracing::error!("Quiz generation failure: {}", e.detail())
                    }
                    other => tracing::debug!("Quiz request refused: {}", other),
                }
                QuizReply {
                    status: err.status(),
                    outcome: QuizOutcome::failed(err.to_string()),
                }
            }
        }
    }
}

impl IntoResponse for QuizReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.outcome)).into_response()
    }
}

/// Coordinates the one-quiz-per-day lifecycle over a store and a generator.
#[derive(Clone)]
pub struct DailyQuizCoordinator {
    store: Arc<dyn QuizStore>,
    generator: Arc<dyn QuestionGenerator>,
    clock: Arc<dyn Clock>,
}

impl DailyQuizCoordinator {
    pub fn new(store: Arc<dyn QuizStore>, generator: Arc<dyn QuestionGenerator>) -> Self {
        Self::with_clock(store, generator, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn QuizStore>,
        generator: Arc<dyn QuestionGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            generator,
            clock,
        }
    }

    /// Returns today's quiz, generating and storing it if none exists yet.
    pub async fn get_or_create_daily_quiz(&self) -> QuizReply {
        self.try_get_or_create().await.into()
    }

    /// Same as `get_or_create_daily_quiz`, but only for an identified caller.
    /// Anonymous callers are refused before the store is touched.
    pub async fn get_or_create_for_caller(&self, caller: Option<&Claims>) -> QuizReply {
        let Some(claims) = caller else {
            return Err::<QuizOutcome, _>(QuizError::Unauthenticated).into();
        };
        tracing::debug!(user = %claims.sub, "daily quiz requested");
        self.get_or_create_daily_quiz().await
    }

    /// Returns the most recent quiz without ever generating one.
    pub async fn latest_quiz(&self) -> QuizReply {
        self.try_latest().await.into()
    }

    async fn try_latest(&self) -> Result<QuizOutcome, QuizError> {
        let quiz = self.store.latest_quiz().await?.ok_or(QuizError::NotFound)?;
        let questions = self.store.questions_by_ids(&quiz.questions).await?;
        Ok(QuizOutcome::found("Latest quiz found", questions))
    }

    async fn try_get_or_create(&self) -> Result<QuizOutcome, QuizError> {
        let now = self.clock.now();
        let today = now.date_naive();

        if let Some(questions) = self.todays_questions(today).await? {
            return Ok(QuizOutcome::found("Today's quiz found", questions));
        }

        let topic = LegalTopic::for_weekday(now.weekday());
        tracing::info!(%today, %topic, "no quiz for today, generating");

        let generated = self.generator.generate(topic).await?;
        validate_questions(&generated)?;

        let insert = self
            .store
            .create_daily_quiz(NewDailyQuiz {
                quiz_day: today,
                topic,
                questions: generated,
                created_at: now.with_timezone(&Utc),
            })
            .await?;

        match insert {
            DailyQuizInsert::Created { quiz, questions } => {
                tracing::info!(quiz_id = quiz.id, %today, "daily quiz created");
                Ok(QuizOutcome::found("New quiz created for today", questions))
            }
            // Another request won the race; serve its quiz.
            DailyQuizInsert::AlreadyExists => {
                let questions = self
                    .todays_questions(today)
                    .await?
                    .ok_or_else(|| {
                        StoreError::Unavailable("today's quiz vanished after conflict".to_string())
                    })?;
                Ok(QuizOutcome::found("Today's quiz found", questions))
            }
        }
    }

    /// Questions of the latest quiz if it was created on `today`.
    async fn todays_questions(
        &self,
        today: NaiveDate,
    ) -> Result<Option<Vec<QuizQuestion>>, QuizError> {
        let Some(latest) = self.store.latest_quiz().await? else {
            return Ok(None);
        };
        if local_day(latest.created_at) != today {
            return Ok(None);
        }
        let questions = self.store.questions_by_ids(&latest.questions).await?;
        Ok(Some(questions))
    }
}
