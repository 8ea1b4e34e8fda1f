//! Persistence of daily quizzes and their questions.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::quiz::{DailyQuizInsert, NewDailyQuiz, Quiz, QuizQuestion};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Most recently created quiz, if any.
    async fn latest_quiz(&self) -> Result<Option<Quiz>, StoreError>;

    /// Questions with the given ids, in the order of `ids`. Unknown ids are skipped.
    async fn questions_by_ids(&self, ids: &[i64]) -> Result<Vec<QuizQuestion>, StoreError>;

    /// Writes the questions and the quiz that references them as one unit.
    ///
    /// Returns `AlreadyExists` without writing anything when a quiz for
    /// `new.quiz_day` is already stored.
    async fn create_daily_quiz(&self, new: NewDailyQuiz) -> Result<DailyQuizInsert, StoreError>;
}

/// Reorders rows to follow `ids`.
fn order_by_ids(ids: &[i64], rows: Vec<QuizQuestion>) -> Vec<QuizQuestion> {
    let mut by_id: HashMap<i64, QuizQuestion> = rows.into_iter().map(|q| (q.id, q)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn latest_quiz(&self) -> Result<Option<Quiz>, StoreError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, quiz_day, questions, created_at
            FROM quizzes
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn questions_by_ids(&self, ids: &[i64]) -> Result<Vec<QuizQuestion>, StoreError> {
        let rows = sqlx::query_as::<_, QuizQuestion>(
            r#"
            SELECT
                id, question, option1, option2, option3, option4,
                correct, explanation, topic, created_at
            FROM quiz_questions
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(order_by_ids(ids, rows))
    }

    async fn create_daily_quiz(&self, new: NewDailyQuiz) -> Result<DailyQuizInsert, StoreError> {
        let mut tx = self.pool.begin().await?;

        let mut questions = Vec::with_capacity(new.questions.len());
        for q in &new.questions {
            let row = sqlx::query_as::<_, QuizQuestion>(
                r#"
                INSERT INTO quiz_questions
                    (question, option1, option2, option3, option4,
                     correct, explanation, topic, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING
                    id, question, option1, option2, option3, option4,
                    correct, explanation, topic, created_at
                "#,
            )
            .bind(&q.question)
            .bind(&q.options[0])
            .bind(&q.options[1])
            .bind(&q.options[2])
            .bind(&q.options[3])
            .bind(q.correct_index)
            .bind(&q.explanation)
            .bind(new.topic)
            .bind(new.created_at)
            .fetch_one(&mut *tx)
            .await?;
            questions.push(row);
        }

        let ids: Vec<i64> = questions.iter().map(|q| q.id).collect();

        // One quiz per day: a concurrent winner makes this insert a no-op.
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (quiz_day, questions, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (quiz_day) DO NOTHING
            RETURNING id, quiz_day, questions, created_at
            "#,
        )
        .bind(new.quiz_day)
        .bind(&ids)
        .bind(new.created_at)
        .fetch_optional(&mut *tx)
        .await?;

        match quiz {
            Some(quiz) => {
                tx.commit().await?;
                Ok(DailyQuizInsert::Created { quiz, questions })
            }
            None => {
                tx.rollback().await?;
                tracing::info!(
                    day = %new.quiz_day,
                    "quiz for this day already exists, discarding generated questions"
                );
                Ok(DailyQuizInsert::AlreadyExists)
            }
        }
    }
}

#[derive(Default)]
struct MemoryTables {
    quizzes: Vec<Quiz>,
    questions: Vec<QuizQuestion>,
    next_quiz_id: i64,
    next_question_id: i64,
}

/// In-process store with the same guarantees as `PgQuizStore`.
///
/// Used by the test suites. Reads and writes can be switched off to
/// simulate an unavailable database.
#[derive(Default)]
pub struct MemoryQuizStore {
    tables: Mutex<MemoryTables>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of read operations served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn quizzes(&self) -> Vec<Quiz> {
        self.lock().quizzes.clone()
    }

    pub fn question_count(&self) -> usize {
        self.lock().questions.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryTables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_read(&self) -> Result<(), StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl QuizStore for MemoryQuizStore {
    async fn latest_quiz(&self) -> Result<Option<Quiz>, StoreError> {
        self.check_read()?;
        let tables = self.lock();
        Ok(tables.quizzes.iter().max_by_key(|q| q.created_at).cloned())
    }

    async fn questions_by_ids(&self, ids: &[i64]) -> Result<Vec<QuizQuestion>, StoreError> {
        self.check_read()?;
        let tables = self.lock();
        let rows = tables
            .questions
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect();
        Ok(order_by_ids(ids, rows))
    }

    async fn create_daily_quiz(&self, new: NewDailyQuiz) -> Result<DailyQuizInsert, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }

        let mut tables = self.lock();
        if tables.quizzes.iter().any(|q| q.quiz_day == new.quiz_day) {
            return Ok(DailyQuizInsert::AlreadyExists);
        }

        let mut questions = Vec::with_capacity(new.questions.len());
        for q in new.questions {
            tables.next_question_id += 1;
            let mut options = q.options.into_iter();
            let mut option = || options.next().unwrap_or_default();
            questions.push(QuizQuestion {
                id: tables.next_question_id,
                question: q.question,
                option1: option(),
                option2: option(),
                option3: option(),
                option4: option(),
                correct: q.correct_index,
                explanation: q.explanation,
                topic: new.topic,
                created_at: new.created_at,
            });
        }

        tables.next_quiz_id += 1;
        let quiz = Quiz {
            id: tables.next_quiz_id,
            quiz_day: new.quiz_day,
            questions: questions.iter().map(|q| q.id).collect(),
            created_at: new.created_at,
        };

        tables.questions.extend(questions.iter().cloned());
        tables.quizzes.push(quiz.clone());

        Ok(DailyQuizInsert::Created { quiz, questions })
    }
}
