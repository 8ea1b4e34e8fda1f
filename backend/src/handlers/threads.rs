// src/handlers/threads.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::thread::{
        LegalAnswer, LegalQuestion, QuestionDetail, QuestionSummary, SubmitAnswerRequest,
        SubmitQuestionRequest,
    },
    utils::{
        html::clean_html,
        jwt::Claims,
        text::{categorize_legal_topic, extract_title},
    },
};

/// Number of questions shown on the board.
const QUESTION_LIST_LIMIT: i64 = 50;

/// Ask a question on the board.
///
/// Signing in is optional; anonymous questions have no author.
/// The topic and title are derived from the text.
pub async fn submit_question(
    State(pool): State<PgPool>,
    claims: Option<Extension<Claims>>,
    Json(payload): Json<SubmitQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let content = clean_html(payload.question.trim());
    let topic = categorize_legal_topic(&content);
    let title = extract_title(&content);
    let user_id = claims.and_then(|Extension(c)| c.user_id());

    let (question_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO legal_questions (title, content, topic, user_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(&title)
    .bind(&content)
    .bind(topic)
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to submit question: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(question_id, %topic, "legal question submitted");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Question submitted successfully",
            "questionId": question_id,
        })),
    ))
}

/// Answer a question on the board.
pub async fn submit_answer(
    State(pool): State<PgPool>,
    Path(question_id): Path<i64>,
    claims: Option<Extension<Claims>>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let _exists: (i64,) = sqlx::query_as("SELECT id FROM legal_questions WHERE id = $1")
        .bind(question_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    let content = clean_html(payload.answer.trim());
    let user_id = claims.and_then(|Extension(c)| c.user_id());

    let (answer_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO legal_answers (question_id, content, user_id)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(question_id)
    .bind(&content)
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to submit answer: {:?}", e);
        AppError::from(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Answer submitted successfully",
            "answerId": answer_id,
        })),
    ))
}

/// Latest questions first, with answer counts.
pub async fn list_questions(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let questions = sqlx::query_as::<_, QuestionSummary>(
        r#"
        SELECT
            q.id, q.title, q.topic, q.user_id, q.created_at,
            (SELECT COUNT(*) FROM legal_answers a WHERE a.question_id = q.id) AS answers_count
        FROM legal_questions q
        ORDER BY q.created_at DESC
        LIMIT $1
        "#,
    )
    .bind(QUESTION_LIST_LIMIT)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(questions))
}

/// One question with its answers: accepted first, then most upvoted, then newest.
pub async fn get_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = sqlx::query_as::<_, LegalQuestion>(
        r#"
        SELECT id, title, content, topic, user_id, created_at
        FROM legal_questions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Question not found".to_string()))?;

    let answers = sqlx::query_as::<_, LegalAnswer>(
        r#"
        SELECT id, question_id, content, user_id, is_accepted, upvotes, created_at
        FROM legal_answers
        WHERE question_id = $1
        ORDER BY is_accepted DESC, upvotes DESC, created_at DESC
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(QuestionDetail { question, answers }))
}
