// src/handlers/quiz.rs

use axum::{Extension, extract::State, response::IntoResponse};

use crate::{services::daily_quiz::DailyQuizCoordinator, utils::jwt::Claims};

/// Today's quiz for a signed-in caller.
///
/// The first request of the day generates the quiz; later ones read it back.
/// Always answers with `{ success, message, quizQuestions }`.
pub async fn get_daily_quiz(
    State(quiz): State<DailyQuizCoordinator>,
    claims: Option<Extension<Claims>>,
) -> impl IntoResponse {
    let caller = claims.as_ref().map(|Extension(c)| c);
    quiz.get_or_create_for_caller(caller).await
}

/// The most recently generated quiz. Never triggers generation.
pub async fn get_latest_quiz(State(quiz): State<DailyQuizCoordinator>) -> impl IntoResponse {
    quiz.latest_quiz().await
}
