// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{profile, quiz, threads},
    state::AppState,
    utils::jwt::identify_caller,
};

/// Assembles the main application router.
///
/// * Quiz routes (`/api/quiz`), profiles and tips (`/api/profile`) and the community board
///   (`/api/questions`).
/// * Caller identification on every route; handlers decide what anonymous callers may do.
/// * Global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let quiz_routes = Router::new()
        .route("/daily", get(quiz::get_daily_quiz))
        .route("/latest", get(quiz::get_latest_quiz));

    let profile_routes = Router::new()
        .route("/", get(profile::get_profile).put(profile::update_profile))
        .route("/tips", get(profile::get_recommended_tips));

    let question_routes = Router::new()
        .route("/", get(threads::list_questions).post(threads::submit_question))
        .route("/{id}", get(threads::get_question))
        .route("/{id}/answers", axum::routing::post(threads::submit_answer));

    Router::new()
        .nest("/api/quiz", quiz_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/questions", question_routes)
        .layer(middleware::from_fn_with_state(state.clone(), identify_caller))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
