// src/handlers/profile.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    models::profile::UpdateProfileRequest, services::profiles::ProfileService, utils::jwt::Claims,
};

/// The caller's profile, `profile: null` when none was saved yet.
pub async fn get_profile(
    State(profiles): State<ProfileService>,
    claims: Option<Extension<Claims>>,
) -> impl IntoResponse {
    let caller = claims.as_ref().map(|Extension(c)| c);
    profiles.get_profile(caller).await
}

/// Creates or replaces the caller's profile.
pub async fn update_profile(
    State(profiles): State<ProfileService>,
    claims: Option<Extension<Claims>>,
    Json(payload): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    let caller = claims.as_ref().map(|Extension(c)| c);
    profiles.update_profile(caller, payload).await
}

/// Today's personalised tips; generated on the first request of the day.
pub async fn get_recommended_tips(
    State(profiles): State<ProfileService>,
    claims: Option<Extension<Claims>>,
) -> impl IntoResponse {
    let caller = claims.as_ref().map(|Extension(c)| c);
    profiles.recommended_tips(caller).await
}
