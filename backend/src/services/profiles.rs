//! User profiles and the once-a-day personalised tips built from them.

use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use thiserror::Error;
use validator::Validate;

use crate::{
    error::first_validation_message,
    models::profile::{NewUserTips, ProfileOutcome, TipsOutcome, UpdateProfileRequest},
    services::{
        clock::{Clock, SystemClock, local_day},
        profile_store::ProfileStore,
        question_generator::GenerationError,
        quiz_store::StoreError,
        tips_generator::TipsGenerator,
    },
    utils::jwt::Claims,
};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    GenerationFailure(#[from] GenerationError),
    #[error("{0}")]
    StoreFailure(#[from] StoreError),
}

impl ProfileError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProfileError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ProfileError::Invalid(_) => StatusCode::BAD_REQUEST,
            ProfileError::GenerationFailure(_) => StatusCode::BAD_GATEWAY,
            ProfileError::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            ProfileError::StoreFailure(e) => tracing::error!("Profile store failure: {}", e),
            ProfileError::GenerationFailure(e) => {
                tracing::error!("Tips generation failure: {}", e.detail())
            }
            other => tracing::debug!("Profile request refused: {}", other),
        }
    }
}

/// Outcome of a profile read or write with its HTTP status.
pub struct ProfileReply {
    pub status: StatusCode,
    pub outcome: ProfileOutcome,
}

impl From<Result<ProfileOutcome, ProfileError>> for ProfileReply {
    fn from(result: Result<ProfileOutcome, ProfileError>) -> Self {
        match result {
            Ok(outcome) => ProfileReply {
                status: StatusCode::OK,
                outcome,
            },
            Err(err) => {
                err.log();
                ProfileReply {
                    status: err.status(),
                    outcome: ProfileOutcome {
                        success: false,
                        message: err.to_string(),
                        profile: None,
                    },
                }
            }
        }
    }
}

impl IntoResponse for ProfileReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.outcome)).into_response()
    }
}

/// Outcome of a tips request with its HTTP status.
pub struct TipsReply {
    pub status: StatusCode,
    pub outcome: TipsOutcome,
}

impl From<Result<TipsOutcome, ProfileError>> for TipsReply {
    fn from(result: Result<TipsOutcome, ProfileError>) -> Self {
        match result {
            Ok(outcome) => TipsReply {
                status: StatusCode::OK,
                outcome,
            },
            Err(err) => {
                err.log();
                TipsReply {
                    status: err.status(),
                    outcome: TipsOutcome {
                        success: false,
                        message: err.to_string(),
                        tips: Vec::new(),
                        user_profile_not_found: false,
                    },
                }
            }
        }
    }
}

impl IntoResponse for TipsReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.outcome)).into_response()
    }
}

fn tips_found(message: &str, tips: Vec<String>) -> TipsOutcome {
    TipsOutcome {
        success: true,
        message: message.to_string(),
        tips,
        user_profile_not_found: false,
    }
}

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    tips: Arc<dyn TipsGenerator>,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        tips: Arc<dyn TipsGenerator>,
    ) -> Self {
        Self::with_clock(store, tips, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn ProfileStore>,
        tips: Arc<dyn TipsGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, tips, clock }
    }

    pub async fn get_profile(&self, caller: Option<&Claims>) -> ProfileReply {
        self.try_get_profile(caller).await.into()
    }

    /// Creates or fully replaces the caller's profile.
    pub async fn update_profile(
        &self,
        caller: Option<&Claims>,
        update: UpdateProfileRequest,
    ) -> ProfileReply {
        self.try_update_profile(caller, update).await.into()
    }

    /// Today's tip set for the caller, generated on the first request of the day.
    pub async fn recommended_tips(&self, caller: Option<&Claims>) -> TipsReply {
        self.try_recommended_tips(caller).await.into()
    }

    async fn try_get_profile(
        &self,
        caller: Option<&Claims>,
    ) -> Result<ProfileOutcome, ProfileError> {
        let user_id = caller_id(caller)?;
        let profile = self.store.profile(user_id).await?;
        let message = if profile.is_some() {
            "Profile found"
        } else {
            "No profile exists"
        };
        Ok(ProfileOutcome {
            success: true,
            message: message.to_string(),
            profile,
        })
    }

    async fn try_update_profile(
        &self,
        caller: Option<&Claims>,
        update: UpdateProfileRequest,
    ) -> Result<ProfileOutcome, ProfileError> {
        let user_id = caller_id(caller)?;
        update
            .validate()
            .map_err(|e| ProfileError::Invalid(first_validation_message(&e)))?;

        let now = self.clock.now().with_timezone(&Utc);
        let profile = self.store.upsert_profile(user_id, &update, now).await?;
        tracing::info!(user_id, "profile saved");

        Ok(ProfileOutcome {
            success: true,
            message: "Profile updated successfully".to_string(),
            profile: Some(profile),
        })
    }

    async fn try_recommended_tips(
        &self,
        caller: Option<&Claims>,
    ) -> Result<TipsOutcome, ProfileError> {
        let user_id = caller_id(caller)?;
        let now = self.clock.now();
        let today = now.date_naive();

        let existing = self.store.recent_tips(user_id).await?;
        if let Some(latest) = existing.first() {
            if local_day(latest.created_at) == today {
                return Ok(tips_found("Tips already created for today", latest.tips.clone()));
            }
        }

        let Some(profile) = self.store.profile(user_id).await? else {
            return Ok(TipsOutcome {
                success: true,
                message: "No profile found".to_string(),
                tips: Vec::new(),
                user_profile_not_found: true,
            });
        };

        let previous: Vec<Vec<String>> = existing.into_iter().map(|t| t.tips).collect();
        let generated = self.tips.generate(&profile, &previous).await?;

        let stored = self
            .store
            .record_tips(NewUserTips {
                user_id,
                tips: generated,
                tips_day: today,
                created_at: now.with_timezone(&Utc),
            })
            .await?;

        match stored {
            Some(row) => {
                tracing::info!(user_id, tips_id = row.id, %today, "tips stored");
                Ok(tips_found("New tips generated and stored successfully", row.tips))
            }
            // A concurrent request stored today's set first; serve that one.
            None => {
                let latest = self
                    .store
                    .recent_tips(user_id)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        StoreError::Unavailable("today's tips vanished after conflict".to_string())
                    })?;
                Ok(tips_found("Tips already created for today", latest.tips))
            }
        }
    }
}

fn caller_id(caller: Option<&Claims>) -> Result<i64, ProfileError> {
    caller.and_then(Claims::user_id).ok_or(ProfileError::Unauthenticated)
}
