//! Client for the tips-generation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::{
    models::profile::{TIPS_PER_SET, UserProfile},
    services::question_generator::{
        GenerationError, http_client, map_reqwest_error, service_endpoint,
    },
};

const TIPS_PATH: &str = "api/tips";

/// Produces a personalised tip set from a profile and the user's earlier sets.
#[async_trait]
pub trait TipsGenerator: Send + Sync {
    async fn generate(
        &self,
        profile: &UserProfile,
        existing: &[Vec<String>],
    ) -> Result<Vec<String>, GenerationError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TipsRequest<'a> {
    user_profile: &'a UserProfile,
    existing_tips: &'a [Vec<String>],
}

/// A tip set must hold exactly `TIPS_PER_SET` non-blank entries.
pub fn validate_tips(tips: &[String]) -> Result<(), GenerationError> {
    if tips.len() != TIPS_PER_SET {
        return Err(GenerationError::InvalidResponse(format!(
            "expected {} tips, got {}",
            TIPS_PER_SET,
            tips.len()
        )));
    }
    if let Some(pos) = tips.iter().position(|t| t.trim().is_empty()) {
        return Err(GenerationError::InvalidResponse(format!("tip {} is blank", pos)));
    }
    Ok(())
}

/// HTTP client posting `{"userProfile": ..., "existingTips": [...]}` to `<base>/api/tips`.
/// The service answers with a bare JSON array of strings.
#[derive(Debug, Clone)]
pub struct HttpTipsGenerator {
    http: Client,
    endpoint: Url,
}

impl HttpTipsGenerator {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, GenerationError> {
        Ok(Self {
            http: http_client(timeout)?,
            endpoint: service_endpoint(base_url, TIPS_PATH)?,
        })
    }
}

#[async_trait]
impl TipsGenerator for HttpTipsGenerator {
    async fn generate(
        &self,
        profile: &UserProfile,
        existing: &[Vec<String>],
    ) -> Result<Vec<String>, GenerationError> {
        tracing::info!(
            user_id = profile.user_id,
            previous_sets = existing.len(),
            endpoint = %self.endpoint,
            "requesting tips"
        );

        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&TipsRequest {
                user_profile: profile,
                existing_tips: existing,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let tips = res
            .json::<Vec<String>>()
            .await
            .map_err(|e| GenerationError::Serde(e.to_string()))?;

        validate_tips(&tips)?;
        Ok(tips)
    }
}
