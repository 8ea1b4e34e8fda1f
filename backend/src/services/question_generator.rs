//! Client for the question-generation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::models::{
    quiz::{DAILY_QUIZ_SIZE, GeneratedQuestion},
    topic::LegalTopic,
};

const QUIZ_PATH: &str = "api/quiz";

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("API request failed with status: {status}")]
    Http { status: u16, body: String },
    #[error("json error: {0}")]
    Serde(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    /// Display text plus the upstream response body, for logs.
    pub fn detail(&self) -> String {
        match self {
            GenerationError::Http { body, .. } if !body.is_empty() => {
                format!("{} (body: {})", self, body)
            }
            _ => self.to_string(),
        }
    }
}

/// Produces quiz questions for a topic.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, topic: LegalTopic) -> Result<Vec<GeneratedQuestion>, GenerationError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    topic: LegalTopic,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    questions: Vec<GeneratedQuestion>,
}

/// Checks the payload is a full quiz: exactly ten questions, four options each,
/// and a correct index within the options.
pub fn validate_questions(questions: &[GeneratedQuestion]) -> Result<(), GenerationError> {
    if questions.len() != DAILY_QUIZ_SIZE {
        return Err(GenerationError::InvalidResponse(format!(
            "expected {} questions, got {}",
            DAILY_QUIZ_SIZE,
            questions.len()
        )));
    }
    if let Some(pos) = questions.iter().position(|q| !q.is_well_formed()) {
        return Err(GenerationError::InvalidResponse(format!(
            "question {} must have 4 options and a correct index in 0..=3",
            pos
        )));
    }
    Ok(())
}

/// HTTP client posting `{"topic": ...}` to `<base>/api/quiz`.
#[derive(Debug, Clone)]
pub struct HttpQuestionGenerator {
    http: Client,
    endpoint: Url,
}

impl HttpQuestionGenerator {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, GenerationError> {
        Ok(Self {
            http: http_client(timeout)?,
            endpoint: service_endpoint(base_url, QUIZ_PATH)?,
        })
    }
}

/// Appends `path` to the base URL, keeping any path prefix the base already has.
pub fn service_endpoint(base_url: &Url, path: &str) -> Result<Url, GenerationError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .map_err(|e| GenerationError::Transport(e.to_string()))
}

/// HTTP client shared by the generation collaborators.
pub fn http_client(timeout: Duration) -> Result<Client, GenerationError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("legal-portal/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| GenerationError::Transport(e.to_string()))
}

#[async_trait]
impl QuestionGenerator for HttpQuestionGenerator {
    async fn generate(&self, topic: LegalTopic) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        tracing::info!(%topic, endpoint = %self.endpoint, "requesting quiz questions");

        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&GenerateRequest { topic })
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

        let payload = res
            .json::<GenerateResponse>()
            .await
            .map_err(|e| GenerationError::Serde(e.to_string()))?;

        validate_questions(&payload.questions)?;
        Ok(payload.questions)
    }
}

pub(crate) fn map_reqwest_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Transport(e.to_string())
    }
}
