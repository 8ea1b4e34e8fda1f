// src/config.rs

use std::{env, net::SocketAddr, time::Duration};

use dotenvy::dotenv;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,

    /// Base URL of the generation service serving `/api/quiz` and `/api/tips`.
    pub question_api_url: Url,
    pub question_api_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let rust_log = var("RUST_LOG")
            .unwrap_or_else(|| "info".to_string());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .expect("BIND_ADDR must be a socket address");

        // No default: this server does not serve /api/quiz itself.
        let question_api_url = var("QUESTION_API_URL")
            .expect("QUESTION_API_URL must be set")
            .parse()
            .expect("QUESTION_API_URL must be a valid URL");

        // The generation route may run for up to 59 seconds.
        let question_api_timeout = var("QUESTION_API_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(59));

        Self {
            database_url,
            jwt_secret,
            rust_log,
            bind_addr,
            question_api_url,
            question_api_timeout,
        }
    }
}
