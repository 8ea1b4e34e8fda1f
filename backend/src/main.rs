// src/main.rs

use std::{sync::Arc, time::Duration};

use dotenvy::dotenv;
use legal_portal::config::Config;
use legal_portal::routes;
use legal_portal::services::{
    daily_quiz::DailyQuizCoordinator, profile_store::PgProfileStore, profiles::ProfileService,
    question_generator::HttpQuestionGenerator, quiz_store::PgQuizStore,
    tips_generator::HttpTipsGenerator,
};
use legal_portal::state::AppState;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    let generator =
        HttpQuestionGenerator::new(&config.question_api_url, config.question_api_timeout)
            .expect("Failed to build question generation client");

    let quiz = DailyQuizCoordinator::new(
        Arc::new(PgQuizStore::new(pool.clone())),
        Arc::new(generator),
    );

    let tips = HttpTipsGenerator::new(&config.question_api_url, config.question_api_timeout)
        .expect("Failed to build tips generation client");

    let profiles = ProfileService::new(
        Arc::new(PgProfileStore::new(pool.clone())),
        Arc::new(tips),
    );

    let state = AppState {
        pool,
        config: config.clone(),
        quiz,
        profiles,
    };

    let app = routes::create_router(state);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listening address");

    axum::serve(listener, app).await.expect("Server error");
}
