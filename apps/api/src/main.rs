mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod questions;
mod routes;
mod screening;
mod state;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::DocumentTextExtractor;
use crate::llm_client::{ChatModel, LlmClient};
use crate::routes::build_router;
use crate::screening::analyzer::ResumeAnalyzer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting NavAI API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs pending migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm: Arc<dyn ChatModel> = Arc::new(LlmClient::new(config.llm_config())?);
    info!("LLM client initialized (model: {})", llm.model_id());

    // Document extraction: pdf-extract text layer, pdftoppm + tesseract OCR, DOCX zip reader
    let extractor = Arc::new(
        DocumentTextExtractor::with_default_backends(config.ocr_options())
            .with_min_chars(config.min_text_chars),
    );
    info!(
        "Text extractor initialized (OCR language: {}, min chars: {})",
        config.ocr_language, config.min_text_chars
    );

    let analyzer = Arc::new(ResumeAnalyzer::new(extractor.clone(), llm.clone()));

    // Build app state
    let state = AppState {
        db,
        llm,
        extractor,
        analyzer,
    };

    // Build router
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
