use std::sync::Arc;

use sqlx::PgPool;

use crate::extraction::DocumentTextExtractor;
use crate::llm_client::ChatModel;
use crate::screening::analyzer::ResumeAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Chat model used for question generation. Screening holds its own handle.
    pub llm: Arc<dyn ChatModel>,
    pub extractor: Arc<DocumentTextExtractor>,
    pub analyzer: Arc<ResumeAnalyzer>,
}
