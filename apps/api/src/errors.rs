use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractError;
use crate::llm_client::LlmError;
use crate::screening::analyzer::AnalysisError;

const UNSUPPORTED_FORMAT_MESSAGE: &str = "Unsupported file format. Please upload PDF or DOCX.";
const INSUFFICIENT_TEXT_MESSAGE: &str = "Failed to extract sufficient text from resume. \
    Please upload a text-based or higher-quality scanned PDF.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Insufficient text: {0} characters")]
    InsufficientText(usize),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Invalid AI response: {0}")]
    InvalidAiResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat(ext) => AppError::UnsupportedFormat(ext),
            ExtractError::InsufficientText { chars } => AppError::InsufficientText(chars),
            ExtractError::ExtractionFailed(msg) => AppError::UnprocessableEntity(msg),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::UnsupportedFormat(ext) => AppError::UnsupportedFormat(ext),
            AnalysisError::InsufficientText { chars } => AppError::InsufficientText(chars),
            AnalysisError::ExtractionFailed(msg) => AppError::UnprocessableEntity(msg),
            AnalysisError::ModelInvocation(msg) => AppError::Llm(msg),
            err @ (AnalysisError::MalformedModelOutput(_)
            | AnalysisError::IncompleteAnalysis { .. }) => {
                AppError::InvalidAiResponse(err.to_string())
            }
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(ext) => {
                tracing::info!("Rejected upload with extension '{ext}'");
                (
                    StatusCode::BAD_REQUEST,
                    "UNSUPPORTED_FORMAT",
                    UNSUPPORTED_FORMAT_MESSAGE.to_string(),
                )
            }
            AppError::InsufficientText(chars) => {
                tracing::info!("Rejected upload with {chars} usable characters");
                (
                    StatusCode::BAD_REQUEST,
                    "INSUFFICIENT_TEXT",
                    INSUFFICIENT_TEXT_MESSAGE.to_string(),
                )
            }
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The AI service could not be reached. Please try again.".to_string(),
                )
            }
            AppError::InvalidAiResponse(msg) => {
                tracing::error!("Invalid AI response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "INVALID_AI_RESPONSE",
                    "The AI returned an unusable analysis. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
