use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::routes::upload::read_upload;
use crate::screening::recovery::ResumeAnalysis;
use crate::state::AppState;

/// POST /api/v1/resume-screenings
///
/// Multipart field `resume` (PDF or DOCX). The upload is analyzed in memory and discarded.
pub async fn handle_screen_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let upload = read_upload(multipart, "resume").await?;
    info!(
        "Screening '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );

    let analysis = state
        .analyzer
        .analyze(upload.bytes.clone(), upload.extension())
        .await?;

    Ok(Json(analysis))
}
