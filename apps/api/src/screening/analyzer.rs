//! Resume Screening: the composition root for ATS-style analysis.
//!
//! Flow: extract text → re-check length → build prompt → one model call →
//! JSON parse (with brace recovery) → required-field validation.
//! Every failure ends the request; nothing is retried.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::{DocumentTextExtractor, ExtractError};
use crate::llm_client::ChatModel;
use crate::screening::prompts::build_screening_prompt;
use crate::screening::recovery::{recover_analysis, RecoveryError, ResumeAnalysis};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Insufficient text extracted ({chars} characters)")]
    InsufficientText { chars: usize },

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    #[error("Incomplete analysis, missing: {}", .missing.join(", "))]
    IncompleteAnalysis { missing: Vec<&'static str> },
}

impl From<ExtractError> for AnalysisError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat(ext) => AnalysisError::UnsupportedFormat(ext),
            ExtractError::InsufficientText { chars } => AnalysisError::InsufficientText { chars },
            ExtractError::ExtractionFailed(msg) => AnalysisError::ExtractionFailed(msg),
        }
    }
}

impl From<RecoveryError> for AnalysisError {
    fn from(err: RecoveryError) -> Self {
        match err {
            RecoveryError::Incomplete(missing) => AnalysisError::IncompleteAnalysis { missing },
            other => AnalysisError::MalformedModelOutput(other.to_string()),
        }
    }
}

pub struct ResumeAnalyzer {
    extractor: Arc<DocumentTextExtractor>,
    model: Arc<dyn ChatModel>,
}

impl ResumeAnalyzer {
    pub fn new(extractor: Arc<DocumentTextExtractor>, model: Arc<dyn ChatModel>) -> Self {
        Self { extractor, model }
    }

    pub async fn analyze(
        &self,
        bytes: Bytes,
        declared_extension: &str,
    ) -> Result<ResumeAnalysis, AnalysisError> {
        // Step 1: Extract
        let extracted = self.extractor.extract(bytes, declared_extension).await?;

        // Step 2: Extractors may "succeed" with whitespace or a handful of glyphs
        let chars = extracted.trimmed_len();
        if chars < self.extractor.min_chars() {
            return Err(AnalysisError::InsufficientText { chars });
        }

        // Step 3-4: Prompt and a single model call
        let prompt = build_screening_prompt(&extracted.text);
        let reply = self
            .model
            .complete(&prompt, None)
            .await
            .map_err(|e| AnalysisError::ModelInvocation(e.to_string()))?;
        info!(
            "Screening reply from {}: {} chars",
            self.model.model_id(),
            reply.len()
        );

        // Step 5-7: Parse, recover, validate
        let analysis = recover_analysis(&reply).map_err(|e| {
            warn!("Rejected screening reply: {e}");
            AnalysisError::from(e)
        })?;

        if !analysis.scores_in_range() {
            warn!(
                "Model returned out-of-range scores (ats={}, overall={}); passing through",
                analysis.ats_score, analysis.overall_score
            );
        }

        Ok(analysis)
    }
}
