//! Question Generation: prompt building + model call + parsing.
//!
//! Flow: build prompt → one model call → `parse_questions` with the requested
//! type/difficulty as defaults. Persistence is left to the handlers.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::llm_client::{ChatModel, LlmError};
use crate::questions::parser::{parse_questions, GeneratedQuestion};
use crate::questions::prompts::{
    MANUAL_QUESTIONS_PROMPT_TEMPLATE, OPTIONS_FORMAT_LINE, RESUME_QUESTIONS_PROMPT_TEMPLATE,
};

pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const DEFAULT_DIFFICULTY: &str = "Medium";
pub const DEFAULT_QUESTION_TYPE: &str = "Multiple Choice";
pub const DEFAULT_INTERVIEW_TYPE: &str = "Technical";
pub const DEFAULT_JOB_ROLE: &str = "general";
pub const DEFAULT_TOPIC: &str = "General";
pub const RESUME_TOPIC: &str = "Resume-Based Interview";
/// Resume text beyond this many characters is cut from the question prompt.
pub const RESUME_PROMPT_CHAR_LIMIT: usize = 10_000;

/// Request body for manual question generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualQuestionsRequest {
    pub user_id: Uuid,
    pub instructions: String,
    pub job_role: Option<String>,
    pub difficulty: Option<String>,
    pub question_type: Option<String>,
    pub number_of_questions: Option<u32>,
}

impl ManualQuestionsRequest {
    pub fn question_type(&self) -> &str {
        non_blank(&self.question_type).unwrap_or(DEFAULT_QUESTION_TYPE)
    }

    pub fn difficulty(&self) -> &str {
        non_blank(&self.difficulty).unwrap_or(DEFAULT_DIFFICULTY)
    }

    /// Topic stored with the generated set.
    pub fn topic(&self) -> &str {
        non_blank(&self.job_role).unwrap_or(DEFAULT_TOPIC)
    }
}

/// Settings for resume-based interview questions.
#[derive(Debug, Clone)]
pub struct ResumeQuestionsRequest {
    pub user_id: Uuid,
    pub interview_type: Option<String>,
    pub difficulty: Option<String>,
    pub number_of_questions: Option<u32>,
}

impl ResumeQuestionsRequest {
    pub fn interview_type(&self) -> &str {
        non_blank(&self.interview_type).unwrap_or(DEFAULT_INTERVIEW_TYPE)
    }

    pub fn difficulty(&self) -> &str {
        non_blank(&self.difficulty).unwrap_or(DEFAULT_DIFFICULTY)
    }

    /// Instructions string stored with the generated set.
    pub fn instructions(&self) -> String {
        format!(
            "Interview Type: {}, Difficulty: {}",
            self.interview_type(),
            self.difficulty()
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn build_manual_prompt(request: &ManualQuestionsRequest) -> String {
    let question_type = request.question_type();
    let options_line = if question_type == DEFAULT_QUESTION_TYPE {
        OPTIONS_FORMAT_LINE
    } else {
        ""
    };

    MANUAL_QUESTIONS_PROMPT_TEMPLATE
        .replace(
            "{count}",
            &request
                .number_of_questions
                .unwrap_or(DEFAULT_QUESTION_COUNT)
                .to_string(),
        )
        .replace("{question_type}", question_type)
        .replace(
            "{job_role}",
            non_blank(&request.job_role).unwrap_or(DEFAULT_JOB_ROLE),
        )
        .replace("{difficulty}", request.difficulty())
        .replace("{options_line}", options_line)
        .replace("{instructions}", request.instructions.trim())
}

pub fn build_resume_prompt(request: &ResumeQuestionsRequest, resume_text: &str) -> String {
    RESUME_QUESTIONS_PROMPT_TEMPLATE
        .replace(
            "{count}",
            &request
                .number_of_questions
                .unwrap_or(DEFAULT_QUESTION_COUNT)
                .to_string(),
        )
        .replace("{interview_type}", request.interview_type())
        .replace("{difficulty}", request.difficulty())
        .replace(
            "{resume_text}",
            truncate_chars(resume_text, RESUME_PROMPT_CHAR_LIMIT),
        )
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Sends `prompt` once and parses the completion.
///
/// An empty completion yields an empty list; transport and API failures are errors.
pub async fn generate_questions(
    model: &dyn ChatModel,
    prompt: &str,
    default_type: &str,
    default_difficulty: &str,
) -> Result<Vec<GeneratedQuestion>, LlmError> {
    let generated_text = match model.complete(prompt, None).await {
        Ok(text) => text,
        Err(LlmError::EmptyContent) => String::new(),
        Err(e) => return Err(e),
    };
    info!(
        "Question completion received from {}: {} chars",
        model.model_id(),
        generated_text.len()
    );

    Ok(parse_questions(
        &generated_text,
        default_type,
        default_difficulty,
    ))
}
