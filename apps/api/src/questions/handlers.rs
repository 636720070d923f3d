//! Axum route handlers for the Questions API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::question_set::QuestionSetRow;
use crate::questions::generator::{
    build_manual_prompt, build_resume_prompt, generate_questions, ManualQuestionsRequest,
    ResumeQuestionsRequest, DEFAULT_TOPIC, RESUME_TOPIC,
};
use crate::questions::parser::GeneratedQuestion;
use crate::questions::store::{
    get_question_set, insert_question_set, list_question_sets, NewQuestionSet, RECENT_LIMIT,
};
use crate::routes::upload::{read_upload, ResumeUpload};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveQuestionSetRequest {
    pub user_id: Uuid,
    pub topic: Option<String>,
    #[serde(default)]
    pub instructions: String,
    pub questions: Vec<GeneratedQuestion>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/questions/generate
///
/// Generates questions from free-form instructions and persists them as a set.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<ManualQuestionsRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    if request.instructions.trim().is_empty() {
        return Err(AppError::Validation(
            "instructions cannot be empty".to_string(),
        ));
    }
    validate_count(request.number_of_questions)?;

    let prompt = build_manual_prompt(&request);
    let questions = generate_questions(
        state.llm.as_ref(),
        &prompt,
        request.question_type(),
        request.difficulty(),
    )
    .await?;

    insert_question_set(
        &state.db,
        NewQuestionSet {
            user_id: request.user_id,
            topic: request.topic(),
            instructions: &request.instructions,
            questions: &questions,
        },
    )
    .await?;

    Ok(Json(QuestionsResponse { questions }))
}

/// POST /api/v1/questions/generate-from-resume
///
/// Multipart: `resume` file plus `userId`, `interviewType`, `difficulty`,
/// `numberOfQuestions`. Questions carry a `basedOn` reference to the resume.
pub async fn handle_generate_from_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<QuestionsResponse>, AppError> {
    let upload = read_upload(multipart, "resume").await?;
    let request = resume_request_from_upload(&upload)?;

    let extracted = state
        .extractor
        .extract(upload.bytes.clone(), upload.extension())
        .await?;
    let chars = extracted.trimmed_len();
    if chars < state.extractor.min_chars() {
        return Err(AppError::InsufficientText(chars));
    }

    let prompt = build_resume_prompt(&request, &extracted.text);
    let questions = generate_questions(
        state.llm.as_ref(),
        &prompt,
        request.interview_type(),
        request.difficulty(),
    )
    .await?;

    let instructions = request.instructions();
    insert_question_set(
        &state.db,
        NewQuestionSet {
            user_id: request.user_id,
            topic: RESUME_TOPIC,
            instructions: &instructions,
            questions: &questions,
        },
    )
    .await?;

    Ok(Json(QuestionsResponse { questions }))
}

/// POST /api/v1/questions
pub async fn handle_save_question_set(
    State(state): State<AppState>,
    Json(request): Json<SaveQuestionSetRequest>,
) -> Result<(StatusCode, Json<QuestionSetRow>), AppError> {
    validate_saved_questions(&request.questions)?;

    let topic = request
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TOPIC);

    let row = insert_question_set(
        &state.db,
        NewQuestionSet {
            user_id: request.user_id,
            topic,
            instructions: &request.instructions,
            questions: &request.questions,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/questions/user/:user_id
pub async fn handle_list_question_sets(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<QuestionSetRow>>, AppError> {
    let rows = list_question_sets(&state.db, user_id, None).await?;
    Ok(Json(rows))
}

/// GET /api/v1/questions/user/:user_id/recent
pub async fn handle_recent_question_sets(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<QuestionSetRow>>, AppError> {
    let rows = list_question_sets(&state.db, user_id, Some(RECENT_LIMIT)).await?;
    Ok(Json(rows))
}

/// GET /api/v1/questions/:id
pub async fn handle_get_question_set(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionSetRow>, AppError> {
    let row = get_question_set(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question set {id} not found")))?;
    Ok(Json(row))
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn validate_count(count: Option<u32>) -> Result<(), AppError> {
    match count {
        Some(0) => Err(AppError::Validation(
            "numberOfQuestions must be at least 1".to_string(),
        )),
        _ => Ok(()),
    }
}

fn resume_request_from_upload(upload: &ResumeUpload) -> Result<ResumeQuestionsRequest, AppError> {
    let user_id = upload
        .field("userId")
        .ok_or_else(|| AppError::Validation("userId is required".to_string()))?;
    let user_id = Uuid::parse_str(user_id)
        .map_err(|_| AppError::Validation(format!("Invalid userId '{user_id}'")))?;

    let number_of_questions = upload
        .field("numberOfQuestions")
        .map(|n| {
            n.parse::<u32>().map_err(|_| {
                AppError::Validation(format!("Invalid numberOfQuestions '{n}'"))
            })
        })
        .transpose()?;
    validate_count(number_of_questions)?;

    Ok(ResumeQuestionsRequest {
        user_id,
        interview_type: upload.field("interviewType").map(str::to_string),
        difficulty: upload.field("difficulty").map(str::to_string),
        number_of_questions,
    })
}

fn validate_saved_questions(questions: &[GeneratedQuestion]) -> Result<(), AppError> {
    if questions.is_empty() {
        return Err(AppError::Validation(
            "questions cannot be empty".to_string(),
        ));
    }
    if let Some(index) = questions.iter().position(|q| q.question.trim().is_empty()) {
        return Err(AppError::Validation(format!(
            "questions[{index}] has empty question text"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;

    use super::*;

    fn upload(fields: &[(&str, &str)]) -> ResumeUpload {
        ResumeUpload {
            file_name: "resume.pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4"),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn question(text: &str) -> GeneratedQuestion {
        GeneratedQuestion {
            question: text.to_string(),
            question_type: "Open-ended".to_string(),
            difficulty: "Medium".to_string(),
            options: vec![],
            based_on: None,
        }
    }

    const USER: &str = "6f1c2f8e-9a4b-4c1d-8a57-0f2a3b4c5d6e";

    #[test]
    fn test_resume_request_defaults_when_fields_absent() {
        let request = resume_request_from_upload(&upload(&[("userId", USER)])).unwrap();
        assert_eq!(request.user_id.to_string(), USER);
        assert_eq!(request.interview_type(), "Technical");
        assert_eq!(request.difficulty(), "Medium");
        assert_eq!(request.number_of_questions, None);
        assert_eq!(request.instructions(), "Interview Type: Technical, Difficulty: Medium");
    }

    #[test]
    fn test_resume_request_reads_supplied_fields() {
        let request = resume_request_from_upload(&upload(&[
            ("userId", USER),
            ("interviewType", "Behavioral"),
            ("difficulty", "Hard"),
            ("numberOfQuestions", "8"),
        ]))
        .unwrap();
        assert_eq!(request.interview_type(), "Behavioral");
        assert_eq!(request.difficulty(), "Hard");
        assert_eq!(request.number_of_questions, Some(8));
    }

    #[test]
    fn test_resume_request_rejects_bad_user_and_count() {
        assert!(matches!(
            resume_request_from_upload(&upload(&[])),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            resume_request_from_upload(&upload(&[("userId", "not-a-uuid")])),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            resume_request_from_upload(&upload(&[("userId", USER), ("numberOfQuestions", "five")])),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            resume_request_from_upload(&upload(&[("userId", USER), ("numberOfQuestions", "0")])),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_saved_sets_need_non_empty_questions() {
        assert!(validate_saved_questions(&[question("What is ownership?")]).is_ok());
        assert!(matches!(
            validate_saved_questions(&[]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_saved_questions(&[question("Q1"), question("   ")]),
            Err(AppError::Validation(ref m)) if m.contains("questions[1]")
        ));
    }

    #[test]
    fn test_save_request_deserializes_client_payload() {
        let request: SaveQuestionSetRequest = serde_json::from_value(serde_json::json!({
            "userId": USER,
            "topic": "Rust",
            "questions": [{
                "question": "Explain borrowing.",
                "type": "Open-ended",
                "difficulty": "Easy"
            }]
        }))
        .unwrap();
        assert_eq!(request.instructions, "");
        assert_eq!(request.questions[0].question_type, "Open-ended");
        assert!(request.questions[0].options.is_empty());
    }

    #[test]
    fn test_manual_request_uses_camel_case_keys() {
        let request: ManualQuestionsRequest = serde_json::from_value(serde_json::json!({
            "userId": USER,
            "instructions": "Focus on tokio",
            "jobRole": "Backend Engineer",
            "questionType": "Open-ended",
            "numberOfQuestions": 3
        }))
        .unwrap();
        assert_eq!(request.topic(), "Backend Engineer");
        assert_eq!(request.question_type(), "Open-ended");
        assert_eq!(request.number_of_questions, Some(3));

        let snake = serde_json::from_value::<ManualQuestionsRequest>(serde_json::json!({
            "user_id": USER,
            "instructions": "Focus on tokio"
        }));
        assert!(snake.is_err());
    }
}
