pub mod health;
pub mod upload;

use axum::{
    routing::{get, post},
    Router,
};

use crate::questions::handlers as questions;
use crate::screening::handlers as screening;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume screening
        .route(
            "/api/v1/resume-screenings",
            post(screening::handle_screen_resume),
        )
        // Question generation
        .route("/api/v1/questions", post(questions::handle_save_question_set))
        .route(
            "/api/v1/questions/generate",
            post(questions::handle_generate_questions),
        )
        .route(
            "/api/v1/questions/generate-from-resume",
            post(questions::handle_generate_from_resume),
        )
        .route(
            "/api/v1/questions/user/:user_id",
            get(questions::handle_list_question_sets),
        )
        .route(
            "/api/v1/questions/user/:user_id/recent",
            get(questions::handle_recent_question_sets),
        )
        .route("/api/v1/questions/:id", get(questions::handle_get_question_set))
        .with_state(state)
}
