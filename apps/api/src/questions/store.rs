use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::question_set::QuestionSetRow;
use crate::questions::parser::GeneratedQuestion;

/// Number of sets returned by the "recent" listing.
pub const RECENT_LIMIT: i64 = 5;

pub struct NewQuestionSet<'a> {
    pub user_id: Uuid,
    pub topic: &'a str,
    pub instructions: &'a str,
    pub questions: &'a [GeneratedQuestion],
}

pub async fn insert_question_set(pool: &PgPool, set: NewQuestionSet<'_>) -> Result<QuestionSetRow> {
    let questions =
        serde_json::to_value(set.questions).context("Failed to serialize generated questions")?;

    let row = sqlx::query_as::<_, QuestionSetRow>(
        r#"
        INSERT INTO question_sets (id, user_id, topic, instructions, questions)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(set.user_id)
    .bind(set.topic)
    .bind(set.instructions)
    .bind(&questions)
    .fetch_one(pool)
    .await?;

    info!(
        "Saved question set {} ({} questions) for user {}",
        row.id,
        set.questions.len(),
        set.user_id
    );
    Ok(row)
}

/// Sets for a user, newest first. `limit = None` returns all of them.
pub async fn list_question_sets(
    pool: &PgPool,
    user_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<QuestionSetRow>> {
    let rows = sqlx::query_as::<_, QuestionSetRow>(
        r#"
        SELECT * FROM question_sets
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_question_set(pool: &PgPool, id: Uuid) -> Result<Option<QuestionSetRow>> {
    let row = sqlx::query_as::<_, QuestionSetRow>("SELECT * FROM question_sets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
