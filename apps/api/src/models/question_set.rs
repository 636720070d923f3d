use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted batch of generated questions. `questions` holds the
/// `GeneratedQuestion` array in generation order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub instructions: String,
    pub questions: Value,
    pub created_at: DateTime<Utc>,
}
