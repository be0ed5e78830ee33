use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MODE_PRACTICE: &str = "practice";
pub const MODE_MOCK: &str = "mock";

/// One immutable record of a single question submission outcome. Created
/// once by the attempt recorder, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub selected_answer: Option<String>,
    pub is_correct: bool,
    pub time_taken: i32,
    pub mock_test_id: Option<Uuid>,
    pub mode: String,
    pub created_at: DateTime<Utc>,
}
