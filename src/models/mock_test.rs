use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in-progress";
pub const STATUS_COMPLETED: &str = "completed";
/// Declared terminal state; no operation currently sets it (see DESIGN.md).
pub const STATUS_ABANDONED: &str = "abandoned";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MockTest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub topic: String,
    pub difficulty: String,
    pub duration_minutes: i32,
    /// Ordered embedded result list; see [`MockTestEntry`].
    pub questions: JsonValue,
    pub status: String,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub accuracy: i32,
    pub time_taken: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One element of the embedded per-question result list. Blank until the
/// test is submitted, then frozen with the graded outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MockTestEntry {
    pub question_id: Uuid,
    pub selected_answer: Option<String>,
    pub is_correct: bool,
    pub time_taken: i32,
}

impl MockTestEntry {
    pub fn unanswered(question_id: Uuid) -> Self {
        Self {
            question_id,
            selected_answer: None,
            is_correct: false,
            time_taken: 0,
        }
    }
}

impl MockTest {
    pub fn entries(&self) -> Vec<MockTestEntry> {
        serde_json::from_value(self.questions.clone()).unwrap_or_default()
    }

    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_round_trips_through_camel_case_json() {
        let entry = MockTestEntry::unanswered(Uuid::new_v4());
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("questionId").is_some());
        assert!(json.get("selectedAnswer").is_some());
        assert!(json.get("isCorrect").is_some());
        let back: MockTestEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
