use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub total_attempts: i64,
    pub correct_attempts: i64,
    pub accuracy: i32,
    pub total_tests: i64,
    pub avg_test_score: i32,
    pub best_test_score: i32,
    pub streak: i32,
    pub weekly_attempts: i64,
    pub total_sessions: i32,
    pub member_since: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicBreakdownEntry {
    pub topic: String,
    pub attempted: i64,
    pub correct: i64,
    pub accuracy: i32,
    pub avg_time: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub date: String,
    pub count: i64,
    pub correct: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TestHistoryEntry {
    pub id: Uuid,
    pub title: String,
    pub topic: String,
    pub score: i32,
    pub accuracy: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub time_taken: i32,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DifficultyBreakdownEntry {
    pub difficulty: String,
    pub attempted: i64,
    pub correct: i64,
}
