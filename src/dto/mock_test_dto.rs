use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::mock_test::MockTestEntry;
use crate::models::question::Question;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMockTestRequest {
    /// `"Mixed"` or absent means no topic filter.
    pub topic: Option<String>,
    /// `"Mixed"` or absent means no difficulty filter.
    pub difficulty: Option<String>,
    #[validate(range(min = 1, max = 50))]
    pub count: Option<i64>,
    /// Test length in minutes, enforced client-side.
    #[validate(range(min = 1, max = 240))]
    pub duration: Option<i32>,
}

/// Question payload handed out while a test is live: no correct answer, no
/// solution, no explanation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedQuestion {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub question_type: String,
    pub title: String,
    pub description: String,
    pub topic: String,
    pub difficulty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub options: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl From<&Question> for SanitizedQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question_type: q.question_type.clone(),
            title: q.title.clone(),
            description: q.description.clone(),
            topic: q.topic.clone(),
            difficulty: q.difficulty.clone(),
            options: q.options.clone(),
            hints: q.hints.clone(),
            tags: q.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMockTestResponse {
    pub test_id: Uuid,
    pub title: String,
    pub duration: i32,
    pub total_questions: i32,
    pub questions: Vec<SanitizedQuestion>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StartMockTestResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: Uuid,
    pub selected_answer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMockTestRequest {
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,
    /// Client-reported elapsed seconds; trusted as-is.
    pub time_taken: Option<i32>,
}

/// Question payload in a result breakdown. Correct answer and explanation
/// are present only once the test is completed.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultQuestion {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub question_type: String,
    pub title: String,
    pub description: String,
    pub topic: String,
    pub difficulty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub options: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl ResultQuestion {
    pub fn revealed(q: &Question) -> Self {
        Self {
            id: q.id,
            question_type: q.question_type.clone(),
            title: q.title.clone(),
            description: q.description.clone(),
            topic: q.topic.clone(),
            difficulty: q.difficulty.clone(),
            options: q.options.clone(),
            correct_answer: q.correct_answer.clone(),
            explanation: q.solution_explanation.clone(),
        }
    }

    pub fn concealed(q: &Question) -> Self {
        Self {
            correct_answer: None,
            explanation: None,
            ..Self::revealed(q)
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MockTestQuestionResult {
    pub question: Option<ResultQuestion>,
    pub selected_answer: Option<String>,
    pub is_correct: bool,
    pub time_taken: i32,
}

impl MockTestQuestionResult {
    pub fn new(entry: &MockTestEntry, question: Option<ResultQuestion>) -> Self {
        Self {
            question,
            selected_answer: entry.selected_answer.clone(),
            is_correct: entry.is_correct,
            time_taken: entry.time_taken,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMockTestResponse {
    pub test_id: Uuid,
    pub score: i32,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub time_taken: i32,
    pub questions: Vec<MockTestQuestionResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListMockTestsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Listing row; the embedded question payload is intentionally left out.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MockTestSummary {
    pub id: Uuid,
    pub title: String,
    pub topic: String,
    pub difficulty: String,
    #[serde(rename = "duration")]
    pub duration_minutes: i32,
    pub status: String,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub accuracy: i32,
    pub time_taken: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListMockTestsResponse {
    pub data: Vec<MockTestSummary>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MockTestDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub topic: String,
    pub difficulty: String,
    pub duration: i32,
    pub status: String,
    pub score: i32,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub accuracy: i32,
    pub time_taken: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<MockTestQuestionResult>,
}
