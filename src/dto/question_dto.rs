use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

use crate::models::question::{CodingExample, McqOption, Question};

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionListQuery {
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct UserQuestionStatus {
    pub attempted: bool,
    pub correct: bool,
}

/// Listing payload: the question without its solution fields, enriched
/// with the caller's own attempt status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub question_type: String,
    pub title: String,
    pub description: String,
    pub topic: String,
    pub difficulty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starter_code: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub total_attempts: i32,
    pub correct_attempts: i32,
    pub success_rate: i32,
    pub created_at: DateTime<Utc>,
    pub user_status: UserQuestionStatus,
}

impl QuestionSummary {
    pub fn from_question(q: &Question, user_status: UserQuestionStatus) -> Self {
        Self {
            id: q.id,
            question_type: q.question_type.clone(),
            title: q.title.clone(),
            description: q.description.clone(),
            topic: q.topic.clone(),
            difficulty: q.difficulty.clone(),
            options: q.options.clone(),
            correct_answer: q.correct_answer.clone(),
            examples: q.examples.clone(),
            constraints: q.constraints.clone(),
            starter_code: q.starter_code.clone(),
            hints: q.hints.clone(),
            tags: q.tags.clone(),
            total_attempts: q.total_attempts,
            correct_attempts: q.correct_attempts,
            success_rate: q.success_rate(),
            created_at: q.created_at,
            user_status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListQuestionsResponse {
    pub data: Vec<QuestionSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TopicProgress {
    pub attempted: i64,
    pub correct: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    pub topic: String,
    pub total: i64,
    pub easy: i64,
    pub medium: i64,
    pub hard: i64,
    pub mcq: i64,
    pub coding: i64,
    pub user_progress: TopicProgress,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1))]
    pub selected_answer: String,
    pub time_taken: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub streak: i32,
    pub total_questions_attempted: i32,
    pub total_correct: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    pub is_correct: bool,
    pub recorded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_stats: Option<UserStats>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[serde(rename = "type")]
    pub question_type: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub topic: String,
    pub difficulty: String,
    pub options: Option<Vec<McqOption>>,
    pub correct_answer: Option<String>,
    pub examples: Option<Vec<CodingExample>>,
    pub constraints: Option<Vec<String>>,
    pub starter_code: Option<JsonValue>,
    pub solution: Option<JsonValue>,
    #[validate(length(max = 2000))]
    pub solution_explanation: Option<String>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
    pub hints: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub options: Option<Vec<McqOption>>,
    pub correct_answer: Option<String>,
    pub examples: Option<Vec<CodingExample>>,
    pub constraints: Option<Vec<String>>,
    pub starter_code: Option<JsonValue>,
    pub solution: Option<JsonValue>,
    #[validate(length(max = 2000))]
    pub solution_explanation: Option<String>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
    pub hints: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::test_fixtures::mcq_question;

    #[test]
    fn summary_never_carries_solution_fields() {
        let q = mcq_question();
        let summary = QuestionSummary::from_question(&q, UserQuestionStatus::default());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("solution"));
        assert!(!json.contains("solutionExplanation"));
        assert!(json.contains("userStatus"));
    }
}
