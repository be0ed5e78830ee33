use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

pub const TYPE_MCQ: &str = "mcq";
pub const TYPE_CODING: &str = "coding";

pub const DIFFICULTIES: [&str; 3] = ["Easy", "Medium", "Hard"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub question_type: String,
    pub title: String,
    pub description: String,
    pub topic: String,
    pub difficulty: String,
    /// MCQ choices as `[{ "label": "A", "text": "..." }]`.
    pub options: Option<JsonValue>,
    pub correct_answer: Option<String>,
    /// Coding samples as `[{ "input", "output", "explanation" }]`.
    pub examples: Option<JsonValue>,
    pub constraints: Option<Vec<String>>,
    pub starter_code: Option<JsonValue>,
    pub solution: Option<JsonValue>,
    pub solution_explanation: Option<String>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
    pub hints: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub total_attempts: i32,
    pub correct_attempts: i32,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    /// Share of correct attempts in percent; 0 before the first attempt.
    pub fn success_rate(&self) -> i32 {
        if self.total_attempts == 0 {
            return 0;
        }
        ((self.correct_attempts as f64 / self.total_attempts as f64) * 100.0).round() as i32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McqOption {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodingExample {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_guards_division_by_zero() {
        let q = test_fixtures::mcq_question();
        assert_eq!(q.success_rate(), 0);
    }

    #[test]
    fn success_rate_rounds_half_up() {
        let mut q = test_fixtures::mcq_question();
        q.total_attempts = 8;
        q.correct_attempts = 3;
        assert_eq!(q.success_rate(), 38);
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;

    pub fn mcq_question() -> Question {
        Question {
            id: Uuid::new_v4(),
            question_type: TYPE_MCQ.to_string(),
            title: "What does Box<T> allocate?".to_string(),
            description: "Pick the correct statement.".to_string(),
            topic: "DSA".to_string(),
            difficulty: "Easy".to_string(),
            options: Some(serde_json::json!([
                { "label": "A", "text": "Stack memory" },
                { "label": "B", "text": "Heap memory" }
            ])),
            correct_answer: Some("B".to_string()),
            examples: None,
            constraints: None,
            starter_code: None,
            solution: Some(serde_json::json!({ "javascript": "// n/a" })),
            solution_explanation: Some("Box always heap-allocates its value.".to_string()),
            time_complexity: None,
            space_complexity: None,
            hints: None,
            tags: Some(vec!["memory".to_string()]),
            total_attempts: 0,
            correct_attempts: 0,
            is_active: true,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
