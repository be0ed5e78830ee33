use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub total_sessions: i32,
    pub last_active: Option<DateTime<Utc>>,
    pub total_questions_attempted: i32,
    pub total_correct: i32,
    pub total_mock_tests: i32,
    pub streak: i32,
    pub last_study_date: Option<NaiveDate>,
    /// Per-topic `{ "attempted": n, "correct": n }` map, maintained by the
    /// attempt recorder.
    pub topic_progress: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Lifetime answer accuracy in percent; 0 before the first attempt.
    pub fn accuracy(&self) -> i32 {
        if self.total_questions_attempted == 0 {
            return 0;
        }
        ((self.total_correct as f64 / self.total_questions_attempted as f64) * 100.0).round()
            as i32
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::user;

    #[test]
    fn accuracy_is_zero_without_attempts() {
        assert_eq!(user().accuracy(), 0);
    }

    #[test]
    fn accuracy_rounds_to_nearest_percent() {
        let mut u = user();
        u.total_questions_attempted = 3;
        u.total_correct = 2;
        assert_eq!(u.accuracy(), 67);
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let mut u = user();
        u.password_hash = "argon2-secret".to_string();
        let json = serde_json::to_string(&u).unwrap();
        assert!(!json.contains("argon2-secret"));
        assert!(!json.contains("password_hash"));
    }
}
