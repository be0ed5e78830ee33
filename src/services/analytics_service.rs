use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::analytics_dto::{
    ActivityEntry, DifficultyBreakdownEntry, OverviewResponse, TestHistoryEntry,
    TopicBreakdownEntry,
};
use crate::error::{Error, Result};
use crate::models::mock_test::STATUS_COMPLETED;
use crate::models::user::User;

#[derive(Debug, FromRow)]
struct ScoreStatsRow {
    avg_score: Option<f64>,
    best_score: Option<i32>,
}

#[derive(Debug, FromRow)]
struct BreakdownRow {
    label: String,
    attempted: i64,
    correct: i64,
    avg_time: Option<f64>,
}

#[derive(Debug, FromRow)]
struct ActivityRow {
    day: String,
    count: i64,
    correct: i64,
}

/// Read-only aggregations over the attempt ledger and completed tests.
#[derive(Clone)]
pub struct AnalyticsService {
    pool: PgPool,
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn overview(&self, user_id: Uuid) -> Result<OverviewResponse> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

        let total_attempts: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attempts WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        let correct_attempts: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attempts WHERE user_id = $1 AND is_correct")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        let total_tests: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM mock_tests WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(STATUS_COMPLETED)
        .fetch_one(&self.pool)
        .await?;
        let stats = sqlx::query_as::<_, ScoreStatsRow>(
            "SELECT AVG(score)::float8 AS avg_score, MAX(score) AS best_score
             FROM mock_tests
             WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(STATUS_COMPLETED)
        .fetch_one(&self.pool)
        .await?;
        let weekly_attempts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attempts
             WHERE user_id = $1 AND created_at >= NOW() - INTERVAL '7 days'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let accuracy = if total_attempts > 0 {
            ((correct_attempts as f64 / total_attempts as f64) * 100.0).round() as i32
        } else {
            0
        };

        Ok(OverviewResponse {
            total_attempts,
            correct_attempts,
            accuracy,
            total_tests,
            avg_test_score: stats.avg_score.map(|v| v.round() as i32).unwrap_or(0),
            best_test_score: stats.best_score.unwrap_or(0),
            streak: user.streak,
            weekly_attempts,
            total_sessions: user.total_sessions,
            member_since: user.created_at,
        })
    }

    pub async fn topic_breakdown(&self, user_id: Uuid) -> Result<Vec<TopicBreakdownEntry>> {
        let rows = sqlx::query_as::<_, BreakdownRow>(
            "SELECT q.topic AS label,
                    COUNT(*) AS attempted,
                    COUNT(*) FILTER (WHERE a.is_correct) AS correct,
                    AVG(a.time_taken)::float8 AS avg_time
             FROM attempts a
             JOIN questions q ON q.id = a.question_id
             WHERE a.user_id = $1
             GROUP BY q.topic
             ORDER BY attempted DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TopicBreakdownEntry {
                accuracy: ratio_percent(row.correct, row.attempted),
                topic: row.label,
                attempted: row.attempted,
                correct: row.correct,
                avg_time: row.avg_time.unwrap_or(0.0),
            })
            .collect())
    }

    /// Daily attempt counts across the trailing 30 days.
    pub async fn activity(&self, user_id: Uuid) -> Result<Vec<ActivityEntry>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            "SELECT to_char(created_at, 'YYYY-MM-DD') AS day,
                    COUNT(*) AS count,
                    COUNT(*) FILTER (WHERE is_correct) AS correct
             FROM attempts
             WHERE user_id = $1 AND created_at >= NOW() - INTERVAL '30 days'
             GROUP BY day
             ORDER BY day",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ActivityEntry {
                date: row.day,
                count: row.count,
                correct: row.correct,
            })
            .collect())
    }

    pub async fn test_history(&self, user_id: Uuid) -> Result<Vec<TestHistoryEntry>> {
        let rows = sqlx::query_as::<_, TestHistoryEntry>(
            "SELECT id, title, topic, score, accuracy, total_questions, correct_answers,
                    time_taken, completed_at
             FROM mock_tests
             WHERE user_id = $1 AND status = $2
             ORDER BY completed_at DESC
             LIMIT 20",
        )
        .bind(user_id)
        .bind(STATUS_COMPLETED)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn difficulty_breakdown(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<DifficultyBreakdownEntry>> {
        let rows = sqlx::query_as::<_, BreakdownRow>(
            "SELECT q.difficulty AS label,
                    COUNT(*) AS attempted,
                    COUNT(*) FILTER (WHERE a.is_correct) AS correct,
                    NULL::float8 AS avg_time
             FROM attempts a
             JOIN questions q ON q.id = a.question_id
             WHERE a.user_id = $1
             GROUP BY q.difficulty",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DifficultyBreakdownEntry {
                difficulty: row.label,
                attempted: row.attempted,
                correct: row.correct,
            })
            .collect())
    }
}

fn ratio_percent(part: i64, whole: i64) -> i32 {
    if whole <= 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::ratio_percent;

    #[test]
    fn ratio_percent_rounds_and_guards_zero() {
        assert_eq!(ratio_percent(0, 0), 0);
        assert_eq!(ratio_percent(1, 3), 33);
        assert_eq!(ratio_percent(2, 3), 67);
        assert_eq!(ratio_percent(3, 3), 100);
    }
}
