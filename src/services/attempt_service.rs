use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::attempt::{Attempt, MODE_MOCK, MODE_PRACTICE};
use crate::models::mock_test::MockTestEntry;
use crate::models::question::{Question, TYPE_MCQ};
use crate::models::user::User;
use crate::utils::streak::update_streak;

/// Client-reported coding outcome: all local test cases passed.
pub const CODING_PASS: &str = "PASS";
/// Client-reported coding outcome: at least one local test case failed.
pub const CODING_FAIL: &str = "FAIL";

pub struct PracticeOutcome {
    pub question: Question,
    pub is_correct: bool,
    pub recorded: bool,
    /// Refreshed user stats; `None` when nothing was recorded.
    pub user: Option<User>,
}

#[derive(Clone)]
pub struct AttemptService {
    pool: PgPool,
}

impl AttemptService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records one practice submission: the immutable attempt row, the
    /// question's aggregate counters, the user's counters, per-topic
    /// progress and streak, all in one transaction.
    ///
    /// A `"FAIL"` submission is a designed no-op: nothing is written and
    /// the caller is told `recorded: false`, so failed local test runs
    /// never drag accuracy down.
    pub async fn record_practice(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        selected_answer: &str,
        time_taken: i32,
    ) -> Result<PracticeOutcome> {
        let question =
            sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = $1 AND is_active = TRUE")
                .bind(question_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Question not found".to_string()))?;

        let Some(is_correct) = practice_verdict(
            &question.question_type,
            selected_answer,
            question.correct_answer.as_deref(),
        ) else {
            return Ok(PracticeOutcome {
                question,
                is_correct: false,
                recorded: false,
                user: None,
            });
        };
        let correct_inc: i32 = if is_correct { 1 } else { 0 };

        let mut user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

        update_streak(&mut user, Utc::now().date_naive());

        let mut tx = self.pool.begin().await?;

        let attempt = sqlx::query_as::<_, Attempt>(
            "INSERT INTO attempts (user_id, question_id, selected_answer, is_correct, time_taken, mode)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(user_id)
        .bind(question_id)
        .bind(selected_answer)
        .bind(is_correct)
        .bind(time_taken)
        .bind(MODE_PRACTICE)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE questions
             SET total_attempts = total_attempts + 1,
                 correct_attempts = correct_attempts + $1,
                 updated_at = NOW()
             WHERE id = $2",
        )
        .bind(correct_inc)
        .bind(question_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE users
            SET total_questions_attempted = total_questions_attempted + 1,
                total_correct = total_correct + $1,
                streak = $2,
                last_study_date = $3,
                last_active = NOW(),
                topic_progress = topic_progress || jsonb_build_object(
                    $4::text,
                    jsonb_build_object(
                        'attempted', COALESCE((topic_progress #>> ARRAY[$4::text, 'attempted'])::int, 0) + 1,
                        'correct',   COALESCE((topic_progress #>> ARRAY[$4::text, 'correct'])::int, 0) + $1
                    )
                ),
                updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(correct_inc)
        .bind(user.streak)
        .bind(user.last_study_date)
        .bind(&question.topic)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        // Mirror the committed increments for the response payload.
        user.total_questions_attempted += 1;
        user.total_correct += correct_inc;

        tracing::info!(
            "Practice attempt {} recorded: user={} question={} correct={}",
            attempt.id,
            user_id,
            question_id,
            is_correct
        );

        Ok(PracticeOutcome {
            question,
            is_correct,
            recorded: true,
            user: Some(user),
        })
    }

    /// Materializes a graded mock-test submission as detached attempt rows
    /// and rolls each question's aggregates, inside the caller's
    /// transaction so the embedded result list and the attempt ledger
    /// share one fate.
    pub async fn record_mock_results(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        mock_test_id: Uuid,
        graded: &[MockTestEntry],
    ) -> Result<()> {
        for entry in graded {
            sqlx::query(
                "INSERT INTO attempts (user_id, question_id, selected_answer, is_correct, time_taken, mock_test_id, mode)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(user_id)
            .bind(entry.question_id)
            .bind(&entry.selected_answer)
            .bind(entry.is_correct)
            .bind(entry.time_taken)
            .bind(mock_test_id)
            .bind(MODE_MOCK)
            .execute(&mut **tx)
            .await?;

            sqlx::query(
                "UPDATE questions
                 SET total_attempts = total_attempts + 1,
                     correct_attempts = correct_attempts + $1,
                     updated_at = NOW()
                 WHERE id = $2",
            )
            .bind(if entry.is_correct { 1 } else { 0 })
            .bind(entry.question_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

/// Correctness verdict for a practice submission. `None` means the
/// submission is the designed `"FAIL"` no-op and must not be recorded;
/// otherwise MCQs compare against the stored answer and coding questions
/// are correct exactly when the client reports `"PASS"`.
fn practice_verdict(
    question_type: &str,
    selected_answer: &str,
    correct_answer: Option<&str>,
) -> Option<bool> {
    if selected_answer == CODING_FAIL {
        return None;
    }
    Some(if question_type == TYPE_MCQ {
        correct_answer == Some(selected_answer)
    } else {
        selected_answer == CODING_PASS
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::TYPE_CODING;

    #[test]
    fn fail_submissions_are_never_recorded() {
        assert_eq!(practice_verdict(TYPE_CODING, CODING_FAIL, None), None);
        // The no-op applies before any type dispatch.
        assert_eq!(practice_verdict(TYPE_MCQ, CODING_FAIL, Some("A")), None);
    }

    #[test]
    fn coding_questions_trust_the_reported_pass() {
        assert_eq!(practice_verdict(TYPE_CODING, CODING_PASS, None), Some(true));
        assert_eq!(
            practice_verdict(TYPE_CODING, "partial output", None),
            Some(false)
        );
    }

    #[test]
    fn mcq_answers_compare_exactly() {
        assert_eq!(practice_verdict(TYPE_MCQ, "B", Some("B")), Some(true));
        assert_eq!(practice_verdict(TYPE_MCQ, "A", Some("B")), Some(false));
        assert_eq!(practice_verdict(TYPE_MCQ, "b", Some("B")), Some(false));
        assert_eq!(practice_verdict(TYPE_MCQ, "A", None), Some(false));
    }
}
