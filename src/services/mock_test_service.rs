use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::mock_test_dto::{GenerateMockTestRequest, MockTestSummary, SubmitMockTestRequest};
use crate::error::{Error, Result};
use crate::models::mock_test::{
    MockTest, MockTestEntry, STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_PENDING,
};
use crate::models::question::{Question, TYPE_MCQ};
use crate::models::user::User;
use crate::services::attempt_service::AttemptService;
use crate::services::grading_service::GradingService;
use crate::utils::streak::update_streak;

/// Filter wildcard: "Mixed" topic/difficulty means no filter at all.
const MIXED: &str = "Mixed";
const DEFAULT_COUNT: i64 = 10;
const DEFAULT_DURATION_MINUTES: i32 = 20;

#[derive(Debug)]
pub struct PaginatedMockTests {
    pub tests: Vec<MockTestSummary>,
    pub total: i64,
}

pub struct SubmittedMockTest {
    pub test: MockTest,
    pub graded: Vec<MockTestEntry>,
    pub questions: HashMap<Uuid, Question>,
}

#[derive(Clone)]
pub struct MockTestService {
    pool: PgPool,
    attempts: AttemptService,
}

impl MockTestService {
    pub fn new(pool: PgPool) -> Self {
        let attempts = AttemptService::new(pool.clone());
        Self { pool, attempts }
    }

    /// Samples up to `count` active MCQ questions uniformly at random
    /// (without replacement) and creates a pending test over them. The
    /// sampled set may be smaller than requested when the filtered pool
    /// is small; that is accepted silently, but an empty pool is an error.
    pub async fn generate(
        &self,
        user_id: Uuid,
        req: GenerateMockTestRequest,
    ) -> Result<(MockTest, Vec<Question>)> {
        let count = req.count.unwrap_or(DEFAULT_COUNT);
        let duration = req.duration.unwrap_or(DEFAULT_DURATION_MINUTES);
        let topic = req.topic.clone().filter(|t| t != MIXED);
        let difficulty = req.difficulty.clone().filter(|d| d != MIXED);

        let questions = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions
             WHERE is_active = TRUE AND question_type = $1
               AND ($2::text IS NULL OR topic = $2)
               AND ($3::text IS NULL OR difficulty = $3)
             ORDER BY RANDOM()
             LIMIT $4",
        )
        .bind(TYPE_MCQ)
        .bind(&topic)
        .bind(&difficulty)
        .bind(count)
        .fetch_all(&self.pool)
        .await?;

        if questions.is_empty() {
            return Err(Error::NoQuestionsAvailable(
                "No questions found for these criteria".to_string(),
            ));
        }

        let entries: Vec<MockTestEntry> = questions
            .iter()
            .map(|q| MockTestEntry::unanswered(q.id))
            .collect();
        let title = format!(
            "{} Mock Test - {}",
            req.topic.as_deref().unwrap_or(MIXED),
            Utc::now().format("%d/%m/%Y")
        );

        let test = sqlx::query_as::<_, MockTest>(
            "INSERT INTO mock_tests (user_id, title, topic, difficulty, duration_minutes, questions, status, total_questions)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(user_id)
        .bind(&title)
        .bind(req.topic.as_deref().unwrap_or(MIXED))
        .bind(req.difficulty.as_deref().unwrap_or(MIXED))
        .bind(duration)
        .bind(serde_json::to_value(&entries)?)
        .bind(STATUS_PENDING)
        .bind(questions.len() as i32)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            "Generated mock test {} with {} questions for user {}",
            test.id,
            test.total_questions,
            user_id
        );

        Ok((test, questions))
    }

    pub async fn get_owned(&self, test_id: Uuid, user_id: Uuid) -> Result<MockTest> {
        sqlx::query_as::<_, MockTest>("SELECT * FROM mock_tests WHERE id = $1 AND user_id = $2")
            .bind(test_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Test not found".to_string()))
    }

    /// Moves the test into `in-progress` and stamps the start time.
    /// Re-starting an in-progress test overwrites the stamp (clients
    /// re-enter after a refresh); a completed test cannot be started again.
    pub async fn start(&self, test_id: Uuid, user_id: Uuid) -> Result<MockTest> {
        let test = self.get_owned(test_id, user_id).await?;
        if test.is_completed() {
            return Err(Error::InvalidState("Test already submitted".to_string()));
        }

        let updated = sqlx::query_as::<_, MockTest>(
            "UPDATE mock_tests SET status = $1, started_at = NOW(), updated_at = NOW()
             WHERE id = $2
             RETURNING *",
        )
        .bind(STATUS_IN_PROGRESS)
        .bind(test.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Scores the submission and commits every side effect as one unit:
    /// the frozen embedded result list, the detached attempt rows, the
    /// per-question aggregates, the user's counters and a single streak
    /// update. A completed test rejects resubmission.
    pub async fn submit(
        &self,
        test_id: Uuid,
        user_id: Uuid,
        req: SubmitMockTestRequest,
    ) -> Result<SubmittedMockTest> {
        let test = self.get_owned(test_id, user_id).await?;
        GradingService::ensure_submittable(&test.status)?;

        let entries = test.entries();
        let answers: HashMap<Uuid, Option<String>> = req
            .answers
            .iter()
            .map(|a| (a.question_id, a.selected_answer.clone()))
            .collect();

        let ids: Vec<Uuid> = entries.iter().map(|e| e.question_id).collect();
        let question_rows =
            sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = ANY($1)")
                .bind(&ids)
                .fetch_all(&self.pool)
                .await?;
        let questions: HashMap<Uuid, Question> =
            question_rows.into_iter().map(|q| (q.id, q)).collect();
        let answer_key: HashMap<Uuid, String> = questions
            .iter()
            .filter_map(|(id, q)| q.correct_answer.clone().map(|a| (*id, a)))
            .collect();

        let (graded, correct_count) = GradingService::grade(&entries, &answers, &answer_key);
        let score = GradingService::score(correct_count, test.total_questions);
        let time_taken = req.time_taken.unwrap_or(0);

        let mut user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        // One streak update per submission, not one per question.
        update_streak(&mut user, Utc::now().date_naive());

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, MockTest>(
            "UPDATE mock_tests
             SET questions = $1, status = $2, correct_answers = $3, score = $4, accuracy = $4,
                 time_taken = $5, completed_at = NOW(), updated_at = NOW()
             WHERE id = $6
             RETURNING *",
        )
        .bind(serde_json::to_value(&graded)?)
        .bind(STATUS_COMPLETED)
        .bind(correct_count)
        .bind(score)
        .bind(time_taken)
        .bind(test.id)
        .fetch_one(&mut *tx)
        .await?;

        self.attempts
            .record_mock_results(&mut tx, user_id, test.id, &graded)
            .await?;

        sqlx::query(
            "UPDATE users
             SET total_mock_tests = total_mock_tests + 1,
                 total_questions_attempted = total_questions_attempted + $1,
                 total_correct = total_correct + $2,
                 streak = $3,
                 last_study_date = $4,
                 last_active = NOW(),
                 updated_at = NOW()
             WHERE id = $5",
        )
        .bind(updated.total_questions)
        .bind(correct_count)
        .bind(user.streak)
        .bind(user.last_study_date)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Mock test {} submitted: {}/{} correct, score {}",
            updated.id,
            correct_count,
            updated.total_questions,
            score
        );

        Ok(SubmittedMockTest {
            test: updated,
            graded,
            questions,
        })
    }

    pub async fn detail(
        &self,
        test_id: Uuid,
        user_id: Uuid,
    ) -> Result<(MockTest, HashMap<Uuid, Question>)> {
        let test = self.get_owned(test_id, user_id).await?;
        let ids: Vec<Uuid> = test.entries().iter().map(|e| e.question_id).collect();
        let rows = sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;
        Ok((test, rows.into_iter().map(|q| (q.id, q)).collect()))
    }

    pub async fn list(&self, user_id: Uuid, page: i64, limit: i64) -> Result<PaginatedMockTests> {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let tests = sqlx::query_as::<_, MockTestSummary>(
            "SELECT id, title, topic, difficulty, duration_minutes, status, score, total_questions,
                    correct_answers, accuracy, time_taken, started_at, completed_at, created_at
             FROM mock_tests
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mock_tests WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(PaginatedMockTests { tests, total })
    }
}
