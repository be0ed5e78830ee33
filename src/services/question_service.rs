use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::question_dto::{
    CreateQuestionRequest, QuestionListQuery, QuestionSummary, TopicProgress, TopicStats,
    UpdateQuestionRequest, UserQuestionStatus,
};
use crate::error::{Error, Result};
use crate::models::question::{Question, DIFFICULTIES, TYPE_CODING, TYPE_MCQ};

const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, FromRow)]
struct AttemptStatusRow {
    question_id: Uuid,
    correct: Option<bool>,
}

#[derive(Debug, FromRow)]
struct TopicCountsRow {
    topic: String,
    total: i64,
    easy: i64,
    medium: i64,
    hard: i64,
    mcq: i64,
    coding: i64,
}

#[derive(Debug, FromRow)]
struct TopicProgressRow {
    topic: String,
    attempted: i64,
    correct: i64,
}

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered, paginated listing with the caller's own attempt status
    /// folded in. Solution fields never leave this layer (the summary DTO
    /// has no slot for them).
    pub async fn list(
        &self,
        user_id: Uuid,
        query: &QuestionListQuery,
    ) -> Result<(Vec<QuestionSummary>, i64, i64, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);
        let offset = (page - 1) * limit;
        let search = query.search.as_ref().map(|s| format!("%{}%", s));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM questions
             WHERE is_active = TRUE
               AND ($1::text IS NULL OR question_type = $1)
               AND ($2::text IS NULL OR topic = $2)
               AND ($3::text IS NULL OR difficulty = $3)
               AND ($4::text IS NULL OR title ILIKE $4 OR description ILIKE $4
                    OR array_to_string(tags, ' ') ILIKE $4)",
        )
        .bind(&query.question_type)
        .bind(&query.topic)
        .bind(&query.difficulty)
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let questions = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions
             WHERE is_active = TRUE
               AND ($1::text IS NULL OR question_type = $1)
               AND ($2::text IS NULL OR topic = $2)
               AND ($3::text IS NULL OR difficulty = $3)
               AND ($4::text IS NULL OR title ILIKE $4 OR description ILIKE $4
                    OR array_to_string(tags, ' ') ILIKE $4)
             ORDER BY created_at DESC
             LIMIT $5 OFFSET $6",
        )
        .bind(&query.question_type)
        .bind(&query.topic)
        .bind(&query.difficulty)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
        let status_rows = sqlx::query_as::<_, AttemptStatusRow>(
            "SELECT question_id, BOOL_OR(is_correct) AS correct
             FROM attempts
             WHERE user_id = $1 AND question_id = ANY($2)
             GROUP BY question_id",
        )
        .bind(user_id)
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        let status_map: HashMap<Uuid, bool> = status_rows
            .into_iter()
            .map(|r| (r.question_id, r.correct.unwrap_or(false)))
            .collect();

        let summaries = questions
            .iter()
            .map(|q| {
                let user_status = match status_map.get(&q.id) {
                    Some(correct) => UserQuestionStatus {
                        attempted: true,
                        correct: *correct,
                    },
                    None => UserQuestionStatus::default(),
                };
                QuestionSummary::from_question(q, user_status)
            })
            .collect();

        Ok((summaries, total, page, limit))
    }

    /// Per-topic catalogue counts plus the caller's per-topic progress.
    pub async fn topics(&self, user_id: Uuid) -> Result<Vec<TopicStats>> {
        let counts = sqlx::query_as::<_, TopicCountsRow>(
            "SELECT topic,
                    COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE difficulty = 'Easy') AS easy,
                    COUNT(*) FILTER (WHERE difficulty = 'Medium') AS medium,
                    COUNT(*) FILTER (WHERE difficulty = 'Hard') AS hard,
                    COUNT(*) FILTER (WHERE question_type = 'mcq') AS mcq,
                    COUNT(*) FILTER (WHERE question_type = 'coding') AS coding
             FROM questions
             WHERE is_active = TRUE
             GROUP BY topic
             ORDER BY total DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let progress_rows = sqlx::query_as::<_, TopicProgressRow>(
            "SELECT q.topic,
                    COUNT(*) AS attempted,
                    COUNT(*) FILTER (WHERE a.is_correct) AS correct
             FROM attempts a
             JOIN questions q ON q.id = a.question_id
             WHERE a.user_id = $1
             GROUP BY q.topic",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        let progress: HashMap<String, TopicProgress> = progress_rows
            .into_iter()
            .map(|r| {
                (
                    r.topic,
                    TopicProgress {
                        attempted: r.attempted,
                        correct: r.correct,
                    },
                )
            })
            .collect();

        Ok(counts
            .into_iter()
            .map(|row| {
                let user_progress = progress.get(&row.topic).cloned().unwrap_or_default();
                TopicStats {
                    topic: row.topic,
                    total: row.total,
                    easy: row.easy,
                    medium: row.medium,
                    hard: row.hard,
                    mcq: row.mcq,
                    coding: row.coding,
                    user_progress,
                }
            })
            .collect())
    }

    pub async fn get_by_id(&self, question_id: Uuid) -> Result<Question> {
        sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = $1")
            .bind(question_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Question not found".to_string()))
    }

    pub async fn create(&self, req: CreateQuestionRequest, created_by: Uuid) -> Result<Question> {
        validate_question_shape(&req)?;

        let options = req.options.as_ref().map(serde_json::to_value).transpose()?;
        let examples = req.examples.as_ref().map(serde_json::to_value).transpose()?;

        let question = sqlx::query_as::<_, Question>(
            "INSERT INTO questions (
                question_type, title, description, topic, difficulty, options, correct_answer,
                examples, constraints, starter_code, solution, solution_explanation,
                time_complexity, space_complexity, hints, tags, created_by
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING *",
        )
        .bind(&req.question_type)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.topic)
        .bind(&req.difficulty)
        .bind(options)
        .bind(&req.correct_answer)
        .bind(examples)
        .bind(&req.constraints)
        .bind(&req.starter_code)
        .bind(&req.solution)
        .bind(&req.solution_explanation)
        .bind(&req.time_complexity)
        .bind(&req.space_complexity)
        .bind(&req.hints)
        .bind(&req.tags)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn update(&self, question_id: Uuid, req: UpdateQuestionRequest) -> Result<Question> {
        if let Some(difficulty) = &req.difficulty {
            if !DIFFICULTIES.contains(&difficulty.as_str()) {
                return Err(Error::BadRequest(format!(
                    "Unknown difficulty '{}'",
                    difficulty
                )));
            }
        }

        let options = req.options.as_ref().map(serde_json::to_value).transpose()?;
        let examples = req.examples.as_ref().map(serde_json::to_value).transpose()?;

        let question = sqlx::query_as::<_, Question>(
            "UPDATE questions SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                topic = COALESCE($3, topic),
                difficulty = COALESCE($4, difficulty),
                options = COALESCE($5, options),
                correct_answer = COALESCE($6, correct_answer),
                examples = COALESCE($7, examples),
                constraints = COALESCE($8, constraints),
                starter_code = COALESCE($9, starter_code),
                solution = COALESCE($10, solution),
                solution_explanation = COALESCE($11, solution_explanation),
                time_complexity = COALESCE($12, time_complexity),
                space_complexity = COALESCE($13, space_complexity),
                hints = COALESCE($14, hints),
                tags = COALESCE($15, tags),
                is_active = COALESCE($16, is_active),
                updated_at = NOW()
             WHERE id = $17
             RETURNING *",
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.topic)
        .bind(&req.difficulty)
        .bind(options)
        .bind(&req.correct_answer)
        .bind(examples)
        .bind(&req.constraints)
        .bind(&req.starter_code)
        .bind(&req.solution)
        .bind(&req.solution_explanation)
        .bind(&req.time_complexity)
        .bind(&req.space_complexity)
        .bind(&req.hints)
        .bind(&req.tags)
        .bind(req.is_active)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Question not found".to_string()))?;

        Ok(question)
    }

    /// Soft delete: the question drops out of listings and sampling but
    /// existing attempts and embedded test results keep resolving.
    pub async fn deactivate(&self, question_id: Uuid) -> Result<()> {
        let result =
            sqlx::query("UPDATE questions SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(question_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Question not found".to_string()));
        }
        Ok(())
    }
}

fn validate_question_shape(req: &CreateQuestionRequest) -> Result<()> {
    match req.question_type.as_str() {
        TYPE_MCQ => {
            let has_options = req.options.as_ref().is_some_and(|o| !o.is_empty());
            if !has_options {
                return Err(Error::BadRequest(
                    "MCQ questions require options".to_string(),
                ));
            }
            if req.correct_answer.is_none() {
                return Err(Error::BadRequest(
                    "MCQ questions require a correct answer".to_string(),
                ));
            }
        }
        TYPE_CODING => {}
        other => {
            return Err(Error::BadRequest(format!(
                "Unknown question type '{}'",
                other
            )));
        }
    }

    if !DIFFICULTIES.contains(&req.difficulty.as_str()) {
        return Err(Error::BadRequest(format!(
            "Unknown difficulty '{}'",
            req.difficulty
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateQuestionRequest {
        CreateQuestionRequest {
            question_type: TYPE_MCQ.to_string(),
            title: "Title".to_string(),
            description: "Description".to_string(),
            topic: "JavaScript".to_string(),
            difficulty: "Easy".to_string(),
            options: Some(vec![crate::models::question::McqOption {
                label: "A".to_string(),
                text: "Answer".to_string(),
            }]),
            correct_answer: Some("A".to_string()),
            examples: None,
            constraints: None,
            starter_code: None,
            solution: None,
            solution_explanation: None,
            time_complexity: None,
            space_complexity: None,
            hints: None,
            tags: None,
        }
    }

    #[test]
    fn mcq_without_options_is_rejected() {
        let mut req = base_request();
        req.options = None;
        assert!(validate_question_shape(&req).is_err());
    }

    #[test]
    fn mcq_without_correct_answer_is_rejected() {
        let mut req = base_request();
        req.correct_answer = None;
        assert!(validate_question_shape(&req).is_err());
    }

    #[test]
    fn unknown_type_and_difficulty_are_rejected() {
        let mut req = base_request();
        req.question_type = "essay".to_string();
        assert!(validate_question_shape(&req).is_err());

        let mut req = base_request();
        req.difficulty = "Impossible".to_string();
        assert!(validate_question_shape(&req).is_err());
    }

    #[test]
    fn well_formed_requests_pass() {
        assert!(validate_question_shape(&base_request()).is_ok());
        let mut coding = base_request();
        coding.question_type = TYPE_CODING.to_string();
        coding.options = None;
        coding.correct_answer = None;
        assert!(validate_question_shape(&coding).is_ok());
    }
}
