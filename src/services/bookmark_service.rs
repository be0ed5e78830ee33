use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::bookmark_dto::{
    BookmarkQuestion, BookmarkResponse, CreateBookmarkRequest, UpdateBookmarkRequest,
};
use crate::error::{Error, Result};
use crate::models::bookmark::{Bookmark, DEFAULT_COLLECTION};

#[derive(Debug, FromRow)]
struct BookmarkJoinedRow {
    id: Uuid,
    notes: String,
    collection_name: String,
    created_at: DateTime<Utc>,
    question_id: Uuid,
    question_type: String,
    title: String,
    topic: String,
    difficulty: String,
    description: Option<String>,
    options: Option<JsonValue>,
    correct_answer: Option<String>,
}

impl From<BookmarkJoinedRow> for BookmarkResponse {
    fn from(row: BookmarkJoinedRow) -> Self {
        BookmarkResponse {
            id: row.id,
            notes: row.notes,
            collection: row.collection_name,
            created_at: row.created_at,
            question: BookmarkQuestion {
                id: row.question_id,
                question_type: row.question_type,
                title: row.title,
                topic: row.topic,
                difficulty: row.difficulty,
                description: row.description,
                options: row.options,
                correct_answer: row.correct_answer,
            },
        }
    }
}

const JOINED_SELECT: &str =
    "SELECT b.id, b.notes, b.collection_name, b.created_at,
            q.id AS question_id, q.question_type, q.title, q.topic, q.difficulty,
            q.description, q.options, q.correct_answer
     FROM bookmarks b
     JOIN questions q ON q.id = b.question_id";

#[derive(Clone)]
pub struct BookmarkService {
    pool: PgPool,
}

impl BookmarkService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        req: CreateBookmarkRequest,
    ) -> Result<BookmarkResponse> {
        let question_exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM questions WHERE id = $1")
                .bind(req.question_id)
                .fetch_optional(&self.pool)
                .await?;
        if question_exists.is_none() {
            return Err(Error::NotFound("Question not found".to_string()));
        }

        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM bookmarks WHERE user_id = $1 AND question_id = $2",
        )
        .bind(user_id)
        .bind(req.question_id)
        .fetch_optional(&self.pool)
        .await?;
        if existing.is_some() {
            return Err(Error::Conflict("Already bookmarked".to_string()));
        }

        let bookmark = sqlx::query_as::<_, Bookmark>(
            "INSERT INTO bookmarks (user_id, question_id, notes, collection_name)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(user_id)
        .bind(req.question_id)
        .bind(req.notes.unwrap_or_default())
        .bind(req.collection.unwrap_or_else(|| DEFAULT_COLLECTION.to_string()))
        .fetch_one(&self.pool)
        .await?;

        self.get_joined(bookmark.id).await
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        collection: Option<String>,
    ) -> Result<Vec<BookmarkResponse>> {
        let rows = sqlx::query_as::<_, BookmarkJoinedRow>(&format!(
            "{JOINED_SELECT}
             WHERE b.user_id = $1 AND ($2::text IS NULL OR b.collection_name = $2)
             ORDER BY b.created_at DESC"
        ))
        .bind(user_id)
        .bind(&collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BookmarkResponse::from).collect())
    }

    pub async fn collections(&self, user_id: Uuid) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT collection_name FROM bookmarks WHERE user_id = $1
             ORDER BY collection_name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    pub async fn update(
        &self,
        bookmark_id: Uuid,
        user_id: Uuid,
        req: UpdateBookmarkRequest,
    ) -> Result<BookmarkResponse> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            "UPDATE bookmarks
             SET notes = COALESCE($1, notes),
                 collection_name = COALESCE($2, collection_name),
                 updated_at = NOW()
             WHERE id = $3 AND user_id = $4
             RETURNING id",
        )
        .bind(&req.notes)
        .bind(&req.collection)
        .bind(bookmark_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.get_joined(id).await,
            None => Err(Error::NotFound("Bookmark not found".to_string())),
        }
    }

    /// Removes the caller's bookmark for a question; removing a bookmark
    /// that does not exist is not an error.
    pub async fn remove_by_question(&self, question_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM bookmarks WHERE question_id = $1 AND user_id = $2")
            .bind(question_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_joined(&self, bookmark_id: Uuid) -> Result<BookmarkResponse> {
        let row = sqlx::query_as::<_, BookmarkJoinedRow>(&format!(
            "{JOINED_SELECT}
             WHERE b.id = $1"
        ))
        .bind(bookmark_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }
}
