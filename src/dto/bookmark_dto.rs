use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmarkRequest {
    pub question_id: Uuid,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub collection: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBookmarkRequest {
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub collection: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookmarkListQuery {
    pub collection: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkQuestion {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub question_type: String,
    pub title: String,
    pub topic: String,
    pub difficulty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkResponse {
    pub id: Uuid,
    pub notes: String,
    pub collection: String,
    pub created_at: DateTime<Utc>,
    pub question: BookmarkQuestion,
}
