use axum::response::{IntoResponse, Json};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "message": "PrepForge API running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
