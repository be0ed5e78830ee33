use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::MessageResponse;
use crate::dto::bookmark_dto::{BookmarkListQuery, CreateBookmarkRequest, UpdateBookmarkRequest};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_bookmarks(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<BookmarkListQuery>,
) -> Result<impl IntoResponse> {
    let bookmarks = state
        .bookmark_service
        .list(claims.user_id()?, query.collection)
        .await?;
    Ok(Json(bookmarks))
}

#[axum::debug_handler]
pub async fn list_collections(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let collections = state.bookmark_service.collections(claims.user_id()?).await?;
    Ok(Json(collections))
}

#[axum::debug_handler]
pub async fn create_bookmark(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookmarkRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let bookmark = state
        .bookmark_service
        .create(claims.user_id()?, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

#[axum::debug_handler]
pub async fn update_bookmark(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookmarkRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let bookmark = state
        .bookmark_service
        .update(id, claims.user_id()?, payload)
        .await?;
    Ok(Json(bookmark))
}

/// DELETE is addressed by question id, matching how the client tracks
/// bookmarked questions.
#[axum::debug_handler]
pub async fn remove_bookmark(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state
        .bookmark_service
        .remove_by_question(id, claims.user_id()?)
        .await?;
    Ok(Json(MessageResponse {
        message: "Bookmark removed".to_string(),
    }))
}
