use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn overview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let data = state.analytics_service.overview(claims.user_id()?).await?;
    Ok(Json(data))
}

#[axum::debug_handler]
pub async fn topic_breakdown(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let data = state
        .analytics_service
        .topic_breakdown(claims.user_id()?)
        .await?;
    Ok(Json(data))
}

#[axum::debug_handler]
pub async fn activity(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let data = state.analytics_service.activity(claims.user_id()?).await?;
    Ok(Json(data))
}

#[axum::debug_handler]
pub async fn test_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let data = state
        .analytics_service
        .test_history(claims.user_id()?)
        .await?;
    Ok(Json(data))
}

#[axum::debug_handler]
pub async fn difficulty_breakdown(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let data = state
        .analytics_service
        .difficulty_breakdown(claims.user_id()?)
        .await?;
    Ok(Json(data))
}
