use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::dto::auth_dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, ProfileResponse,
    RegisterRequest, SafeUser, UpdateProfileRequest,
};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::utils::token::issue_token;
use crate::AppState;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.register(payload).await?;

    let config = crate::config::get_config();
    let token = issue_token(user.id, &user.role, &config.jwt_secret, config.jwt_expires_hours)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            token,
            user: SafeUser::from(&user),
        }),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.login(payload).await?;

    let config = crate::config::get_config();
    let token = issue_token(user.id, &user.role, &config.jwt_secret, config.jwt_expires_hours)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: SafeUser::from(&user),
    }))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_by_id(claims.user_id()?).await?;
    Ok(Json(SafeUser::from(&user)))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state
        .user_service
        .rename(claims.user_id()?, &payload.name)
        .await?;
    Ok(Json(ProfileResponse {
        message: "Profile updated".to_string(),
        user: SafeUser::from(&user),
    }))
}

#[axum::debug_handler]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .user_service
        .change_password(
            claims.user_id()?,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;
    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}
