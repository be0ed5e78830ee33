use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::MessageResponse;
use crate::dto::question_dto::{
    CreateQuestionRequest, ListQuestionsResponse, Pagination, QuestionListQuery,
    SubmitAnswerRequest, SubmitAnswerResponse, UpdateQuestionRequest, UserStats,
};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<QuestionListQuery>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let (data, total, page, limit) = state.question_service.list(user_id, &query).await?;

    let pages = if limit > 0 {
        (total as f64 / limit as f64).ceil() as i64
    } else {
        1
    };

    Ok(Json(ListQuestionsResponse {
        data,
        pagination: Pagination {
            total,
            page,
            pages,
            limit,
        },
    }))
}

#[axum::debug_handler]
pub async fn list_topics(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let topics = state.question_service.topics(claims.user_id()?).await?;
    Ok(Json(topics))
}

/// Full question detail, solution included, for the study view.
#[axum::debug_handler]
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let question = state.question_service.get_by_id(id).await?;
    Ok(Json(question))
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let time_taken = payload.time_taken.unwrap_or(0);

    let outcome = state
        .attempt_service
        .record_practice(user_id, id, &payload.selected_answer, time_taken)
        .await?;

    if !outcome.recorded {
        return Ok(Json(SubmitAnswerResponse {
            is_correct: false,
            recorded: false,
            message: Some(
                "Tests failed - attempt not recorded. Fix your code and resubmit.".to_string(),
            ),
            correct_answer: None,
            explanation: None,
            user_stats: None,
        }));
    }

    let user_stats = outcome.user.as_ref().map(|u| UserStats {
        streak: u.streak,
        total_questions_attempted: u.total_questions_attempted,
        total_correct: u.total_correct,
    });

    Ok(Json(SubmitAnswerResponse {
        is_correct: outcome.is_correct,
        recorded: true,
        message: None,
        correct_answer: outcome.question.correct_answer.clone(),
        explanation: outcome.question.solution_explanation.clone(),
        user_stats,
    }))
}

#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state
        .question_service
        .create(payload, claims.user_id()?)
        .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state.question_service.update(id, payload).await?;
    Ok(Json(question))
}

#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.question_service.deactivate(id).await?;
    Ok(Json(MessageResponse {
        message: "Question deactivated".to_string(),
    }))
}
