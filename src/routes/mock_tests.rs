use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::mock_test_dto::{
    GenerateMockTestRequest, GenerateMockTestResponse, ListMockTestsQuery, ListMockTestsResponse,
    MockTestDetailResponse, MockTestQuestionResult, ResultQuestion, SanitizedQuestion,
    StartMockTestResponse, SubmitMockTestRequest, SubmitMockTestResponse,
};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/mocktest/generate",
    request_body = GenerateMockTestRequest,
    responses(
        (status = 201, description = "Test created from a random question sample", body = GenerateMockTestResponse),
        (status = 400, description = "No questions match the requested criteria")
    )
)]
#[axum::debug_handler]
pub async fn generate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<GenerateMockTestRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let (test, questions) = state.mock_test_service.generate(user_id, payload).await?;

    let response = GenerateMockTestResponse {
        test_id: test.id,
        title: test.title.clone(),
        duration: test.duration_minutes,
        total_questions: test.total_questions,
        questions: questions.iter().map(SanitizedQuestion::from).collect(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/mocktest/{id}/start",
    params(("id" = Uuid, Path, description = "Mock test ID")),
    responses(
        (status = 200, description = "Test started", body = StartMockTestResponse),
        (status = 400, description = "Test already submitted"),
        (status = 404, description = "Test not found or not owned by the caller")
    )
)]
#[axum::debug_handler]
pub async fn start(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.mock_test_service.start(id, claims.user_id()?).await?;
    Ok(Json(StartMockTestResponse {
        message: "Test started".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/mocktest/{id}/submit",
    params(("id" = Uuid, Path, description = "Mock test ID")),
    request_body = SubmitMockTestRequest,
    responses(
        (status = 200, description = "Scored result with the full breakdown", body = SubmitMockTestResponse),
        (status = 400, description = "Test already submitted"),
        (status = 404, description = "Test not found or not owned by the caller")
    )
)]
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitMockTestRequest>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let submitted = state
        .mock_test_service
        .submit(id, user_id, payload)
        .await?;

    let questions = submitted
        .graded
        .iter()
        .map(|entry| {
            let question = submitted
                .questions
                .get(&entry.question_id)
                .map(ResultQuestion::revealed);
            MockTestQuestionResult::new(entry, question)
        })
        .collect();

    Ok(Json(SubmitMockTestResponse {
        test_id: submitted.test.id,
        score: submitted.test.score,
        correct_answers: submitted.test.correct_answers,
        total_questions: submitted.test.total_questions,
        time_taken: submitted.test.time_taken,
        questions,
    }))
}

#[utoipa::path(
    get,
    path = "/api/mocktest",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "The caller's tests, newest first, without question payloads", body = ListMockTestsResponse)
    )
)]
#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListMockTestsQuery>,
) -> Result<impl IntoResponse> {
    let result = state
        .mock_test_service
        .list(
            claims.user_id()?,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(10),
        )
        .await?;
    Ok(Json(ListMockTestsResponse {
        data: result.tests,
        total: result.total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/mocktest/{id}",
    params(("id" = Uuid, Path, description = "Mock test ID")),
    responses(
        (status = 200, description = "Test detail; answers are revealed only once completed", body = MockTestDetailResponse),
        (status = 404, description = "Test not found or not owned by the caller")
    )
)]
#[axum::debug_handler]
pub async fn detail(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let (test, questions) = state
        .mock_test_service
        .detail(id, claims.user_id()?)
        .await?;

    let completed = test.is_completed();
    let entries = test.entries();
    let question_results = entries
        .iter()
        .map(|entry| {
            let question = questions.get(&entry.question_id).map(|q| {
                if completed {
                    ResultQuestion::revealed(q)
                } else {
                    ResultQuestion::concealed(q)
                }
            });
            MockTestQuestionResult::new(entry, question)
        })
        .collect();

    Ok(Json(MockTestDetailResponse {
        id: test.id,
        title: test.title,
        topic: test.topic,
        difficulty: test.difficulty,
        duration: test.duration_minutes,
        status: test.status,
        score: test.score,
        correct_answers: test.correct_answers,
        total_questions: test.total_questions,
        accuracy: test.accuracy,
        time_taken: test.time_taken,
        started_at: test.started_at,
        completed_at: test.completed_at,
        created_at: test.created_at,
        questions: question_results,
    }))
}
