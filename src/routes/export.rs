use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension,
};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::user::User;
use crate::services::export_service::ExportService;
use crate::AppState;

#[derive(Debug, FromRow)]
struct ProgressRow {
    created_at: DateTime<Utc>,
    title: Option<String>,
    topic: Option<String>,
    difficulty: Option<String>,
    question_type: Option<String>,
    is_correct: bool,
    time_taken: i32,
}

#[derive(Debug, FromRow)]
struct TestRow {
    completed_at: Option<DateTime<Utc>>,
    title: String,
    topic: String,
    score: i32,
    correct_answers: i32,
    total_questions: i32,
    time_taken: i32,
}

fn csv_response(filename: String, csv: String) -> impl IntoResponse {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
}

/// The caller's full attempt log with question metadata.
#[axum::debug_handler]
pub async fn my_progress(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let rows = sqlx::query_as::<_, ProgressRow>(
        "SELECT a.created_at, q.title, q.topic, q.difficulty, q.question_type,
                a.is_correct, a.time_taken
         FROM attempts a
         LEFT JOIN questions q ON q.id = a.question_id
         WHERE a.user_id = $1
         ORDER BY a.created_at DESC",
    )
    .bind(claims.user_id()?)
    .fetch_all(&state.pool)
    .await?;

    let headers = ["Date", "Question", "Topic", "Difficulty", "Type", "Result", "Time (sec)"];
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.created_at.format("%Y-%m-%d").to_string(),
                row.title.clone().unwrap_or_else(|| "N/A".to_string()),
                row.topic.clone().unwrap_or_else(|| "N/A".to_string()),
                row.difficulty.clone().unwrap_or_else(|| "N/A".to_string()),
                row.question_type.clone().unwrap_or_else(|| "N/A".to_string()),
                if row.is_correct { "Correct" } else { "Incorrect" }.to_string(),
                row.time_taken.to_string(),
            ]
        })
        .collect();

    let csv = ExportService::to_csv(&headers, &data);
    let filename = format!("my-progress-{}.csv", Utc::now().timestamp_millis());
    Ok(csv_response(filename, csv))
}

/// The caller's completed mock tests.
#[axum::debug_handler]
pub async fn my_tests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let rows = sqlx::query_as::<_, TestRow>(
        "SELECT completed_at, title, topic, score, correct_answers, total_questions, time_taken
         FROM mock_tests
         WHERE user_id = $1 AND status = 'completed'
         ORDER BY completed_at DESC",
    )
    .bind(claims.user_id()?)
    .fetch_all(&state.pool)
    .await?;

    let headers = ["Date", "Title", "Topic", "Score (%)", "Correct", "Total", "Duration (min)"];
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.completed_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                row.title.clone(),
                row.topic.clone(),
                row.score.to_string(),
                row.correct_answers.to_string(),
                row.total_questions.to_string(),
                ((row.time_taken as f64 / 60.0).round() as i64).to_string(),
            ]
        })
        .collect();

    let csv = ExportService::to_csv(&headers, &data);
    let filename = format!("my-tests-{}.csv", Utc::now().timestamp_millis());
    Ok(csv_response(filename, csv))
}

/// Admin roll-up of every user's activity and accuracy.
#[axum::debug_handler]
pub async fn attendance(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
        .fetch_all(&state.pool)
        .await?;

    let headers = [
        "Name",
        "Email",
        "Role",
        "Total Sessions",
        "Questions Attempted",
        "Correct Answers",
        "Mock Tests",
        "Accuracy (%)",
        "Last Active",
        "Joined",
    ];
    let data: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.name.clone(),
                u.email.clone(),
                u.role.clone(),
                u.total_sessions.to_string(),
                u.total_questions_attempted.to_string(),
                u.total_correct.to_string(),
                u.total_mock_tests.to_string(),
                u.accuracy().to_string(),
                u.last_active
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "Never".to_string()),
                u.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();

    let csv = ExportService::to_csv(&headers, &data);
    let filename = format!("attendance-{}.csv", Utc::now().timestamp_millis());
    Ok(csv_response(filename, csv))
}
