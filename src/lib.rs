pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    analytics_service::AnalyticsService, attempt_service::AttemptService,
    bookmark_service::BookmarkService, mock_test_service::MockTestService,
    question_service::QuestionService, user_service::UserService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub user_service: UserService,
    pub question_service: QuestionService,
    pub attempt_service: AttemptService,
    pub mock_test_service: MockTestService,
    pub analytics_service: AnalyticsService,
    pub bookmark_service: BookmarkService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let user_service = UserService::new(pool.clone());
        let question_service = QuestionService::new(pool.clone());
        let attempt_service = AttemptService::new(pool.clone());
        let mock_test_service = MockTestService::new(pool.clone());
        let analytics_service = AnalyticsService::new(pool.clone());
        let bookmark_service = BookmarkService::new(pool.clone());

        Self {
            pool,
            user_service,
            question_service,
            attempt_service,
            mock_test_service,
            analytics_service,
            bookmark_service,
        }
    }
}
