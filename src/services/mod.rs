pub mod analytics_service;
pub mod attempt_service;
pub mod bookmark_service;
pub mod export_service;
pub mod grading_service;
pub mod mock_test_service;
pub mod question_service;
pub mod user_service;
