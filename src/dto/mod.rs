pub mod analytics_dto;
pub mod auth_dto;
pub mod bookmark_dto;
pub mod mock_test_dto;
pub mod question_dto;
