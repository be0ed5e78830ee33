pub mod analytics;
pub mod auth;
pub mod bookmarks;
pub mod export;
pub mod health;
pub mod mock_tests;
pub mod questions;
