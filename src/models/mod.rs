pub mod attempt;
pub mod bookmark;
pub mod mock_test;
pub mod question;
pub mod user;
