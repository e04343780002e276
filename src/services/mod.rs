// src/services/mod.rs

pub mod auth_service;
pub mod quiz_service;

pub use auth_service::{AuthService, LoginOutcome};
pub use quiz_service::QuizService;

pub const USER_NOT_FOUND: &str = "User not found";
