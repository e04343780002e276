// src/repositories/mod.rs

pub mod quiz_result_repository;
pub mod user_repository;

pub use quiz_result_repository::{PgQuizResultRepository, QuizResultRepository};
pub use user_repository::{PgUserRepository, UserRepository};

/// Postgres reports unique constraint violations as SQLSTATE 23505.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
