// src/repositories/user_repository.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::user::{NewUser, User},
    repositories::is_unique_violation,
};

pub const EMAIL_ALREADY_REGISTERED: &str = "Email already registered";

/// Lookup and insert of user records, keyed by email.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact, case-sensitive match.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fails with `AppError::Conflict` when the email is already taken.
    async fn insert(&self, user: NewUser) -> AppResult<User>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user by email: {:?}", e);
            AppError::from(e)
        })?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, full_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, full_name, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(EMAIL_ALREADY_REGISTERED.to_string())
            } else {
                tracing::error!("Failed to register user: {:?}", e);
                AppError::from(e)
            }
        })
    }
}
