// src/repositories/quiz_result_repository.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::quiz_result::{NewQuizResult, QuizResult},
};

/// Append-only storage of quiz attempts.
#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    /// Any storage failure surfaces as `AppError::Persistence`.
    async fn insert(&self, result: NewQuizResult) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<QuizResult>>;

    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<QuizResult>>;

    async fn exists_for_level(&self, user_id: Uuid, level: &str) -> AppResult<bool>;
}

pub struct PgQuizResultRepository {
    pool: PgPool,
}

impl PgQuizResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        user_id,
        level,
        score,
        total_questions,
        percentage::FLOAT8 AS percentage,
        time_spent,
        answers,
        created_at
    FROM quiz_results
"#;

#[async_trait]
impl QuizResultRepository for PgQuizResultRepository {
    async fn insert(&self, result: NewQuizResult) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO quiz_results
                (id, user_id, level, score, total_questions, percentage, time_spent, answers)
            VALUES ($1, $2, $3, $4, $5, CAST($6 AS NUMERIC(5, 2)), $7, $8)
            "#,
        )
        .bind(result.id)
        .bind(result.user_id)
        .bind(&result.level)
        .bind(result.score)
        .bind(result.total_questions)
        .bind(result.percentage)
        .bind(result.time_spent)
        .bind(Json(&result.answers))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert quiz result: {:?}", e);
            AppError::Persistence(e.to_string())
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<QuizResult>> {
        let query = format!("{} WHERE id = $1", SELECT_COLUMNS);
        let result = sqlx::query_as::<_, QuizResult>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<QuizResult>> {
        let query = format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC, seq DESC",
            SELECT_COLUMNS
        );
        let results = sqlx::query_as::<_, QuizResult>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list quiz results: {:?}", e);
                AppError::from(e)
            })?;

        Ok(results)
    }

    async fn exists_for_level(&self, user_id: Uuid, level: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM quiz_results WHERE user_id = $1 AND level = $2)",
        )
        .bind(user_id)
        .bind(level)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
