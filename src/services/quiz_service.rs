// src/services/quiz_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        quiz_result::{QuizResultInput, QuizResultView},
        user::User,
    },
    repositories::{QuizResultRepository, UserRepository},
    services::USER_NOT_FOUND,
};

/// Quiz results, always scoped to the owner resolved from the session.
#[derive(Clone)]
pub struct QuizService {
    users: Arc<dyn UserRepository>,
    results: Arc<dyn QuizResultRepository>,
}

impl QuizService {
    pub fn new(users: Arc<dyn UserRepository>, results: Arc<dyn QuizResultRepository>) -> Self {
        Self { users, results }
    }

    /// A verified session whose email has no `users` row is a 404, not a 401.
    async fn owner(&self, email: &str) -> AppResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))
    }

    /// Stores one attempt and returns it as re-read from storage, so `id`
    /// and `created_at` are the persisted values.
    pub async fn submit(&self, owner_email: &str, input: QuizResultInput) -> AppResult<QuizResultView> {
        let owner = self.owner(owner_email).await?;

        let id = Uuid::new_v4();
        self.results.insert(input.into_new_result(id, owner.id)).await?;

        let stored = self.results.find_by_id(id).await?.ok_or_else(|| {
            AppError::InternalServerError(format!("quiz result {} missing after insert", id))
        })?;

        tracing::info!("Stored quiz result {} for user {}", id, owner.id);
        Ok(QuizResultView::from(stored))
    }

    /// Newest first.
    pub async fn list_mine(&self, owner_email: &str) -> AppResult<Vec<QuizResultView>> {
        let owner = self.owner(owner_email).await?;

        let results = self.results.list_by_user(owner.id).await?;
        Ok(results.into_iter().map(QuizResultView::from).collect())
    }

    pub async fn has_taken(&self, owner_email: &str, level: &str) -> AppResult<bool> {
        let owner = self.owner(owner_email).await?;
        self.results.exists_for_level(owner.id, level).await
    }
}
