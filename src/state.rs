use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppResult,
    repositories::{PgQuizResultRepository, PgUserRepository, QuizResultRepository, UserRepository},
    services::{AuthService, QuizService},
    utils::{hash::CredentialHasher, jwt::SessionKeys},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub keys: SessionKeys,
    pub auth: AuthService,
    pub quizzes: QuizService,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        results: Arc<dyn QuizResultRepository>,
    ) -> AppResult<Self> {
        let hasher = Arc::new(CredentialHasher::from_config(&config.hash)?);

        Ok(Self {
            keys: SessionKeys::from_config(&config),
            auth: AuthService::new(Arc::clone(&users), hasher),
            quizzes: QuizService::new(users, results),
            config,
        })
    }

    /// State backed by the Postgres repositories.
    pub fn postgres(pool: PgPool, config: Config) -> AppResult<Self> {
        Self::new(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgQuizResultRepository::new(pool)),
        )
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for QuizService {
    fn from_ref(state: &AppState) -> Self {
        state.quizzes.clone()
    }
}
