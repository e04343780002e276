// src/services/auth_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::user::{LoginRequest, NewUser, RegisterRequest, UserPublicView},
    repositories::{UserRepository, user_repository::EMAIL_ALREADY_REGISTERED},
    utils::hash::CredentialHasher,
};

/// Successful login. The password hash stays behind.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user_id: Uuid,
    pub user: UserPublicView,
}

/// Registration and login.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<CredentialHasher>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<CredentialHasher>) -> Self {
        Self { users, hasher }
    }

    /// Registers a new user.
    ///
    /// The lookup gives the friendly error in the common case; the unique
    /// index on `users.email` still decides when two registrations race, and
    /// the repository reports that as the same `Conflict`.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<()> {
        if self.users.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::Conflict(EMAIL_ALREADY_REGISTERED.to_string()));
        }

        let hasher = Arc::clone(&self.hasher);
        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

        let user = self
            .users
            .insert(NewUser {
                id: Uuid::new_v4(),
                email: req.email,
                password_hash,
                full_name: req.full_name,
            })
            .await?;

        tracing::info!("Registered user {}", user.id);
        Ok(())
    }

    /// Authenticates by email and password.
    ///
    /// Unknown email and wrong password fail identically, and both run one
    /// hash verification.
    pub async fn login(&self, req: LoginRequest) -> AppResult<LoginOutcome> {
        let user = self.users.find_by_email(&req.email).await?;

        let hasher = Arc::clone(&self.hasher);
        let password = req.password;
        let (user, is_valid) = tokio::task::spawn_blocking(move || match user {
            Some(user) => {
                let is_valid = hasher.verify(&password, &user.password_hash);
                (Some(user), is_valid)
            }
            None => (None, hasher.verify_dummy(&password)),
        })
        .await?;

        match user {
            Some(user) if is_valid => Ok(LoginOutcome {
                user_id: user.id,
                user: UserPublicView::from(user),
            }),
            _ => Err(AppError::InvalidCredentials),
        }
    }
}
