// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::Config, error::AppError};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID.
    pub sub: String,
    /// Email the session was issued for; the join key into `users`.
    pub email: String,
    /// Issued-at as Unix timestamp.
    pub iat: usize,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Identity attached to a request once its bearer token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

/// Signing and verification keys for session tokens (HS256).
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration_seconds: u64,
}

impl SessionKeys {
    pub fn new(secret: &str, expiration_seconds: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiration_seconds,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiration)
    }

    pub fn expiration_seconds(&self) -> u64 {
        self.expiration_seconds
    }

    /// Signs a new session token for the user.
    pub fn sign(&self, user_id: Uuid, email: &str) -> Result<String, AppError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?
            .as_secs() as usize;

        let exp = usize::try_from(self.expiration_seconds)
            .ok()
            .and_then(|lifetime| now.checked_add(lifetime))
            .ok_or_else(|| {
                AppError::InternalServerError(format!(
                    "token lifetime of {}s overflows the expiration claim",
                    self.expiration_seconds
                ))
            })?;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            iat: now,
            exp,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(e.to_string()))
    }

    /// Verifies and decodes a JWT string.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

        Ok(token_data.claims)
    }

    /// Resolves the raw `Authorization` header value to a verified identity.
    ///
    /// Absent header, a scheme other than `Bearer`, an empty token, a bad
    /// signature, an expired token or an empty email claim are all
    /// `Unauthorized`.
    pub fn resolve(&self, authorization: Option<&str>) -> Result<AuthUser, AppError> {
        let token = match authorization {
            Some(value) => value
                .strip_prefix("Bearer ")
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".to_string()))?,
            None => return Err(AppError::Unauthorized("Missing bearer token".to_string())),
        };

        let claims = self.verify(token)?;
        if claims.email.is_empty() {
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }

        Ok(AuthUser {
            email: claims.email,
        })
    }
}

/// Axum Middleware: Authentication.
///
/// Validates the 'Authorization: Bearer <token>' header and injects
/// `AuthUser` into the request extensions. Rejects with 401 otherwise.
pub async fn auth_middleware(
    State(keys): State<SessionKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let user = keys.resolve(auth_header).inspect_err(|e| {
        tracing::debug!("Rejected request to {}: {:?}", req.uri().path(), e);
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
    }
}
