// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    error::{AppError, ErrorBody},
    models::user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    services::AuthService,
    utils::{extract::ValidatedJson, jwt::SessionKeys},
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with a confirmation message only.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Malformed input", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn register(
    State(auth): State<AuthService>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("POST /register - Register request for email: {}", payload.email);

    auth.register(payload).await.inspect_err(|e| {
        tracing::info!("POST /register - Rejected: {}", e.kind());
    })?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Authenticates a user and returns a session token.
///
/// Verifies the email and password against the database.
/// If valid, signs a JWT carrying the user's ID and email.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed input", body = ErrorBody),
        (status = 401, description = "Invalid email or password", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login(
    State(auth): State<AuthService>,
    State(keys): State<SessionKeys>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("POST /login - Login attempt for email: {}", payload.email);

    let outcome = auth.login(payload).await.inspect_err(|e| {
        tracing::info!("POST /login - Rejected: {}", e.kind());
    })?;

    let token = keys.sign(outcome.user_id, &outcome.user.email)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: outcome.user,
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: keys.expiration_seconds(),
    }))
}
