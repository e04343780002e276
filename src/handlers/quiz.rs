// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::{AppError, ErrorBody},
    models::quiz_result::{QuizResultInput, QuizResultView},
    services::QuizService,
    utils::{extract::ValidatedJson, jwt::AuthUser},
};

/// Records a completed quiz attempt for the caller.
///
/// Returns the stored record, including the server-assigned `id` and
/// `created_at`.
#[utoipa::path(
    post,
    path = "/quiz-results",
    request_body = QuizResultInput,
    responses(
        (status = 201, description = "Quiz result stored", body = QuizResultView),
        (status = 400, description = "Malformed input or storage failure", body = ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "quiz"
)]
pub async fn submit_quiz_result(
    State(quizzes): State<QuizService>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<QuizResultInput>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(
        "POST /quiz-results - Submission for email: {}, level: {}",
        user.email,
        input.level
    );

    let result = quizzes.submit(&user.email, input).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// Lists the caller's quiz results, most recent first.
#[utoipa::path(
    get,
    path = "/quiz-results/me",
    responses(
        (status = 200, description = "Caller's quiz results", body = [QuizResultView]),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "quiz"
)]
pub async fn get_my_quiz_results(
    State(quizzes): State<QuizService>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let results = quizzes.list_mine(&user.email).await?;
    tracing::debug!("GET /quiz-results/me - {} results for {}", results.len(), user.email);

    Ok(Json(results))
}

/// Whether the caller has at least one result at `level`.
#[utoipa::path(
    get,
    path = "/quiz-results/has-taken/{level}",
    params(("level" = String, Path, description = "Quiz level label")),
    responses(
        (status = 200, description = "true when a result exists", body = bool),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "quiz"
)]
pub async fn has_taken_quiz(
    State(quizzes): State<QuizService>,
    user: AuthUser,
    Path(level): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let taken = quizzes.has_taken(&user.email, &level).await?;

    Ok(Json(taken))
}
