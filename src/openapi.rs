// src/openapi.rs

use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    error::ErrorBody,
    handlers::{auth, quiz, root},
    models::{
        quiz_result::{AnswerDetail, QuizResultInput, QuizResultView},
        user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserPublicView},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        auth::register,
        auth::login,
        quiz::submit_quiz_result,
        quiz::get_my_quiz_results,
        quiz::has_taken_quiz,
    ),
    components(schemas(
        ErrorBody,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        UserPublicView,
        AnswerDetail,
        QuizResultInput,
        QuizResultView,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "quiz", description = "Quiz results of the signed-in user"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
