// src/handlers/root.rs

use axum::{Json, response::IntoResponse};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Server is running")),
    tag = "health"
)]
pub async fn root() -> impl IntoResponse {
    tracing::info!("GET / - Root endpoint accessed");
    Json(json!({ "message": "Server is running!" }))
}
