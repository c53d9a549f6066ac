use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::error::ApiError;
use crate::context::AppContext;
use crate::models::Record;

pub const USERS_ERROR: &str = "Error fetching users";
pub const MESSAGES_ERROR: &str = "Error fetching messages";
pub const QUESTIONS_ERROR: &str = "Error fetching questions";

#[derive(Serialize)]
pub struct HealthResponse {
    message: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "AI Mentor Bot backend is running",
    })
}

pub async fn list_users(State(ctx): State<AppContext>) -> Result<Json<Vec<Record>>, ApiError> {
    ctx.store
        .list_users()
        .await
        .map(Json)
        .map_err(|e| ApiError::query(USERS_ERROR, e))
}

pub async fn list_messages(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<Record>>, ApiError> {
    ctx.store
        .list_messages()
        .await
        .map(Json)
        .map_err(|e| ApiError::query(MESSAGES_ERROR, e))
}

pub async fn list_questions(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<Record>>, ApiError> {
    ctx.store
        .list_questions()
        .await
        .map(Json)
        .map_err(|e| ApiError::query(QUESTIONS_ERROR, e))
}
