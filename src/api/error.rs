use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::QueryError;

/// a failed table read, rendered as `500 {"error": <message>}`.
/// the driver error was already logged by the accessor.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    message: &'static str,
    #[source]
    source: QueryError,
}

impl ApiError {
    pub fn query(message: &'static str, source: QueryError) -> Self {
        Self { message, source }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
