use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::rule_validator::RuleError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid auto rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, field, message) = match &self {
            AppError::InvalidRule(e) => (
                StatusCode::BAD_REQUEST,
                e.field().map(str::to_string),
                e.to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, None, msg.clone()),
            AppError::InvalidState(msg) => (StatusCode::BAD_REQUEST, None, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, None, msg.clone()),
            AppError::Database(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, None, self.to_string())
            }
        };

        let mut body = json!({ "error": message });
        if let Some(field) = field {
            body["field"] = json!(field);
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
