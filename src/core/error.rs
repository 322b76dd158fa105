use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::blood_requests::models::BloodRequestStatus;
use crate::shared::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
        current_role: Option<String>,
    },

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: BloodRequestStatus,
        to: BloodRequestStatus,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Database error occurred"),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            AppError::Validation(msg) => {
                let details = msg
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(msg).with_details(details),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, ErrorResponse::new(msg)),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorResponse::new(msg)),
            AppError::Forbidden {
                message,
                current_role,
            } => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new(message).with_current_role(current_role),
            ),
            e @ AppError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, ErrorResponse::new(e.to_string()))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::new(msg)),
            AppError::ExternalServiceError(msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, ErrorResponse::new(msg))
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
