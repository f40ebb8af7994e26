use axum::response::IntoResponse;
use http::StatusCode;
use thiserror::Error;

/// Transport-level failures. Handler failures never reach this type; they are
/// shown to the user as message panels instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown component: {0}")]
    UnknownComponent(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::UnknownComponent(id) => {
                (StatusCode::BAD_REQUEST, format!("Unknown component: {}", id)).into_response()
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
