use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown learner: {0}")]
    UnknownLearner(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No assessment submitted for learner {0}")]
    NoAssessment(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UnknownLearner(_) => "UNKNOWN_LEARNER",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NoAssessment(_) => "NO_ASSESSMENT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnknownLearner(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NoAssessment(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(format!("malformed payload: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::UnknownLearner(id) => {
                format!("Learner '{id}' not found. Please register first.")
            }
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::NoAssessment(id) => {
                format!("No assessment found for learner '{id}'. Please submit an assessment first.")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (self.status(), body).into_response()
    }
}
