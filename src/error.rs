use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::models::SubmissionResponse;

/// Terminal failures of a submission. None of them are retried.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionError {
    Security,
    Validation(Vec<String>),
    Delivery(String),
    UnknownAction,
    MalformedBody(String),
    BodyTooLarge,
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::Security => write!(f, "Security check failed."),
            SubmissionError::Validation(errors) => write!(f, "Validation error: {}", errors.join(" ")),
            SubmissionError::Delivery(reason) => write!(
                f,
                "We are sorry, something went wrong during submission. {reason}"
            ),
            SubmissionError::UnknownAction => write!(f, "Unknown action."),
            SubmissionError::MalformedBody(_) => write!(f, "Malformed request body."),
            SubmissionError::BodyTooLarge => write!(f, "Request body too large."),
        }
    }
}

impl SubmissionError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmissionError::Security => StatusCode::BAD_REQUEST,
            SubmissionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SubmissionError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SubmissionError::UnknownAction => StatusCode::BAD_REQUEST,
            SubmissionError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            SubmissionError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Render as the caller-facing response carrying `elapsed_seconds`.
    pub fn respond(self, elapsed_seconds: f64) -> SubmissionResponse {
        SubmissionResponse::error(self.to_string(), elapsed_seconds, self.status())
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        self.respond(0.0).into_response()
    }
}

#[derive(Debug)]
pub enum AppError {
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
