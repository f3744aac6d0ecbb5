use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::submission::timing;

/// The single artifact returned for every submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResponse {
    pub ok: bool,
    pub message: String,
    pub elapsed_seconds: f64,
    pub http_status: StatusCode,
}

#[derive(Serialize)]
struct Envelope<'a> {
    success: bool,
    data: EnvelopeData<'a>,
}

#[derive(Serialize)]
struct EnvelopeData<'a> {
    message: &'a str,
    time: String,
}

impl SubmissionResponse {
    pub fn success(message: impl Into<String>, elapsed_seconds: f64, http_status: StatusCode) -> Self {
        Self {
            ok: true,
            message: message.into(),
            elapsed_seconds: elapsed_seconds.max(0.0),
            http_status,
        }
    }

    pub fn error(message: impl Into<String>, elapsed_seconds: f64, http_status: StatusCode) -> Self {
        Self {
            ok: false,
            message: message.into(),
            elapsed_seconds: elapsed_seconds.max(0.0),
            http_status,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.envelope()).unwrap_or_default()
    }

    fn envelope(&self) -> Envelope<'_> {
        Envelope {
            success: self.ok,
            data: EnvelopeData {
                message: &self.message,
                time: timing::format_elapsed(self.elapsed_seconds),
            },
        }
    }
}

impl IntoResponse for SubmissionResponse {
    fn into_response(self) -> Response {
        (self.http_status, Json(self.envelope())).into_response()
    }
}
