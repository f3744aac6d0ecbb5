use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::SubmissionError;
use crate::models::{SubmissionRequest, SubmissionResponse};
use crate::state::SharedState;
use crate::submission::{parser, pipeline};

/// Value of the `action` field the form posts.
pub const SUBMIT_ACTION: &str = "tt_submit";

pub type ActionHandler = fn(SharedState, SubmissionRequest) -> BoxFuture<'static, SubmissionResponse>;

/// Form actions accepted on the submission endpoint.
const ACTIONS: &[(&str, ActionHandler)] = &[(SUBMIT_ACTION, submit_contact as ActionHandler)];

fn submit_contact(state: SharedState, request: SubmissionRequest) -> BoxFuture<'static, SubmissionResponse> {
    Box::pin(async move { pipeline::run(&state, request).await })
}

pub fn resolve(action: &str) -> Option<ActionHandler> {
    ACTIONS
        .iter()
        .find(|(name, _)| *name == action)
        .map(|(_, handler)| *handler)
}

pub async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let span = tracing::info_span!("submission", id = %Uuid::now_v7());

    async move {
        let body = match body {
            Ok(body) => body,
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::debug!("Rejected oversized body: {rejection}");
                return SubmissionError::BodyTooLarge.into_response();
            }
            Err(rejection) => {
                tracing::debug!("Unreadable body: {rejection}");
                return SubmissionError::MalformedBody(rejection.body_text()).into_response();
            }
        };

        let form = match parser::parse_form(&headers, body).await {
            Ok(form) => form,
            Err(e) => {
                tracing::debug!("Rejected body: {e}");
                return SubmissionError::MalformedBody(e).into_response();
            }
        };

        let request = SubmissionRequest::from_form(&form);
        let Some(handler) = request.action.as_deref().and_then(resolve) else {
            tracing::debug!("Unknown action: {:?}", request.action);
            return SubmissionError::UnknownAction.into_response();
        };

        handler(state, request).await.into_response()
    }
    .instrument(span)
    .await
}
