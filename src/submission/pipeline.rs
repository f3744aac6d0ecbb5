use axum::http::StatusCode;

use crate::error::SubmissionError;
use crate::models::{RelayOutcome, RelayPayload, SubmissionRequest, SubmissionResponse};
use crate::state::AppState;

use super::fields::{self, ValidationResult};
use super::timing;

/// Action the anti-forgery token is scoped to.
pub const NONCE_ACTION: &str = "tt_submit";

pub const SUCCESS_MESSAGE: &str = "Thank you! Your information has been submitted successfully.";

/// AuthCheck, Validate, Relay, Respond. Every path yields exactly one response.
pub async fn run(state: &AppState, request: SubmissionRequest) -> SubmissionResponse {
    let token = request.anti_forgery_token.as_deref().unwrap_or("");
    if let Err(e) = state.nonces.verify(token, NONCE_ACTION) {
        tracing::warn!("Security check failed: {e}");
        // No trusted start time yet, so no elapsed time either.
        return SubmissionError::Security.respond(0.0);
    }

    let fields = match fields::validate(&request.fields) {
        ValidationResult::Valid(fields) => fields,
        ValidationResult::Invalid(errors) => {
            tracing::debug!("Validation failed: {:?}", errors);
            let elapsed = timing::elapsed(request.start_time);
            return SubmissionError::Validation(errors).respond(elapsed);
        }
    };

    let payload = RelayPayload::from(fields);
    let outcome = state.relay.relay(&payload, &state.credential).await;
    let elapsed = timing::elapsed(request.start_time);

    match outcome {
        RelayOutcome::Success => {
            tracing::info!(elapsed = %timing::format_elapsed(elapsed), "Submission delivered");
            SubmissionResponse::success(SUCCESS_MESSAGE, elapsed, StatusCode::CREATED)
        }
        RelayOutcome::Failure(reason) => {
            tracing::warn!("Submission not delivered: {reason}");
            SubmissionError::Delivery(reason).respond(elapsed)
        }
    }
}
