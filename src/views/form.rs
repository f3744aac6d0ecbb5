use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use crate::error::AppError;
use crate::models::submission::NONCE_FIELD;
use crate::routes::submit::SUBMIT_ACTION;
use crate::state::SharedState;
use crate::submission::fields::ADDRESS_MAX_CHARS;
use crate::submission::pipeline::NONCE_ACTION;

#[derive(Template)]
#[template(path = "form.html")]
struct FormTemplate {
    submit_url: &'static str,
    action: &'static str,
    nonce_field: &'static str,
    nonce: String,
    address_max: usize,
    handler_url: String,
}

/// Data-entry form with a freshly issued anti-forgery token.
pub async fn form_page(State(state): State<SharedState>) -> Result<Response, AppError> {
    let nonce = state.nonces.issue(NONCE_ACTION).map_err(AppError::Internal)?;

    let template = FormTemplate {
        submit_url: "/submit",
        action: SUBMIT_ACTION,
        nonce_field: NONCE_FIELD,
        nonce,
        address_max: ADDRESS_MAX_CHARS,
        handler_url: state.config.handler_url(),
    };

    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("Template render failed: {e}")))?;
    Ok(Html(html).into_response())
}
