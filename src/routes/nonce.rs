use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::AppError;
use crate::models::submission::NONCE_FIELD;
use crate::state::SharedState;
use crate::submission::pipeline::NONCE_ACTION;

#[derive(Serialize)]
pub struct NonceResponse {
    pub field: &'static str,
    pub token: String,
}

/// Issue a fresh anti-forgery token for clients rendering their own form.
pub async fn issue(State(state): State<SharedState>) -> Result<Json<NonceResponse>, AppError> {
    let token = state.nonces.issue(NONCE_ACTION).map_err(AppError::Internal)?;
    Ok(Json(NonceResponse {
        field: NONCE_FIELD,
        token,
    }))
}
