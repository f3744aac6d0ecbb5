pub mod nonce;
pub mod submit;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/submit", post(submit::submit))
        .route("/nonce", get(nonce::issue))
}
