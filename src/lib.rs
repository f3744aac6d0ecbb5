pub mod config;
pub mod error;
pub mod state;
pub mod auth;
pub mod credential;
pub mod models;
pub mod relay;
pub mod routes;
pub mod views;
pub mod submission;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::credential::ServiceCredential;
use crate::relay::{HttpRelay, Relay};
use crate::state::{AppState, SharedState};

/// Build the router with the HTTP relay pointed at the configured handler.
pub fn build_app(config: Config, credential: ServiceCredential) -> Result<Router, String> {
    let handler_url = config.handler_url();
    let relay = HttpRelay::new(handler_url.clone(), config.handler.timeout)?;
    tracing::info!("Relaying submissions to {handler_url}");
    Ok(build_app_with_relay(config, credential, Arc::new(relay)))
}

pub fn build_app_with_relay(
    config: Config,
    credential: ServiceCredential,
    relay: Arc<dyn Relay>,
) -> Router {
    let max_body_size = config.max_body_size;
    let state: SharedState = Arc::new(AppState::new(config, credential, relay));

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    Router::new()
        .merge(routes::api_routes())
        .merge(views::view_routes())
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(security_headers)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
