pub mod http;

use async_trait::async_trait;

use crate::credential::ServiceCredential;
use crate::models::{RelayOutcome, RelayPayload};

pub use http::HttpRelay;

/// Delivers a validated submission to the external handler.
///
/// Exactly one delivery attempt per call; failures are reported in the
/// outcome, never retried.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn relay(&self, payload: &RelayPayload, credential: &ServiceCredential) -> RelayOutcome;
}
