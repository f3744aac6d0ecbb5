use std::sync::Arc;

use crate::auth::nonce::NonceIssuer;
use crate::config::Config;
use crate::credential::ServiceCredential;
use crate::relay::Relay;

pub type SharedState = Arc<AppState>;

/// Read-only after startup; shared by every request.
pub struct AppState {
    pub config: Config,
    pub credential: ServiceCredential,
    pub nonces: NonceIssuer,
    pub relay: Arc<dyn Relay>,
}

impl AppState {
    pub fn new(config: Config, credential: ServiceCredential, relay: Arc<dyn Relay>) -> Self {
        let nonces = NonceIssuer::new(&config.nonce_secret, config.nonce_ttl);
        Self {
            config,
            credential,
            nonces,
            relay,
        }
    }
}
