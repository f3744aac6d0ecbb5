use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use crate::credential::ServiceCredential;
use crate::models::{RelayOutcome, RelayPayload};

use super::Relay;

pub const AUTH_HEADER: &str = "X-Auth-Token";

pub struct HttpRelay {
    client: reqwest::Client,
    url: String,
}

impl HttpRelay {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn relay(&self, payload: &RelayPayload, credential: &ServiceCredential) -> RelayOutcome {
        let started = Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header(AUTH_HEADER, credential.expose())
            .json(payload)
            .send()
            .await;

        let resp = match resp {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(url = %self.url, "Relay request failed: {e}");
                return RelayOutcome::Failure(format!("Request error: {}", describe(&e)));
            }
        };

        let status = resp.status();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url = %self.url, "Relay response unreadable: {e}");
                return RelayOutcome::Failure(format!("Request error: {}", describe(&e)));
            }
        };

        tracing::info!(
            url = %self.url,
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Relayed submission"
        );

        interpret(status.as_u16(), &body)
    }
}

/// Map the handler's status code and body to an outcome.
pub fn interpret(status: u16, body: &str) -> RelayOutcome {
    if !(200..300).contains(&status) {
        return RelayOutcome::Failure(format!("Handler HTTP error {status}."));
    }

    let acknowledged = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("status").and_then(Value::as_str).map(|s| s == "ok"))
        .unwrap_or(false);

    if acknowledged {
        RelayOutcome::Success
    } else {
        RelayOutcome::Failure("Handler returned unexpected response.".to_string())
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "operation timed out".to_string()
    } else if err.is_connect() {
        "could not connect to handler".to_string()
    } else {
        err.to_string()
    }
}
