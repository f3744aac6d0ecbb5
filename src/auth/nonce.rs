use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Anti-forgery token claims. `act` scopes the token to one form action.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NonceClaims {
    pub act: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and checks action-scoped anti-forgery tokens.
pub struct NonceIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl NonceIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, action: &str) -> Result<String, String> {
        let now = Utc::now().timestamp();
        let claims = NonceClaims {
            act: action.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };
        self.encode_claims(&claims)
    }

    pub fn verify(&self, token: &str, action: &str) -> Result<(), String> {
        let token = token.trim();
        if token.is_empty() {
            return Err("Missing token".to_string());
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<NonceClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| format!("Token decode failed: {e}"))?;

        if claims.act != action {
            return Err(format!("Token issued for action '{}'", claims.act));
        }
        Ok(())
    }

    fn encode_claims(&self, claims: &NonceClaims) -> Result<String, String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| format!("Token encode failed: {e}"))
    }
}
