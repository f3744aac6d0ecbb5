use std::collections::HashMap;

/// Form field carrying the anti-forgery token.
pub const NONCE_FIELD: &str = "tt_nonce";

/// The five personal-data fields exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// One inbound submission. `start_time` is client-reported and untrusted.
#[derive(Debug, Clone, Default)]
pub struct SubmissionRequest {
    pub action: Option<String>,
    pub anti_forgery_token: Option<String>,
    pub start_time: f64,
    pub fields: RawFields,
}

impl SubmissionRequest {
    /// Build a request from decoded form pairs. Missing fields become empty
    /// strings and an unparseable `start_time` becomes 0.
    pub fn from_form(form: &HashMap<String, String>) -> Self {
        let text = |key: &str| form.get(key).cloned().unwrap_or_default();

        Self {
            action: form.get("action").cloned(),
            anti_forgery_token: form.get(NONCE_FIELD).cloned(),
            start_time: parse_start_time(form.get("start_time").map(String::as_str)),
            fields: RawFields {
                first_name: text("first_name"),
                last_name: text("last_name"),
                email: text("email"),
                phone: text("phone"),
                address: text("address"),
            },
        }
    }
}

fn parse_start_time(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
