use serde::{Deserialize, Serialize};

/// Wire body sent to the external handler. Only built from validated fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    Success,
    Failure(String),
}
