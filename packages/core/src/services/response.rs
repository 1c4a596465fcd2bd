//! Tagged response envelope
//!
//! Every gateway outcome can be rendered as
//! `{ "code": "node/success", "status": 200, "message": "...", "payload": ... }`.
//! The code is `{scope}/{outcome}` and `status` is the HTTP-style status the
//! API layer answers with.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse<T> {
    pub code: String,
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> GatewayResponse<T> {
    pub fn new(scope: &str, outcome: &str, status: u16, message: impl Into<String>) -> Self {
        Self {
            code: format!("{}/{}", scope, outcome),
            status,
            message: message.into(),
            payload: None,
        }
    }

    pub fn success(scope: &str, message: impl Into<String>, payload: T) -> Self {
        Self::new(scope, "success", 200, message).with_payload(payload)
    }

    /// Success without a payload (update, delete, image removal)
    pub fn done(scope: &str, message: impl Into<String>) -> Self {
        Self::new(scope, "success", 200, message)
    }

    pub fn with_payload(mut self, payload: T) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
