//! Store Error Types
//!
//! This module defines error types raised by the remote backend adapters:
//! transport failures, non-success HTTP statuses, and documents that do not
//! decode into the expected shape.

use thiserror::Error;

/// Remote store errors
///
/// Covers the failure cases of talking to the hosted document store,
/// object storage and identity service. Gateways fold these into
/// `GatewayError::Failed` with the display text as the cause.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("Remote service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The adapter is missing settings it needs
    #[error("Invalid store configuration: {0}")]
    Configuration(String),
}

impl StoreError {
    /// Create a transport error for the given endpoint
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Create a status error
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a status error from a Google API error body.
    ///
    /// Google REST services answer failures with
    /// `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`;
    /// when the body has another shape the raw text is kept instead.
    pub fn from_response_body(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .pointer("/error/message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());
        Self::status(status, message)
    }
}
