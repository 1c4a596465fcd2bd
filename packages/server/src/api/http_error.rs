//! HTTP error handling
//!
//! Errors leave the API in the same `{code, status, message}` envelope as
//! successful responses. The HTTP status is derived from the outcome part of
//! the code.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use folio_core::services::{AccountError, GatewayError, GatewayResponse, UploadError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpError {
    /// `{scope}/{outcome}`, e.g. `node/not-found`
    pub code: String,
    pub message: String,
}

impl HttpError {
    pub fn new(scope: &str, outcome: &str, message: impl Into<String>) -> Self {
        Self {
            code: format!("{}/{}", scope, outcome),
            message: message.into(),
        }
    }

    pub fn gateway(scope: &str, err: GatewayError) -> Self {
        Self::new(scope, err.outcome(), err.to_string())
    }

    pub fn upload(err: UploadError) -> Self {
        Self::new("image", err.outcome(), err.to_string())
    }

    pub fn account(err: AccountError) -> Self {
        Self::new("auth", err.outcome(), err.to_string())
    }

    pub fn json_rejection(scope: &str, rejection: JsonRejection) -> Self {
        Self::new(scope, "invalid", rejection.body_text())
    }

    pub fn query_rejection(scope: &str, rejection: QueryRejection) -> Self {
        Self::new(scope, "invalid", rejection.body_text())
    }

    pub fn status(&self) -> StatusCode {
        let outcome = self.code.rsplit('/').next().unwrap_or_default();
        match outcome {
            "not-found" => StatusCode::NOT_FOUND,
            "invalid" => StatusCode::BAD_REQUEST,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = GatewayResponse::<()> {
            code: self.code,
            status: status.as_u16(),
            message: self.message,
            payload: None,
        };
        (status, Json(body)).into_response()
    }
}
