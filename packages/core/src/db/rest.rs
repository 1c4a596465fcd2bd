//! Shared REST transport for the hosted backend
//!
//! Firestore, Firebase Storage and Identity Toolkit all speak JSON over HTTPS
//! with the same credentials and the same error envelope. This adapter owns
//! those transport details: the request timeout, the `key` query parameter,
//! bearer auth, and mapping of transport/status failures to `StoreError`.

use crate::config::FolioConfig;
use crate::db::error::StoreError;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct RestClient {
    client: Client,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl RestClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        timeout: Duration,
        api_key: Option<String>,
        access_token: Option<String>,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::configuration(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            access_token: access_token.filter(|t| !t.is_empty()),
        })
    }

    pub fn from_config(config: &FolioConfig) -> Result<Self, StoreError> {
        Self::new(
            config.request_timeout(),
            Some(config.firebase.api_key.clone()),
            config.firebase.access_token.clone(),
        )
    }

    /// Start a request carrying the configured credentials
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.query(&[("key", key.as_str())]);
        }
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<(StatusCode, Vec<u8>), StoreError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::transport(endpoint, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::transport(endpoint, e))?;
        Ok((status, body.to_vec()))
    }

    /// Send and decode a JSON body; any non-success status is an error
    pub async fn json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, StoreError> {
        let (status, body) = self.execute(builder, endpoint).await?;
        if !status.is_success() {
            return Err(StoreError::from_response_body(status.as_u16(), &body));
        }
        decode_body(&body, endpoint)
    }

    /// Like [`json`](Self::json), but a 404 is `Ok(None)`
    pub async fn optional_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<Option<T>, StoreError> {
        let (status, body) = self.execute(builder, endpoint).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::from_response_body(status.as_u16(), &body));
        }
        decode_body(&body, endpoint).map(Some)
    }

    /// Send and discard the body; any non-success status is an error
    pub async fn expect_success(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<(), StoreError> {
        let (status, body) = self.execute(builder, endpoint).await?;
        if !status.is_success() {
            return Err(StoreError::from_response_body(status.as_u16(), &body));
        }
        Ok(())
    }
}

fn decode_body<T: DeserializeOwned>(body: &[u8], endpoint: &str) -> Result<T, StoreError> {
    // Successful deletes and empty lists come back as `{}` or nothing at all
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    serde_json::from_slice(body)
        .map_err(|e| StoreError::decode(format!("{} returned invalid JSON: {}", endpoint, e)))
}
