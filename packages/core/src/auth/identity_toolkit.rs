//! Google Identity Toolkit adapter
//!
//! Email/password accounts through `accounts:signUp` and
//! `accounts:signInWithPassword`. The service reports refusals as `400` with
//! a reason code in `error.message` (`EMAIL_EXISTS`, `WEAK_PASSWORD : ...`,
//! `INVALID_LOGIN_CREDENTIALS`); those become [`AuthError::Rejected`].

use crate::auth::provider::{AuthAccount, AuthError, AuthProvider};
use crate::config::FolioConfig;
use crate::db::{RestClient, StoreError};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

impl From<AccountResponse> for AuthAccount {
    fn from(response: AccountResponse) -> Self {
        Self {
            user_id: response.local_id,
            email: response.email,
            display_name: response.display_name.filter(|n| !n.is_empty()),
            id_token: response.id_token,
        }
    }
}

pub struct IdentityToolkitAuth {
    rest: RestClient,
    endpoint: String,
}

impl IdentityToolkitAuth {
    pub fn new(rest: RestClient, endpoint: impl Into<String>) -> Self {
        Self {
            rest,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &FolioConfig) -> Result<Self, StoreError> {
        Ok(Self::new(
            RestClient::from_config(config)?,
            config.firebase.identity_endpoint.clone(),
        ))
    }

    async fn call(&self, action: &str, body: PasswordRequest<'_>) -> Result<AuthAccount, AuthError> {
        let url = format!("{}/accounts:{}", self.endpoint, action);
        let request = self.rest.request(Method::POST, &url).json(&body);

        let response: AccountResponse = self
            .rest
            .json(request, &url)
            .await
            .map_err(map_store_error)?;
        Ok(response.into())
    }
}

fn map_store_error(err: StoreError) -> AuthError {
    match err {
        StoreError::Status { status: 400, message } => AuthError::Rejected(message),
        other => AuthError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl AuthProvider for IdentityToolkitAuth {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthAccount, AuthError> {
        let body = PasswordRequest {
            email,
            password,
            display_name: (!display_name.is_empty()).then_some(display_name),
            return_secure_token: true,
        };
        self.call("signUp", body).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthAccount, AuthError> {
        let body = PasswordRequest {
            email,
            password,
            display_name: None,
            return_secure_token: true,
        };
        self.call("signInWithPassword", body).await
    }
}
