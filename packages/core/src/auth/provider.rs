//! AuthProvider Trait - Identity Service Abstraction

use async_trait::async_trait;
use thiserror::Error;

/// Account as reported by the identity service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthAccount {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Session token, when the provider issues one
    pub id_token: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The service refused the request (`EMAIL_EXISTS`, bad password, ...)
    #[error("{0}")]
    Rejected(String),

    /// The service could not be reached or answered unexpectedly
    #[error("{0}")]
    Unavailable(String),
}

/// Email/password identity service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account; `display_name` may be empty
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthAccount, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthAccount, AuthError>;
}
