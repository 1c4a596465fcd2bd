//! In-process identity provider for tests and the `memory` backend
//!
//! Mirrors the hosted service's refusal codes. Passwords are kept in memory
//! for the life of the process only.

use crate::auth::provider::{AuthAccount, AuthError, AuthProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    user_id: String,
    password: String,
    display_name: Option<String>,
}

#[derive(Default)]
pub struct MemoryAuth {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthAccount, AuthError> {
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(AuthError::Rejected("INVALID_EMAIL".to_string()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Rejected(format!(
                "WEAK_PASSWORD : Password should be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&email) {
            return Err(AuthError::Rejected("EMAIL_EXISTS".to_string()));
        }

        let account = Account {
            user_id: Uuid::new_v4().simple().to_string(),
            password: password.to_string(),
            display_name: (!display_name.is_empty()).then(|| display_name.to_string()),
        };
        let result = AuthAccount {
            user_id: account.user_id.clone(),
            email: email.clone(),
            display_name: account.display_name.clone(),
            id_token: None,
        };
        accounts.insert(email, account);
        Ok(result)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthAccount, AuthError> {
        let email = normalize_email(email);
        let accounts = self.accounts.read().await;

        match accounts.get(&email) {
            Some(account) if account.password == password => Ok(AuthAccount {
                user_id: account.user_id.clone(),
                email,
                display_name: account.display_name.clone(),
                id_token: None,
            }),
            _ => Err(AuthError::Rejected("INVALID_LOGIN_CREDENTIALS".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let auth = MemoryAuth::new();
        let created = auth.sign_up("Ada@Example.com", "secret1", "Ada").await.unwrap();
        let signed_in = auth.sign_in("ada@example.com", "secret1").await.unwrap();
        assert_eq!(created.user_id, signed_in.user_id);
        assert_eq!(signed_in.display_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_refusals() {
        let auth = MemoryAuth::new();
        auth.sign_up("ada@example.com", "secret1", "").await.unwrap();

        assert_eq!(
            auth.sign_up("ada@example.com", "secret2", "").await,
            Err(AuthError::Rejected("EMAIL_EXISTS".to_string()))
        );
        assert!(auth.sign_up("bob@example.com", "123", "").await.is_err());
        assert_eq!(
            auth.sign_in("ada@example.com", "wrong").await,
            Err(AuthError::Rejected("INVALID_LOGIN_CREDENTIALS".to_string()))
        );
    }
}
