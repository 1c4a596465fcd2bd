//! Account Service
//!
//! Sign-up, sign-in and profile lookup on top of an [`AuthProvider`] and the
//! `users` collection. Profiles are best-effort: a failed profile write does
//! not fail the signup, and a missing or unreadable profile falls back to a
//! placeholder user.

use crate::auth::{AuthAccount, AuthError, AuthProvider};
use crate::db::UserStore;
use crate::models::{Credentials, SignUpRequest, User, UserProfile};
use crate::services::error::AccountError;
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct AccountService {
    auth: Arc<dyn AuthProvider>,
    users: Arc<dyn UserStore>,
}

impl From<AuthError> for AccountError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected(reason) => AccountError::Rejected(reason),
            AuthError::Unavailable(reason) => AccountError::Unavailable(reason),
        }
    }
}

impl AccountService {
    pub fn new(auth: Arc<dyn AuthProvider>, users: Arc<dyn UserStore>) -> Self {
        Self { auth, users }
    }

    /// Create the account, then write its profile document
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<User, AccountError> {
        require("name", &request.name)?;
        require("email", &request.email)?;
        require("password", &request.password)?;

        let account = self
            .auth
            .sign_up(&request.email, &request.password, &request.name)
            .await
            .map_err(|e| {
                tracing::warn!("Sign-up refused for {}: {}", request.email, e);
                AccountError::from(e)
            })?;

        let profile = UserProfile {
            name: request.name.clone(),
            email: account.email.clone(),
            is_recruiter: true,
            created_at: Utc::now(),
        };
        if let Err(e) = self.users.put_profile(&account.user_id, profile).await {
            tracing::error!(
                "Error creating profile document for user {}: {:#}",
                account.user_id,
                e
            );
        }

        tracing::info!("Created account {}", account.user_id);
        Ok(User {
            id: account.user_id,
            name: request.name,
            email: account.email,
            display_name: account.display_name,
        })
    }

    /// Password sign-in; no profile document is required
    pub async fn sign_in(&self, credentials: Credentials) -> Result<User, AccountError> {
        require("email", &credentials.email)?;
        require("password", &credentials.password)?;

        let account = self
            .auth
            .sign_in(&credentials.email, &credentials.password)
            .await
            .map_err(|e| {
                tracing::warn!("Sign-in refused for {}: {}", credentials.email, e);
                AccountError::from(e)
            })?;

        tracing::info!("User {} signed in", account.user_id);
        Ok(user_from_account(account))
    }

    /// The stored profile, or a placeholder when it cannot be read
    pub async fn profile(&self, user_id: &str) -> User {
        match self.users.get_profile(user_id).await {
            Ok(Some(profile)) => User {
                id: user_id.to_string(),
                name: if profile.name.trim().is_empty() {
                    "User".to_string()
                } else {
                    profile.name
                },
                email: profile.email,
                display_name: None,
            },
            Ok(None) => User::fallback(user_id),
            Err(e) => {
                tracing::error!("Error fetching profile for user {}: {:#}", user_id, e);
                User::fallback(user_id)
            }
        }
    }
}

fn user_from_account(account: AuthAccount) -> User {
    User {
        id: account.user_id,
        name: account
            .display_name
            .clone()
            .unwrap_or_else(|| "User".to_string()),
        email: account.email,
        display_name: account.display_name,
    }
}

fn require(field: &str, value: &str) -> Result<(), AccountError> {
    if value.trim().is_empty() {
        return Err(AccountError::MissingField(field.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryAuth, MockAuthProvider};
    use crate::db::{MemoryStore, MockUserStore};
    use anyhow::anyhow;

    fn signup(email: &str) -> SignUpRequest {
        SignUpRequest {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_writes_recruiter_profile() {
        let users = Arc::new(MemoryStore::new());
        let service = AccountService::new(Arc::new(MemoryAuth::new()), users.clone());

        let user = service.sign_up(signup("ada@example.com")).await.unwrap();
        let profile = users.get_profile(&user.id).await.unwrap().unwrap();
        assert_eq!(profile.name, "Ada");
        assert!(profile.is_recruiter);

        let same = service.profile(&user.id).await;
        assert_eq!(same.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_profile_write_failure_does_not_fail_signup() {
        let mut users = MockUserStore::new();
        users
            .expect_put_profile()
            .times(1)
            .returning(|_, _| Err(anyhow!("quota exceeded")));
        let service = AccountService::new(Arc::new(MemoryAuth::new()), Arc::new(users));

        let user = service.sign_up(signup("ada@example.com")).await.unwrap();
        assert_eq!(user.name, "Ada");
    }

    #[tokio::test]
    async fn test_sign_in_without_profile() {
        let auth = Arc::new(MemoryAuth::new());
        auth.sign_up("ada@example.com", "secret1", "").await.unwrap();

        let mut users = MockUserStore::new();
        users.expect_get_profile().never();
        let service = AccountService::new(auth, Arc::new(users));

        let user = service
            .sign_in(Credentials {
                email: "ada@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.name, "User");
    }

    #[tokio::test]
    async fn test_profile_fallbacks() {
        let mut users = MockUserStore::new();
        users
            .expect_get_profile()
            .withf(|id| id == "missing")
            .returning(|_| Ok(None));
        users
            .expect_get_profile()
            .withf(|id| id == "broken")
            .returning(|_| Err(anyhow!("unavailable")));
        let service = AccountService::new(Arc::new(MemoryAuth::new()), Arc::new(users));

        assert_eq!(service.profile("missing").await, User::fallback("missing"));
        assert_eq!(service.profile("broken").await, User::fallback("broken"));
    }

    #[tokio::test]
    async fn test_provider_errors_map_to_account_errors() {
        let mut auth = MockAuthProvider::new();
        auth.expect_sign_in()
            .returning(|_, _| Err(AuthError::Unavailable("timeout".to_string())));
        let service = AccountService::new(Arc::new(auth), Arc::new(MemoryStore::new()));

        let err = service
            .sign_in(Credentials {
                email: "a@b.c".to_string(),
                password: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), 500);

        let err = service
            .sign_up(SignUpRequest {
                name: " ".to_string(),
                email: "a@b.c".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, AccountError::MissingField("name".to_string()));
    }
}
