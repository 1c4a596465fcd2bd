//! Identity Layer
//!
//! [`AuthProvider`] abstracts email/password accounts. [`IdentityToolkitAuth`]
//! talks to the hosted service; [`MemoryAuth`] keeps accounts in process.

mod identity_toolkit;
mod memory_auth;
mod provider;

pub use identity_toolkit::IdentityToolkitAuth;
pub use memory_auth::MemoryAuth;
pub use provider::{AuthAccount, AuthError, AuthProvider};

#[cfg(test)]
pub use provider::MockAuthProvider;
