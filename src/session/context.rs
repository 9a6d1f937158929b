//! Session context passed into every authenticated call
//!
//! The context holds the most recently decrypted token. Callers decide when
//! to re-read the vault with [`SessionContext::refresh`]; the repository
//! refreshes before each request so a rotated token is always used.

use super::vault::CredentialVault;
use crate::config::{secret_string, SecretString};
use crate::domain::Result;
use secrecy::ExposeSecret;
use std::sync::{Arc, RwLock};

/// Authenticated-call context with an explicit refresh/clear lifecycle
pub struct SessionContext {
    vault: Arc<CredentialVault>,
    token: RwLock<SecretString>,
}

impl SessionContext {
    /// Create a context with no token loaded yet
    pub fn new(vault: Arc<CredentialVault>) -> Self {
        Self {
            vault,
            token: RwLock::new(secret_string(String::new())),
        }
    }

    /// Create a context and load the token immediately
    pub async fn open(vault: Arc<CredentialVault>) -> Self {
        let context = Self::new(vault);
        context.refresh().await;
        context
    }

    /// Re-read and decrypt the stored token; returns whether one is usable
    pub async fn refresh(&self) -> bool {
        let token = self.vault.get_token().await;
        let authenticated = !token.expose_secret().is_empty();
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
        authenticated
    }

    /// Drop the in-memory token and remove the stored one
    ///
    /// # Errors
    ///
    /// Returns an error if the stored token cannot be removed. The in-memory
    /// token is cleared either way.
    pub async fn clear(&self) -> Result<()> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = secret_string(String::new());
        self.vault.clear().await
    }

    /// True when the last refresh produced a non-empty token
    pub fn is_authenticated(&self) -> bool {
        !self
            .token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .expose_secret()
            .is_empty()
    }

    /// `Authorization` header value, `None` when unauthenticated
    pub fn bearer(&self) -> Option<String> {
        let token = self
            .token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let token = token.expose_secret();
        if token.is_empty() {
            None
        } else {
            Some(format!("Bearer {}", token.as_str()))
        }
    }

    /// The vault this context reads from
    pub fn vault(&self) -> &Arc<CredentialVault> {
        &self.vault
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::MemoryTokenStore;

    fn vault() -> Arc<CredentialVault> {
        Arc::new(CredentialVault::new(
            Arc::new(MemoryTokenStore::new()),
            "token",
            secret_string("k".to_string()),
        ))
    }

    #[tokio::test]
    async fn test_new_context_is_unauthenticated() {
        let ctx = SessionContext::new(vault());
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.bearer(), None);
    }

    #[tokio::test]
    async fn test_refresh_picks_up_stored_token() {
        let vault = vault();
        let ctx = SessionContext::open(vault.clone()).await;
        assert!(!ctx.is_authenticated());

        vault.store_token("abc").await.unwrap();
        assert!(ctx.refresh().await);
        assert_eq!(ctx.bearer().as_deref(), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_clear_drops_token_everywhere() {
        let vault = vault();
        vault.store_token("abc").await.unwrap();
        let ctx = SessionContext::open(vault.clone()).await;
        assert!(ctx.is_authenticated());

        ctx.clear().await.unwrap();
        assert!(!ctx.is_authenticated());
        assert!(!ctx.refresh().await);
    }
}
