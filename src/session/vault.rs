//! Encrypted bearer token access
//!
//! The vault never caches plaintext. Every [`CredentialVault::get_token`] call
//! reads the stored value and decrypts it again, so a token rotated by another
//! process is picked up on the next call.

use super::cipher::{decrypt_token, encrypt_token};
use super::store::{FileTokenStore, TokenStore};
use crate::config::{secret_string, SessionConfig, SecretString, FALLBACK_SECRET_KEY};
use crate::domain::Result;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Holds the storage handle and the passphrase for the session token
pub struct CredentialVault {
    store: Arc<dyn TokenStore>,
    storage_key: String,
    passphrase: SecretString,
}

impl CredentialVault {
    /// Create a vault over an arbitrary store
    pub fn new(
        store: Arc<dyn TokenStore>,
        storage_key: impl Into<String>,
        passphrase: SecretString,
    ) -> Self {
        Self {
            store,
            storage_key: storage_key.into(),
            passphrase,
        }
    }

    /// Build a file-backed vault from configuration
    ///
    /// Falls back to [`FALLBACK_SECRET_KEY`] when no passphrase is configured
    /// and logs a warning, since anyone with the source can decrypt the token.
    pub fn from_config(config: &SessionConfig) -> Self {
        let passphrase = if config.uses_fallback_key() {
            tracing::warn!(
                "session.secret_key is not set; using the built-in fallback passphrase. \
                 Configure a secret key before deploying"
            );
            secret_string(FALLBACK_SECRET_KEY.to_string())
        } else {
            config
                .secret_key
                .clone()
                .unwrap_or_else(|| secret_string(FALLBACK_SECRET_KEY.to_string()))
        };

        let store = Arc::new(FileTokenStore::new(&config.store_path));
        Self::new(store, config.storage_key.clone(), passphrase)
    }

    /// Storage key the token lives under
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Read and decrypt the bearer token
    ///
    /// Never fails. A missing value, an unreadable store or a value encrypted
    /// under another passphrase all produce an empty token.
    pub async fn get_token(&self) -> SecretString {
        let encrypted = match self.store.get(&self.storage_key).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!(key = %self.storage_key, "No session token stored");
                return secret_string(String::new());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session store unreadable, continuing unauthenticated");
                return secret_string(String::new());
            }
        };

        let token = decrypt_token(&encrypted, self.passphrase.expose_secret());
        if token.expose_secret().is_empty() {
            tracing::debug!(key = %self.storage_key, "Stored session token did not decrypt");
        }
        token
    }

    /// Encrypt and persist a token issued by an external login
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::DeskError::Session`] if encryption or the
    /// store write fails.
    pub async fn store_token(&self, token: &str) -> Result<()> {
        let encrypted = encrypt_token(token, self.passphrase.expose_secret())?;
        self.store.set(&self.storage_key, &encrypted).await?;
        tracing::info!(key = %self.storage_key, "Session token stored");
        Ok(())
    }

    /// Remove the stored token
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(&self.storage_key).await?;
        tracing::info!(key = %self.storage_key, "Session token cleared");
        Ok(())
    }
}
