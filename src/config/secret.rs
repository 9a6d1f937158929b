//! Secret strings for passphrases and bearer tokens
//!
//! Both the session passphrase (from configuration) and the decrypted bearer
//! token live in [`SecretString`]: memory is zeroed on drop, `Debug` output is
//! redacted, and reading the value needs an explicit `expose_secret()`.
//!
//! ```rust
//! use orderdesk::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let passphrase = secret_string("correct horse".to_string());
//! assert_eq!(passphrase.expose_secret().as_str(), "correct horse");
//! assert!(!format!("{passphrase:?}").contains("correct horse"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String payload that can live inside a [`Secret`]
#[derive(Clone, Debug, Default, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Borrow the plaintext
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Byte view of the plaintext, for key derivation
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A zeroize-on-drop, debug-redacted string
pub type SecretString = Secret<SecretValue>;

/// Wrap a String as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wrap an optional String as an optional [`SecretString`]
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("bearer-token".to_string());
        assert_eq!(secret.expose_secret().as_str(), "bearer-token");
        assert!(*secret.expose_secret() == *"bearer-token");
    }

    #[test]
    fn test_secret_string_opt() {
        assert!(secret_string_opt(Some("k".to_string())).is_some());
        assert!(secret_string_opt(None).is_none());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("eyJhbGciOiJIUzI1NiJ9".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("eyJhbGciOiJIUzI1NiJ9"));
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_secret_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Section {
            secret_key: SecretString,
        }

        let section: Section = toml::from_str("secret_key = \"passphrase\"").unwrap();
        assert_eq!(section.secret_key.expose_secret().as_str(), "passphrase");
    }
}
