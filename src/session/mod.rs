//! Session credential handling
//!
//! One encrypted bearer token in persistent storage, decrypted on demand:
//!
//! - [`cipher`] - passphrase AES compatible with the web console's storage format
//! - [`store`] - where the encrypted value lives ([`TokenStore`])
//! - [`vault`] - [`CredentialVault`], decrypt-on-every-call access
//! - [`context`] - [`SessionContext`], passed into every authenticated call

pub mod cipher;
pub mod context;
pub mod store;
pub mod vault;

pub use cipher::{decrypt_token, encrypt_token};
pub use context::SessionContext;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use vault::CredentialVault;
