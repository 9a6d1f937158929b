//! Passphrase encryption for the persisted session token
//!
//! Format: base64 of `"Salted__" ‖ salt(8) ‖ AES-256-CBC ciphertext`, with the
//! key and IV derived from passphrase and salt by OpenSSL's `EVP_BytesToKey`
//! (MD5, one round). This is the format browser crypto libraries emit for
//! passphrase AES, so tokens written by the web console decrypt here too.
//!
//! Decryption never fails loudly. A wrong passphrase, a truncated value or
//! plain garbage all decrypt to an empty token, which callers treat as
//! unauthenticated.

use crate::config::{secret_string, SecretString, SecretValue};
use crate::domain::{DeskError, Result};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose, Engine as _};
use md5::{Digest, Md5};
use rand::RngCore;
use zeroize::Zeroize;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const SALTED_MAGIC: &[u8; 8] = b"Salted__";
const SALT_LEN: usize = 8;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;

/// Encrypt a bearer token under `passphrase` with a fresh random salt
///
/// # Errors
///
/// Returns [`DeskError::Session`] if the cipher cannot be initialised.
pub fn encrypt_token(token: &str, passphrase: &SecretValue) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    encrypt_with_salt(token, passphrase.as_bytes(), &salt)
}

/// Decrypt a stored token; unusable input yields an empty token
pub fn decrypt_token(encrypted: &str, passphrase: &SecretValue) -> SecretString {
    let plaintext = decrypt_bytes(encrypted, passphrase.as_bytes())
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default();
    secret_string(plaintext)
}

fn encrypt_with_salt(token: &str, passphrase: &[u8], salt: &[u8; SALT_LEN]) -> Result<String> {
    let (mut key, mut iv) = derive_key_iv(passphrase, salt);
    let cipher = Aes256CbcEnc::new_from_slices(&key, &iv)
        .map_err(|e| DeskError::Session(format!("Failed to initialise token cipher: {e}")));
    key.zeroize();
    iv.zeroize();

    let ciphertext = cipher?.encrypt_padded_vec_mut::<Pkcs7>(token.as_bytes());

    let mut out = Vec::with_capacity(SALTED_MAGIC.len() + SALT_LEN + ciphertext.len());
    out.extend_from_slice(SALTED_MAGIC);
    out.extend_from_slice(salt);
    out.extend_from_slice(&ciphertext);
    Ok(general_purpose::STANDARD.encode(out))
}

fn decrypt_bytes(encrypted: &str, passphrase: &[u8]) -> Option<Vec<u8>> {
    let raw = general_purpose::STANDARD.decode(encrypted.trim()).ok()?;
    let header_len = SALTED_MAGIC.len() + SALT_LEN;
    if raw.len() <= header_len || &raw[..SALTED_MAGIC.len()] != SALTED_MAGIC {
        return None;
    }

    let (salt, body) = raw[SALTED_MAGIC.len()..].split_at(SALT_LEN);
    if body.len() % BLOCK_LEN != 0 {
        return None;
    }

    let (mut key, mut iv) = derive_key_iv(passphrase, salt);
    let cipher = Aes256CbcDec::new_from_slices(&key, &iv).ok();
    key.zeroize();
    iv.zeroize();

    cipher?.decrypt_padded_vec_mut::<Pkcs7>(body).ok()
}

/// OpenSSL `EVP_BytesToKey` with MD5 and a single iteration
fn derive_key_iv(passphrase: &[u8], salt: &[u8]) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    let mut material: Vec<u8> = Vec::with_capacity(KEY_LEN + IV_LEN + 16);
    let mut block: Vec<u8> = Vec::new();

    while material.len() < KEY_LEN + IV_LEN {
        let mut hasher = Md5::new();
        hasher.update(&block);
        hasher.update(passphrase);
        hasher.update(salt);
        block = hasher.finalize().to_vec();
        material.extend_from_slice(&block);
    }

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&material[..KEY_LEN]);
    iv.copy_from_slice(&material[KEY_LEN..KEY_LEN + IV_LEN]);
    material.zeroize();
    block.zeroize();
    (key, iv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn passphrase(s: &str) -> SecretValue {
        SecretValue::from(s.to_string())
    }

    #[test]
    fn test_round_trip_same_key() {
        let key = passphrase("console-secret");
        let encrypted = encrypt_token("eyJhbGciOiJIUzI1NiJ9.payload.sig", &key).unwrap();
        let token = decrypt_token(&encrypted, &key);
        assert_eq!(
            token.expose_secret().as_str(),
            "eyJhbGciOiJIUzI1NiJ9.payload.sig"
        );
    }

    #[test]
    fn test_output_uses_openssl_salted_header() {
        let encrypted = encrypt_token("token", &passphrase("k")).unwrap();
        // base64("Salted__...") always starts with this prefix
        assert!(encrypted.starts_with("U2FsdGVkX1"));

        let raw = general_purpose::STANDARD.decode(&encrypted).unwrap();
        assert_eq!(&raw[..8], b"Salted__");
        assert_eq!((raw.len() - 16) % 16, 0);
    }

    #[test]
    fn test_fixed_salt_is_deterministic() {
        let salt = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let a = encrypt_with_salt("token", b"k", &salt).unwrap();
        let b = encrypt_with_salt("token", b"k", &salt).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_salt_differs_between_calls() {
        let key = passphrase("k");
        let a = encrypt_token("token", &key).unwrap();
        let b = encrypt_token("token", &key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_does_not_yield_original() {
        let encrypted = encrypt_token("bearer-abc", &passphrase("right")).unwrap();
        let token = decrypt_token(&encrypted, &passphrase("wrong"));
        assert_ne!(token.expose_secret().as_str(), "bearer-abc");
    }

    #[test]
    fn test_garbage_input_yields_empty_token() {
        let key = passphrase("k");
        assert!(decrypt_token("", &key).expose_secret().is_empty());
        assert!(decrypt_token("not base64 at all!", &key)
            .expose_secret()
            .is_empty());
        assert!(decrypt_token("U2FsdGVkX18=", &key).expose_secret().is_empty());
        // valid base64 without the salted header
        let plain = general_purpose::STANDARD.encode(b"just some bytes here....");
        assert!(decrypt_token(&plain, &key).expose_secret().is_empty());
    }

    #[test]
    fn test_key_derivation_lengths_and_determinism() {
        let (k1, iv1) = derive_key_iv(b"pass", b"saltsalt");
        let (k2, iv2) = derive_key_iv(b"pass", b"saltsalt");
        let (k3, _) = derive_key_iv(b"pass", b"SALTSALT");
        assert_eq!(k1, k2);
        assert_eq!(iv1, iv2);
        assert_ne!(k1, k3);
    }
}
