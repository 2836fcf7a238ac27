//! AES-256-GCM encryption of text values.
//!
//! Output layout, hex encoded for storage in text columns:
//!
//! ```text
//! nonce (12 bytes) || ciphertext || tag (16 bytes)
//! ```

use std::sync::Arc;

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::key::SessionKey;
use crate::error::{PocketError, Result};

/// Nonce size required by AES-GCM.
pub const NONCE_LEN: usize = 12;

/// Authentication tag size appended by AES-GCM.
pub const TAG_LEN: usize = 16;

/// Stateless encrypt/decrypt over a shared session key.
#[derive(Clone)]
pub struct Cipher {
    key: Arc<SessionKey>,
}

impl Cipher {
    pub fn new(key: Arc<SessionKey>) -> Self {
        Self { key }
    }

    fn aead(&self) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(self.key.as_bytes())
            .map_err(|e| PocketError::Configuration(format!("AES key init failed: {}", e)))
    }

    /// Encrypt `plaintext` with a fresh random nonce.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use pocket_core::crypto::{Cipher, SessionKey};
    ///
    /// let key = SessionKey::from_passphrase("GoodPass1").unwrap();
    /// let cipher = Cipher::new(Arc::new(key));
    /// let sealed = cipher.encrypt("secret").unwrap();
    /// assert_ne!(sealed, "secret");
    /// assert_eq!(cipher.decrypt(&sealed).unwrap(), "secret");
    /// ```
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let aead = self.aead()?;
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let sealed = aead
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| PocketError::Configuration(format!("AES-GCM encrypt failed: {}", e)))?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(hex::encode(out))
    }

    /// Decrypt a value produced by [`Cipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns `PocketError::Decryption` if:
    /// - The value is not valid hex
    /// - The payload is too short to hold a nonce and tag
    /// - The tag does not verify (wrong key or tampered data)
    /// - The plaintext is not UTF-8
    pub fn decrypt(&self, stored: &str) -> Result<String> {
        let bytes = hex::decode(stored)?;
        if bytes.len() < NONCE_LEN + TAG_LEN {
            return Err(PocketError::Decryption(format!(
                "ciphertext too short ({} bytes)",
                bytes.len()
            )));
        }

        let (nonce, sealed) = bytes.split_at(NONCE_LEN);
        let opened = self
            .aead()?
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| {
                PocketError::Decryption("authentication tag mismatch".to_string())
            })?;

        String::from_utf8(opened)
            .map_err(|_| PocketError::Decryption("plaintext is not valid UTF-8".to_string()))
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher").field("key", &self.key).finish()
    }
}
