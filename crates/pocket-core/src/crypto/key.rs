//! Session key derivation and ownership.
//!
//! A session key is derived once per authenticated session from the user's
//! passphrase. Two derivations exist:
//!
//! - **Zero padding**: the passphrase bytes padded with trailing zeros to 32
//!   bytes. Kept as the default so databases created by earlier versions keep
//!   opening. It is a weak key derivation.
//! - **Argon2id**: memory-hard derivation with a per-database salt, opt-in for
//!   newly bootstrapped databases.

use std::sync::Arc;

use argon2::Argon2;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::cipher::Cipher;
use crate::error::{PocketError, Result};

/// Argon2id parameters.
///
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1
const ARGON2_MEMORY_KB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;

/// Length of the session key in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Minimum salt length accepted by [`derive_key`].
pub const MIN_SALT_LENGTH: usize = 16;

/// How a passphrase becomes key material for a new database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDerivation {
    /// Pad the passphrase with zero bytes (legacy format)
    #[default]
    ZeroPad,
    /// Argon2id with a random salt stored next to the probe
    Argon2id,
}

/// The symmetric key for one authenticated session.
///
/// Key material is zeroized when the last owner drops it.
#[derive(ZeroizeOnDrop)]
pub struct SessionKey {
    key: [u8; KEY_LENGTH],
}

impl SessionKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Build a key by padding the passphrase with trailing zero bytes.
    ///
    /// # Errors
    ///
    /// Returns `PocketError::Configuration` if the passphrase is longer than
    /// [`KEY_LENGTH`] bytes.
    pub fn from_passphrase(passphrase: &str) -> Result<Self> {
        let bytes = passphrase.as_bytes();
        if bytes.len() > KEY_LENGTH {
            return Err(PocketError::Configuration(format!(
                "Passphrase can only have {} bytes (got {})",
                KEY_LENGTH,
                bytes.len()
            )));
        }

        let mut key = [0u8; KEY_LENGTH];
        key[..bytes.len()].copy_from_slice(bytes);
        Ok(Self::from_bytes(key))
    }

    /// Get a reference to the raw key bytes.
    ///
    /// Avoid storing or logging this value.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a session key from a passphrase using Argon2id.
///
/// Same passphrase + salt always produces the same key.
///
/// # Errors
///
/// Returns `PocketError::Configuration` if the passphrase is empty, the salt
/// is shorter than [`MIN_SALT_LENGTH`] bytes, or Argon2 rejects its inputs.
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Result<SessionKey> {
    if passphrase.is_empty() {
        return Err(PocketError::Configuration(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    if salt.len() < MIN_SALT_LENGTH {
        return Err(PocketError::Configuration(format!(
            "Salt must be at least {} bytes",
            MIN_SALT_LENGTH
        )));
    }

    let params = argon2::Params::new(
        ARGON2_MEMORY_KB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(KEY_LENGTH),
    )
    .map_err(|e| PocketError::Configuration(format!("Failed to create Argon2 params: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut key_bytes = [0u8; KEY_LENGTH];
    let derived = argon2.hash_password_into(passphrase.as_bytes(), salt, &mut key_bytes);
    if let Err(e) = derived {
        key_bytes.zeroize();
        return Err(PocketError::Configuration(format!(
            "Key derivation failed: {}",
            e
        )));
    }

    Ok(SessionKey::from_bytes(key_bytes))
}

/// Holds the single active session key of the process.
///
/// Setting a passphrase again replaces the previous key. The key is shared
/// read-only with [`Cipher`] instances built from it.
#[derive(Debug, Default)]
pub struct SessionKeyManager {
    key: Option<Arc<SessionKey>>,
}

impl SessionKeyManager {
    pub fn new() -> Self {
        Self { key: None }
    }

    /// Store a zero-padded key built from `passphrase`.
    ///
    /// # Errors
    ///
    /// Returns `PocketError::Configuration` if the passphrase exceeds the key
    /// length. The previous key is kept in that case.
    pub fn set_passphrase(&mut self, passphrase: &str) -> Result<()> {
        let key = SessionKey::from_passphrase(passphrase)?;
        self.key = Some(Arc::new(key));
        Ok(())
    }

    /// Store an Argon2id key derived from `passphrase` and `salt`.
    pub fn set_passphrase_with_salt(&mut self, passphrase: &str, salt: &[u8]) -> Result<()> {
        let key = derive_key(passphrase, salt)?;
        self.key = Some(Arc::new(key));
        Ok(())
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Drop the manager's reference to the current key.
    pub fn clear(&mut self) {
        self.key = None;
    }

    /// Build a cipher over the current key.
    ///
    /// # Errors
    ///
    /// Returns `PocketError::Authentication` if no key has been set.
    pub fn cipher(&self) -> Result<Cipher> {
        self.key
            .as_ref()
            .map(|key| Cipher::new(Arc::clone(key)))
            .ok_or_else(|| PocketError::Authentication("no session key established".to_string()))
    }
}
