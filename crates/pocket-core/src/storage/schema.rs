//! First-run schema creation.

use rand::Rng;
use tracing::debug;

use crate::crypto::Cipher;
use crate::error::{PocketError, Result};
use crate::storage::traits::StorageEngine;

/// Configuration key holding the encrypted probe value.
pub const PROBE_KEY: &str = "PasswordTest";

/// Configuration key holding the hex-encoded Argon2id salt.
pub const KDF_SALT_KEY: &str = "KdfSalt";

/// Number of decimal digits in a freshly generated probe.
pub const PROBE_DIGITS: usize = 13;

/// Creates the configuration table, the probe row and the note table.
///
/// Every step tolerates work that is already done: existing tables are
/// kept and a stored probe is never written twice. A bootstrap that failed
/// halfway can be retried. Earlier steps are not rolled back.
pub struct SchemaBootstrapper<'a, E: StorageEngine> {
    engine: &'a E,
    cipher: &'a Cipher,
    salt: Option<&'a [u8]>,
}

impl<'a, E: StorageEngine> SchemaBootstrapper<'a, E> {
    pub fn new(engine: &'a E, cipher: &'a Cipher) -> Self {
        Self {
            engine,
            cipher,
            salt: None,
        }
    }

    /// Record the Argon2id salt the session key was derived with.
    pub fn with_salt(mut self, salt: &'a [u8]) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Run every bootstrap step in order.
    ///
    /// # Errors
    ///
    /// Returns `PocketError::Schema` naming the failed step and its cause.
    pub fn run(&self) -> Result<()> {
        self.engine
            .create_config_table()
            .map_err(|e| schema_error("Failed to create configuration table", e))?;
        debug!("Configuration table ready");

        let stored = self
            .engine
            .config_value(PROBE_KEY)
            .map_err(|e| schema_error("Failed to read password probe", e))?;
        if stored.is_some() {
            debug!("Password probe already stored");
        } else {
            self.store_probe()?;
        }

        self.engine
            .create_note_table()
            .map_err(|e| schema_error("Failed to create note table", e))?;
        debug!("Note table ready");

        Ok(())
    }
}

impl<E: StorageEngine> SchemaBootstrapper<'_, E> {
    fn store_probe(&self) -> Result<()> {
        let probe = self
            .cipher
            .encrypt(&generate_probe())
            .map_err(|e| schema_error("Failed to encrypt password probe", e))?;

        let salt_hex = self.salt.map(hex::encode);
        let mut entries = vec![(PROBE_KEY, probe.as_str())];
        if let Some(salt_hex) = salt_hex.as_deref() {
            entries.push((KDF_SALT_KEY, salt_hex));
        }
        self.engine
            .insert_config(&entries)
            .map_err(|e| schema_error("Failed to store password probe", e))?;
        debug!(kdf_salt = self.salt.is_some(), "Password probe stored");
        Ok(())
    }
}

fn schema_error(step: &str, cause: PocketError) -> PocketError {
    PocketError::Schema(format!("{}: {}", step, cause))
}

/// A random string of exactly [`PROBE_DIGITS`] ASCII digits.
pub fn generate_probe() -> String {
    let mut rng = rand::thread_rng();
    (0..PROBE_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
