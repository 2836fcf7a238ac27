//! Password gate.
//!
//! The gate runs once at startup. It validates the passphrase syntax,
//! derives the session key and checks it against the encrypted probe stored
//! at bootstrap. The real passphrase is never persisted.
//!
//! ```text
//! Unauthenticated --authenticate--> Authenticated { bootstrap pending }
//!        |                                  |
//!        |                             init_schema
//!        |                                  v
//!        +------------authenticate--> Authenticated
//! ```

pub mod probe;

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, warn};

use crate::crypto::key::MIN_SALT_LENGTH;
use crate::crypto::{validate_passphrase, KeyDerivation, SessionKeyManager};
use crate::error::{PocketError, Result};
use crate::storage::schema::{SchemaBootstrapper, KDF_SALT_KEY, PROBE_KEY};
use crate::storage::store::NoteStore;
use crate::storage::traits::StorageEngine;

pub use probe::{is_valid_probe, probe_format, ProbeFormat};

const PASSWORD_INCORRECT: &str = "password incorrect";

#[derive(Debug)]
enum GateState {
    Unauthenticated,
    Authenticated { bootstrap: Option<PendingBootstrap> },
}

/// Schema work owed after a first-run authentication.
#[derive(Debug)]
struct PendingBootstrap {
    salt: Option<Vec<u8>>,
}

/// Authenticates the user against a storage engine and hands out the
/// encrypted note store.
pub struct PasswordGate<E: StorageEngine> {
    engine: Arc<E>,
    keys: SessionKeyManager,
    derivation: KeyDerivation,
    state: GateState,
}

impl<E: StorageEngine> PasswordGate<E> {
    /// Create a gate using zero-padded keys for new databases.
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            keys: SessionKeyManager::new(),
            derivation: KeyDerivation::default(),
            state: GateState::Unauthenticated,
        }
    }

    /// Choose the key derivation used when this gate bootstraps a new
    /// database. Existing databases keep the scheme they were created with.
    pub fn with_key_derivation(mut self, derivation: KeyDerivation) -> Self {
        self.derivation = derivation;
        self
    }

    /// Check a passphrase and establish the session key.
    ///
    /// Calling this again restarts the flow and replaces the key.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the schema is missing or incomplete and [`init_schema`]
    /// must run next, `Ok(false)` if the passphrase matched a complete
    /// database.
    ///
    /// # Errors
    ///
    /// - `PocketError::Validation` if the passphrase syntax is invalid; the
    ///   database is not touched
    /// - `PocketError::Authentication` if the passphrase does not match
    /// - `PocketError::Storage` if the database cannot be read or the probe
    ///   row is missing from a database that already holds notes
    ///
    /// [`init_schema`]: PasswordGate::init_schema
    pub fn authenticate(&mut self, passphrase: &str) -> Result<bool> {
        if let Err(e) = validate_passphrase(passphrase) {
            warn!("Rejected passphrase with invalid syntax");
            return Err(e);
        }

        self.state = GateState::Unauthenticated;
        self.keys.clear();

        if !self.engine.config_table_exists()? {
            debug!("No configuration table, first run");
            return self.start_first_run(passphrase);
        }

        let probe = match self.engine.config_value(PROBE_KEY)? {
            Some(probe) => probe,
            None if self.engine.note_table_exists()? => {
                return Err(PocketError::Storage(
                    "Password probe is missing, the database may be corrupted".to_string(),
                ));
            }
            None => {
                debug!("Configuration table without probe, resuming first run");
                return self.start_first_run(passphrase);
            }
        };

        match self.engine.config_value(KDF_SALT_KEY)? {
            Some(salt_hex) => {
                let salt = hex::decode(&salt_hex).map_err(|e| {
                    PocketError::Storage(format!("Stored key salt is not valid hex: {}", e))
                })?;
                self.keys.set_passphrase_with_salt(passphrase, &salt)?;
            }
            None => self.keys.set_passphrase(passphrase)?,
        }

        let plaintext = match self.keys.cipher()?.decrypt(&probe) {
            Ok(plaintext) => plaintext,
            Err(_) => {
                self.keys.clear();
                warn!("Authentication failed");
                return Err(PocketError::Authentication(PASSWORD_INCORRECT.to_string()));
            }
        };

        match probe_format(&plaintext) {
            Some(format) => {
                debug!(?format, "Password probe accepted");
                if self.engine.note_table_exists()? {
                    self.state = GateState::Authenticated { bootstrap: None };
                    return Ok(false);
                }
                debug!("Note table missing, resuming first run");
                self.state = GateState::Authenticated {
                    bootstrap: Some(PendingBootstrap { salt: None }),
                };
                Ok(true)
            }
            None => {
                self.keys.clear();
                warn!("Password probe decrypted to an unknown format");
                Err(PocketError::Authentication(PASSWORD_INCORRECT.to_string()))
            }
        }
    }

    fn start_first_run(&mut self, passphrase: &str) -> Result<bool> {
        let salt = match self.derivation {
            KeyDerivation::ZeroPad => {
                self.keys.set_passphrase(passphrase)?;
                None
            }
            KeyDerivation::Argon2id => {
                let mut salt = vec![0u8; MIN_SALT_LENGTH];
                OsRng.fill_bytes(&mut salt);
                self.keys.set_passphrase_with_salt(passphrase, &salt)?;
                Some(salt)
            }
        };

        debug!(derivation = ?self.derivation, "Session key set for new database");
        self.state = GateState::Authenticated {
            bootstrap: Some(PendingBootstrap { salt }),
        };
        Ok(true)
    }

    /// Create the schema if the last authentication flagged a first run.
    ///
    /// A no-op otherwise. On failure the flag stays set, so the call can be
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns `PocketError::Schema` if any bootstrap step fails.
    pub fn init_schema(&mut self) -> Result<()> {
        let GateState::Authenticated {
            bootstrap: Some(pending),
        } = &self.state
        else {
            debug!("No schema initialization pending");
            return Ok(());
        };

        let cipher = self.keys.cipher()?;
        let bootstrapper = SchemaBootstrapper::new(self.engine.as_ref(), &cipher);
        match pending.salt.as_deref() {
            Some(salt) => bootstrapper.with_salt(salt).run()?,
            None => bootstrapper.run()?,
        }

        debug!("Schema initialized");
        self.state = GateState::Authenticated { bootstrap: None };
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, GateState::Authenticated { .. })
    }

    /// Whether [`init_schema`](PasswordGate::init_schema) still has work to do.
    pub fn needs_bootstrap(&self) -> bool {
        matches!(
            self.state,
            GateState::Authenticated {
                bootstrap: Some(_)
            }
        )
    }

    /// Build a note store sharing this session's key.
    ///
    /// # Errors
    ///
    /// - `PocketError::Authentication` before a successful [`authenticate`]
    /// - `PocketError::Schema` while a first-run bootstrap is pending
    ///
    /// [`authenticate`]: PasswordGate::authenticate
    pub fn open_store(&self) -> Result<NoteStore<E>> {
        match self.state {
            GateState::Unauthenticated => Err(PocketError::Authentication(
                "not authenticated".to_string(),
            )),
            GateState::Authenticated {
                bootstrap: Some(_),
            } => Err(PocketError::Schema(
                "schema has not been initialized".to_string(),
            )),
            GateState::Authenticated { bootstrap: None } => {
                Ok(NoteStore::new(Arc::clone(&self.engine), self.keys.cipher()?))
            }
        }
    }

    /// The storage engine behind the gate.
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }
}
