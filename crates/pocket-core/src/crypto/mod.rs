//! Cryptographic operations for Pocket.
//!
//! - **AES-256-GCM**: authenticated encryption of note content and the
//!   password probe
//! - **Session key**: 32 bytes derived from the passphrase, either by zero
//!   padding (legacy, default) or by Argon2id
//!
//! ## Security Model
//!
//! - The passphrase itself is never stored; an encrypted probe value proves it
//! - Every encryption uses a fresh random nonce
//! - Key material is zeroized from memory on drop and redacted in `Debug`
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the database file (note content is unreadable)
//! - Tampering with stored ciphertext (detected by the GCM tag)
//!
//! We do NOT defend against:
//! - Metadata disclosure: note names and descriptions are plaintext
//! - Offline brute force of zero-padded keys (use Argon2id for new databases)
//! - Compromised OS / keylogger

pub mod cipher;
pub mod key;
pub mod passphrase;

pub use cipher::Cipher;
pub use key::{derive_key, KeyDerivation, SessionKey, SessionKeyManager, KEY_LENGTH};
pub use passphrase::validate_passphrase;
