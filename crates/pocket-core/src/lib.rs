//! # Pocket Core
//!
//! Core library for Pocket - a password-protected, encrypted personal note store.
//!
//! This crate provides the credential gate, the encryption primitives and the
//! note storage layer independent of the terminal interface.
//!
//! ## Architecture
//!
//! - **crypto**: Session key handling, passphrase rules, AES-256-GCM cipher
//! - **gate**: First-run bootstrap and password probe validation
//! - **storage**: Storage engines, schema bootstrap and the encrypted note store
//!
//! ## Typical flow
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use pocket_core::gate::PasswordGate;
//! use pocket_core::storage::{NewNote, NoteRepository, SqliteEngine};
//!
//! let engine = Arc::new(SqliteEngine::open(Path::new("pocket.db"))?);
//! let mut gate = PasswordGate::new(engine);
//! gate.authenticate("GoodPass1")?;
//! gate.init_schema()?;
//!
//! let store = gate.open_store()?;
//! store.create(&NewNote::new("groceries", "weekly", "milk, eggs"))?;
//! let page = store.fetch_page(1, 10, "")?;
//! assert_eq!(page.total, 1);
//! # Ok::<(), pocket_core::PocketError>(())
//! ```

pub mod crypto;
pub mod error;
pub mod gate;
pub mod storage;

pub use error::{PocketError, Result};
pub use gate::PasswordGate;
pub use storage::{NoteRepository, StorageEngine};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
