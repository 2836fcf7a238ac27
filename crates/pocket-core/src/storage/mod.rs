//! Storage layer for Pocket notes.
//!
//! Notes live in a full-text table whose `content` column only ever holds
//! cipher output. Configuration rows (the password probe and, for Argon2id
//! databases, the key salt) live in a separate key/value table.
//!
//! # Module layout
//!
//! - [`traits`]: the [`StorageEngine`] backend seam and the [`NoteRepository`]
//!   operation contract
//! - [`sqlite`]: production engine over an embedded SQLite database
//! - [`memory`]: in-memory engine used as a test double
//! - [`schema`]: first-run schema creation
//! - [`store`]: the encrypting [`NoteStore`]

pub mod memory;
pub mod row;
pub mod schema;
pub mod search;
pub mod sqlite;
pub mod store;
pub mod traits;
pub mod types;

pub use memory::MemoryEngine;
pub use row::NoteRow;
pub use schema::{SchemaBootstrapper, KDF_SALT_KEY, PROBE_KEY};
pub use search::SearchFilter;
pub use sqlite::SqliteEngine;
pub use store::NoteStore;
pub use traits::{NoteRepository, StorageEngine};
pub use types::{NewNote, Note, NotePage};
