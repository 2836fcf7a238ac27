//! Storage trait definitions.
//!
//! Two seams exist:
//!
//! - [`StorageEngine`]: the relational/full-text backend. It only ever sees
//!   raw rows with encrypted content. Implemented by the SQLite engine and by
//!   an in-memory double.
//! - [`NoteRepository`]: the note operations the terminal layer calls, on
//!   plaintext notes. Implemented by [`NoteStore`](super::NoteStore) over any
//!   engine.

use super::row::NoteRow;
use super::search::SearchFilter;
use super::types::{NewNote, Note, NotePage};
use crate::error::Result;

/// Backend interface for configuration and note rows.
///
/// All implementations must ensure:
/// - Each call is atomic at the level of a single statement
/// - `insert_config` writes all of its entries or none
/// - Note ids are assigned on insert and never reused for another row
///   while the row exists
/// - Schema creation calls are idempotent
pub trait StorageEngine: Send + Sync {
    // --- Schema ---

    /// Whether the configuration table exists.
    fn config_table_exists(&self) -> Result<bool>;

    /// Whether the note table exists.
    fn note_table_exists(&self) -> Result<bool>;

    /// Create the configuration table and its key index.
    fn create_config_table(&self) -> Result<()>;

    /// Create the full-text note table.
    fn create_note_table(&self) -> Result<()>;

    // --- Configuration ---

    /// Read a configuration value by key.
    ///
    /// Returns `Ok(None)` if the key is absent.
    fn config_value(&self, key: &str) -> Result<Option<String>>;

    /// Insert configuration entries in one transaction.
    fn insert_config(&self, entries: &[(&str, &str)]) -> Result<()>;

    // --- Notes ---

    /// Insert a note row, returning its new id. `row.id` is ignored.
    fn insert_note(&self, row: &NoteRow) -> Result<i64>;

    /// Overwrite name, description, content and updated_at for `row.id`.
    ///
    /// Updating an id that does not exist is not an error.
    fn update_note(&self, row: &NoteRow) -> Result<()>;

    /// Remove a note row. Removing an absent id is not an error.
    fn delete_note(&self, id: i64) -> Result<()>;

    /// Fetch one note row by id.
    fn get_note(&self, id: i64) -> Result<Option<NoteRow>>;

    /// Count note rows matching the filter.
    fn count_notes(&self, filter: &SearchFilter) -> Result<u64>;

    /// Select matching note rows ordered by descending id.
    fn select_notes(&self, filter: &SearchFilter, limit: u32, offset: u64)
        -> Result<Vec<NoteRow>>;

    // --- Maintenance ---

    /// Check backend integrity.
    fn check_integrity(&self) -> Result<()>;
}

/// Note operations with transparent encryption.
///
/// Every implementation holds an established session key; content is
/// encrypted before it reaches storage and decrypted on the way out.
pub trait NoteRepository: Send + Sync {
    /// Create a note. Both timestamps are set to `note.created_at`.
    ///
    /// # Returns
    ///
    /// Returns the stored note with its new id.
    fn create(&self, note: &NewNote) -> Result<Note>;

    /// Overwrite name, description, content and updated_at of `note.id`.
    ///
    /// `created_at` is never written. A missing id is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns `PocketError::Validation` if `updated_at` precedes `created_at`.
    fn update(&self, note: &Note) -> Result<()>;

    /// Delete a note. Deleting a missing id is not an error.
    fn delete(&self, note: &Note) -> Result<()>;

    /// Fetch one page of notes, newest first.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page number
    /// * `page_size` - Notes per page
    /// * `term` - Full-text term over name and description; empty for all
    ///
    /// # Errors
    ///
    /// Returns `PocketError::Validation` for page 0 or page size 0 and
    /// `PocketError::Storage` if any note on the page fails to decrypt.
    fn fetch_page(&self, page: u32, page_size: u32, term: &str) -> Result<NotePage>;

    /// Get a single note by id.
    fn get(&self, id: i64) -> Result<Option<Note>>;

    /// Decrypt every stored note, returning how many were checked.
    fn verify(&self) -> Result<usize>;
}
