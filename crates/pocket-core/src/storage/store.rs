//! Encrypted note store.
//!
//! Wraps a [`StorageEngine`] and a session [`Cipher`]: content is encrypted
//! on every write and decrypted on every read.

use std::sync::Arc;

use tracing::debug;

use crate::crypto::Cipher;
use crate::error::{PocketError, Result};
use crate::storage::row::NoteRow;
use crate::storage::search::SearchFilter;
use crate::storage::traits::{NoteRepository, StorageEngine};
use crate::storage::types::{NewNote, Note, NotePage};

/// Page size used by [`NoteStore::verify`] to walk the whole table.
const VERIFY_BATCH: u32 = 100;

/// Note operations over an engine with an established session key.
pub struct NoteStore<E: StorageEngine> {
    engine: Arc<E>,
    cipher: Cipher,
}

impl<E: StorageEngine> NoteStore<E> {
    pub fn new(engine: Arc<E>, cipher: Cipher) -> Self {
        Self { engine, cipher }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn open_rows(&self, rows: Vec<NoteRow>) -> Result<Vec<Note>> {
        rows.into_iter().map(|row| row.open(&self.cipher)).collect()
    }
}

impl<E: StorageEngine> NoteRepository for NoteStore<E> {
    fn create(&self, note: &NewNote) -> Result<Note> {
        let row = NoteRow::seal_new(note, &self.cipher)?;
        let id = self.engine.insert_note(&row)?;
        debug!(id, "Created note");

        Ok(Note {
            id,
            name: note.name.clone(),
            description: note.description.clone(),
            content: note.content.clone(),
            created_at: note.created_at,
            updated_at: note.created_at,
        })
    }

    fn update(&self, note: &Note) -> Result<()> {
        if note.updated_at < note.created_at {
            return Err(PocketError::Validation(format!(
                "Note {} cannot be updated before it was created",
                note.id
            )));
        }

        let row = NoteRow::seal(note, &self.cipher)?;
        self.engine.update_note(&row)?;
        debug!(id = note.id, "Updated note");
        Ok(())
    }

    fn delete(&self, note: &Note) -> Result<()> {
        self.engine.delete_note(note.id)?;
        debug!(id = note.id, "Deleted note");
        Ok(())
    }

    fn fetch_page(&self, page: u32, page_size: u32, term: &str) -> Result<NotePage> {
        if page == 0 {
            return Err(PocketError::Validation(
                "Page numbers start at 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(PocketError::Validation(
                "Page size must be at least 1".to_string(),
            ));
        }

        let filter = SearchFilter::parse(term);
        let total = self.engine.count_notes(&filter)?;
        debug!(page, page_size, total, "Fetching note page");
        if total == 0 {
            return Ok(NotePage::empty());
        }

        let offset = u64::from(page - 1) * u64::from(page_size);
        let rows = self.engine.select_notes(&filter, page_size, offset)?;
        let notes = self.open_rows(rows)?;
        Ok(NotePage { total, notes })
    }

    fn get(&self, id: i64) -> Result<Option<Note>> {
        self.engine
            .get_note(id)?
            .map(|row| row.open(&self.cipher))
            .transpose()
    }

    fn verify(&self) -> Result<usize> {
        let total = self.engine.count_notes(&SearchFilter::All)?;
        let mut checked = 0usize;
        let mut offset = 0u64;
        while offset < total {
            let rows = self
                .engine
                .select_notes(&SearchFilter::All, VERIFY_BATCH, offset)?;
            if rows.is_empty() {
                break;
            }
            checked += self.open_rows(rows)?.len();
            offset += u64::from(VERIFY_BATCH);
        }
        Ok(checked)
    }
}
