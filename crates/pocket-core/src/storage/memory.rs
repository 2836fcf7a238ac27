//! Memory storage engine
//!
//! Will be destroyed when dropped. Used as a test double for the SQLite
//! engine; full-text matching is approximated by word-prefix comparison.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{PocketError, Result};
use crate::storage::row::NoteRow;
use crate::storage::search::SearchFilter;
use crate::storage::traits::StorageEngine;

#[derive(Debug, Default)]
struct MemoryState {
    /// Configuration rows, `None` until the table is created
    config: Option<Vec<(String, String)>>,

    /// Note rows keyed by id, `None` until the table is created
    notes: Option<BTreeMap<i64, NoteRow>>,

    /// Last id handed out
    last_id: i64,

    /// Fail the next `insert_config` call (for bootstrap failure tests)
    fail_config_insert: bool,

    /// Fail the next `create_note_table` call
    fail_note_table: bool,
}

/// An in-memory storage engine
#[derive(Debug, Default)]
pub struct MemoryEngine {
    state: Mutex<MemoryState>,
}

impl MemoryEngine {
    /// Create a new empty memory engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next configuration insert fail.
    pub fn fail_next_config_insert(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_config_insert = true;
        }
    }

    /// Make the next note table creation fail.
    pub fn fail_next_note_table(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_note_table = true;
        }
    }

    /// Number of configuration rows stored under `key`.
    pub fn config_rows(&self, key: &str) -> Result<usize> {
        let state = self.lock_state()?;
        Ok(state
            .config
            .as_ref()
            .map_or(0, |config| config.iter().filter(|(k, _)| k == key).count()))
    }

    /// Replace the stored content of a note row, bypassing encryption.
    pub fn overwrite_raw_content(&self, id: i64, content: &str) -> Result<()> {
        let mut state = self.lock_state()?;
        if let Some(row) = state.notes.as_mut().and_then(|notes| notes.get_mut(&id)) {
            row.content = content.to_string();
        }
        Ok(())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| PocketError::Storage("memory engine poisoned".to_string()))
    }
}

fn missing_table(name: &str) -> PocketError {
    PocketError::Storage(format!("no such table: {}", name))
}

fn matching<'a>(
    notes: &'a BTreeMap<i64, NoteRow>,
    filter: &'a SearchFilter,
) -> impl Iterator<Item = &'a NoteRow> + 'a {
    notes
        .values()
        .rev()
        .filter(move |row| filter.matches(&row.name, &row.description))
}

impl StorageEngine for MemoryEngine {
    fn config_table_exists(&self) -> Result<bool> {
        Ok(self.lock_state()?.config.is_some())
    }

    fn note_table_exists(&self) -> Result<bool> {
        Ok(self.lock_state()?.notes.is_some())
    }

    fn create_config_table(&self) -> Result<()> {
        let mut state = self.lock_state()?;
        state.config.get_or_insert_with(Vec::new);
        Ok(())
    }

    fn create_note_table(&self) -> Result<()> {
        let mut state = self.lock_state()?;
        if state.fail_note_table {
            state.fail_note_table = false;
            return Err(PocketError::Storage("disk I/O error".to_string()));
        }
        state.notes.get_or_insert_with(BTreeMap::new);
        Ok(())
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        let state = self.lock_state()?;
        let config = state
            .config
            .as_ref()
            .ok_or_else(|| missing_table("pocket_config"))?;
        Ok(config
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.clone()))
    }

    fn insert_config(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut state = self.lock_state()?;
        if state.fail_config_insert {
            state.fail_config_insert = false;
            return Err(PocketError::Storage("disk I/O error".to_string()));
        }
        let config = state
            .config
            .as_mut()
            .ok_or_else(|| missing_table("pocket_config"))?;
        config.extend(
            entries
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        Ok(())
    }

    fn insert_note(&self, row: &NoteRow) -> Result<i64> {
        let mut state = self.lock_state()?;
        let id = state.last_id + 1;
        let notes = state.notes.as_mut().ok_or_else(|| missing_table("note"))?;
        notes.insert(
            id,
            NoteRow {
                id,
                ..row.clone()
            },
        );
        state.last_id = id;
        Ok(id)
    }

    fn update_note(&self, row: &NoteRow) -> Result<()> {
        let mut state = self.lock_state()?;
        let notes = state.notes.as_mut().ok_or_else(|| missing_table("note"))?;
        if let Some(existing) = notes.get_mut(&row.id) {
            existing.name = row.name.clone();
            existing.description = row.description.clone();
            existing.content = row.content.clone();
            existing.updated_at = row.updated_at.clone();
        }
        Ok(())
    }

    fn delete_note(&self, id: i64) -> Result<()> {
        let mut state = self.lock_state()?;
        let notes = state.notes.as_mut().ok_or_else(|| missing_table("note"))?;
        notes.remove(&id);
        Ok(())
    }

    fn get_note(&self, id: i64) -> Result<Option<NoteRow>> {
        let state = self.lock_state()?;
        let notes = state.notes.as_ref().ok_or_else(|| missing_table("note"))?;
        Ok(notes.get(&id).cloned())
    }

    fn count_notes(&self, filter: &SearchFilter) -> Result<u64> {
        let state = self.lock_state()?;
        let notes = state.notes.as_ref().ok_or_else(|| missing_table("note"))?;
        Ok(matching(notes, filter).count() as u64)
    }

    fn select_notes(
        &self,
        filter: &SearchFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<NoteRow>> {
        let state = self.lock_state()?;
        let notes = state.notes.as_ref().ok_or_else(|| missing_table("note"))?;
        let skip = usize::try_from(offset)
            .map_err(|_| PocketError::Validation(format!("Offset too large: {}", offset)))?;
        Ok(matching(notes, filter)
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn check_integrity(&self) -> Result<()> {
        let state = self.lock_state()?;
        if let Some(notes) = state.notes.as_ref() {
            if let Some((key, row)) = notes.iter().find(|(key, row)| **key != row.id) {
                return Err(PocketError::Storage(format!(
                    "Integrity check failed: row {} stored under id {}",
                    row.id, key
                )));
            }
        }
        Ok(())
    }
}
