//! Raw note rows as stored by an engine.

use chrono::{DateTime, Utc};

use crate::crypto::Cipher;
use crate::error::{PocketError, Result};
use crate::storage::types::{NewNote, Note};

/// Note data as it sits on the medium: encrypted content, RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl NoteRow {
    /// Seal a new note; the id is filled in by the engine.
    pub fn seal_new(note: &NewNote, cipher: &Cipher) -> Result<Self> {
        let created_at = note.created_at.to_rfc3339();
        Ok(Self {
            id: 0,
            name: note.name.clone(),
            description: note.description.clone(),
            content: cipher.encrypt(&note.content)?,
            updated_at: created_at.clone(),
            created_at,
        })
    }

    /// Seal an existing note for an update.
    pub fn seal(note: &Note, cipher: &Cipher) -> Result<Self> {
        Ok(Self {
            id: note.id,
            name: note.name.clone(),
            description: note.description.clone(),
            content: cipher.encrypt(&note.content)?,
            created_at: note.created_at.to_rfc3339(),
            updated_at: note.updated_at.to_rfc3339(),
        })
    }

    /// Decrypt and parse into a domain note.
    ///
    /// Any failure is reported as `PocketError::Storage` naming the note id.
    pub fn open(self, cipher: &Cipher) -> Result<Note> {
        let content = cipher.decrypt(&self.content).map_err(|e| {
            PocketError::Storage(format!("Failed to decrypt note {}: {}", self.id, e))
        })?;
        let created_at = parse_timestamp(self.id, &self.created_at)?;
        let updated_at = parse_timestamp(self.id, &self.updated_at)?;

        Ok(Note {
            id: self.id,
            name: self.name,
            description: self.description,
            content,
            created_at,
            updated_at,
        })
    }
}

fn parse_timestamp(id: i64, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| PocketError::Storage(format!("Invalid timestamp on note {}: {}", id, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::crypto::SessionKey;

    fn cipher() -> Cipher {
        Cipher::new(Arc::new(SessionKey::from_passphrase("GoodPass1").unwrap()))
    }

    #[test]
    fn test_seal_new_encrypts_content() {
        let cipher = cipher();
        let row = NoteRow::seal_new(&NewNote::new("A", "d", "secret"), &cipher).unwrap();
        assert_ne!(row.content, "secret");
        assert_eq!(row.created_at, row.updated_at);
        assert_eq!(row.name, "A");
    }

    #[test]
    fn test_open_restores_note() {
        let cipher = cipher();
        let mut row = NoteRow::seal_new(&NewNote::new("A", "d", "secret"), &cipher).unwrap();
        row.id = 7;
        let note = row.open(&cipher).unwrap();
        assert_eq!(note.id, 7);
        assert_eq!(note.content, "secret");
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn test_open_with_bad_ciphertext_is_storage_error() {
        let cipher = cipher();
        let mut row = NoteRow::seal_new(&NewNote::new("A", "d", "secret"), &cipher).unwrap();
        row.id = 3;
        row.content = "deadbeef".to_string();
        let err = row.open(&cipher).unwrap_err();
        assert!(matches!(err, PocketError::Storage(_)));
        assert!(err.to_string().contains("note 3"));
    }

    #[test]
    fn test_open_with_bad_timestamp_is_storage_error() {
        let cipher = cipher();
        let mut row = NoteRow::seal_new(&NewNote::new("A", "d", "secret"), &cipher).unwrap();
        row.updated_at = "yesterday".to_string();
        assert!(matches!(row.open(&cipher), Err(PocketError::Storage(_))));
    }
}
