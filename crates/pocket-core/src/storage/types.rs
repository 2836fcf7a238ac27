//! Core data types for the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored note with its content decrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Identifier assigned by the store on creation
    pub id: i64,

    /// Short title (plaintext, searchable)
    pub name: String,

    /// Short description (plaintext, searchable)
    pub description: String,

    /// Free-form content (encrypted at rest)
    pub content: String,

    /// When this note was created
    pub created_at: DateTime<Utc>,

    /// When this note was last edited
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Set the edit timestamp, never moving it before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Builder for creating new notes.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub name: String,
    pub description: String,
    pub content: String,

    /// Creation instant, used for both timestamps
    pub created_at: DateTime<Utc>,
}

impl NewNote {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// One page of notes plus the filtered total.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotePage {
    /// Number of notes matching the filter, before pagination
    pub total: u64,

    /// Notes on the requested page, newest first
    pub notes: Vec<Note>,
}

impl NotePage {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of pages needed to show `total` notes.
    pub fn page_count(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(page_size))
    }
}
