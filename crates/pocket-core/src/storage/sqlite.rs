//! SQLite storage engine.
//!
//! Notes live in an FTS5 virtual table whose implicit rowid is the note id.
//! The database runs in WAL mode so reads stay consistent while a write is
//! in flight.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{PocketError, Result};
use crate::storage::row::NoteRow;
use crate::storage::search::SearchFilter;
use crate::storage::traits::StorageEngine;

/// Name of the configuration table.
pub const CONFIG_TABLE: &str = "pocket_config";

/// Name of the full-text note table.
pub const NOTE_TABLE: &str = "note";

const CREATE_CONFIG_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS pocket_config (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        config_key VARCHAR(30) NOT NULL,
        config_value VARCHAR(255) NOT NULL
    );

    CREATE INDEX IF NOT EXISTS key_idx ON pocket_config (config_key);
"#;

const CREATE_NOTE_TABLE: &str = r#"
    CREATE VIRTUAL TABLE IF NOT EXISTS note USING fts5(
        name,
        description,
        content UNINDEXED,
        created_at UNINDEXED,
        updated_at UNINDEXED
    );
"#;

const NOTE_COLUMNS: &str = "rowid, name, description, content, created_at, updated_at";

/// SQLite-backed storage engine.
pub struct SqliteEngine {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteEngine {
    /// Open (or create) the database file at `path`.
    ///
    /// Missing parent directories are created. WAL journaling is enabled.
    ///
    /// # Errors
    ///
    /// Returns `PocketError::Storage` if the directory cannot be created, the
    /// file cannot be opened, or WAL mode cannot be enabled.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    PocketError::Storage(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        debug!(path = %path.display(), "Connecting to SQLite database");
        let conn = Connection::open(path).map_err(|e| {
            PocketError::Storage(format!(
                "Failed to open SQLite file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mode: String = conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
            .map_err(|e| PocketError::Storage(format!("Failed to enable WAL mode: {}", e)))?;
        debug!(mode = %mode, "Enabled SQLite WAL mode");

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    /// Path of the database file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PocketError::Storage("SQLite connection poisoned".to_string()))
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        let found: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| PocketError::Storage(format!("Failed to query database: {}", e)))?;
        Ok(found.is_some())
    }

    /// Append the MATCH clause for `filter`, or `None` when nothing can match.
    fn push_filter(
        filter: &SearchFilter,
        query: &mut String,
        params: &mut Vec<Box<dyn ToSql>>,
    ) -> Option<()> {
        match filter {
            SearchFilter::All => Some(()),
            SearchFilter::Nothing => None,
            SearchFilter::Tokens(_) => {
                let expression = filter.fts_expression()?;
                query.push_str(" WHERE note MATCH ?");
                params.push(Box::new(expression));
                Some(())
            }
        }
    }
}

impl StorageEngine for SqliteEngine {
    fn config_table_exists(&self) -> Result<bool> {
        self.table_exists(CONFIG_TABLE)
    }

    fn note_table_exists(&self) -> Result<bool> {
        self.table_exists(NOTE_TABLE)
    }

    fn create_config_table(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute_batch(CREATE_CONFIG_TABLE)?;
        Ok(())
    }

    fn create_note_table(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute_batch(CREATE_NOTE_TABLE)?;
        Ok(())
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock_conn()?;
        conn.query_row(
            "SELECT config_value FROM pocket_config WHERE config_key = ?1 ORDER BY id LIMIT 1",
            [key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| {
            PocketError::Storage(format!(
                "Failed to query pocket_config, database may be corrupted: {}",
                e
            ))
        })
    }

    fn insert_config(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO pocket_config (config_key, config_value) VALUES (?1, ?2)",
                [key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_note(&self, row: &NoteRow) -> Result<i64> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO note (name, description, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &row.name,
                &row.description,
                &row.content,
                &row.created_at,
                &row.updated_at,
            ),
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_note(&self, row: &NoteRow) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "UPDATE note SET name = ?1, description = ?2, content = ?3, updated_at = ?4 WHERE rowid = ?5",
            (
                &row.name,
                &row.description,
                &row.content,
                &row.updated_at,
                row.id,
            ),
        )?;
        Ok(())
    }

    fn delete_note(&self, id: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM note WHERE rowid = ?1", [id])?;
        Ok(())
    }

    fn get_note(&self, id: i64) -> Result<Option<NoteRow>> {
        let conn = self.lock_conn()?;
        let query = format!("SELECT {} FROM note WHERE rowid = ?1", NOTE_COLUMNS);
        let row = conn
            .query_row(&query, [id], note_row_from_sql)
            .optional()?;
        Ok(row)
    }

    fn count_notes(&self, filter: &SearchFilter) -> Result<u64> {
        let conn = self.lock_conn()?;
        let mut query = String::from("SELECT COUNT(*) FROM note");
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();
        if Self::push_filter(filter, &mut query, &mut params).is_none() {
            return Ok(0);
        }

        let count: i64 = conn.query_row(
            &query,
            rusqlite::params_from_iter(params.iter()),
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| PocketError::Storage(format!("Invalid note count: {}", count)))
    }

    fn select_notes(
        &self,
        filter: &SearchFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<NoteRow>> {
        let conn = self.lock_conn()?;
        let mut query = format!("SELECT {} FROM note", NOTE_COLUMNS);
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();
        if Self::push_filter(filter, &mut query, &mut params).is_none() {
            return Ok(Vec::new());
        }

        let offset = i64::try_from(offset)
            .map_err(|_| PocketError::Validation(format!("Offset too large: {}", offset)))?;
        query.push_str(" ORDER BY rowid DESC LIMIT ? OFFSET ?");
        params.push(Box::new(i64::from(limit)));
        params.push(Box::new(offset));

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter()),
            note_row_from_sql,
        )?;

        let mut notes = Vec::new();
        for row in rows {
            notes.push(row?);
        }
        Ok(notes)
    }

    fn check_integrity(&self) -> Result<()> {
        let has_notes = self.note_table_exists()?;
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare("PRAGMA integrity_check")?;
        let problems = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if problems.len() != 1 || problems[0] != "ok" {
            return Err(PocketError::Storage(format!(
                "Integrity check failed: {}",
                problems.join("; ")
            )));
        }

        if has_notes {
            conn.execute("INSERT INTO note(note) VALUES('integrity-check')", [])
                .map_err(|e| {
                    PocketError::Storage(format!("Full-text index integrity check failed: {}", e))
                })?;
        }

        Ok(())
    }
}

fn note_row_from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<NoteRow> {
    Ok(NoteRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, description: &str) -> NoteRow {
        NoteRow {
            id: 0,
            name: name.to_string(),
            description: description.to_string(),
            content: "00".to_string(),
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn engine_with_schema() -> SqliteEngine {
        let engine = SqliteEngine::open_in_memory().unwrap();
        engine.create_config_table().unwrap();
        engine.create_note_table().unwrap();
        engine
    }

    #[test]
    fn test_schema_creation_is_idempotent() {
        let engine = SqliteEngine::open_in_memory().unwrap();
        assert!(!engine.config_table_exists().unwrap());
        assert!(!engine.note_table_exists().unwrap());

        engine.create_config_table().unwrap();
        engine.create_config_table().unwrap();
        engine.create_note_table().unwrap();
        engine.create_note_table().unwrap();

        assert!(engine.config_table_exists().unwrap());
        assert!(engine.note_table_exists().unwrap());
    }

    #[test]
    fn test_config_round_trip() {
        let engine = engine_with_schema();
        assert_eq!(engine.config_value("PasswordTest").unwrap(), None);

        engine
            .insert_config(&[("PasswordTest", "abcd"), ("KdfSalt", "ef01")])
            .unwrap();
        assert_eq!(
            engine.config_value("PasswordTest").unwrap().as_deref(),
            Some("abcd")
        );
        assert_eq!(engine.config_value("KdfSalt").unwrap().as_deref(), Some("ef01"));
    }

    #[test]
    fn test_config_value_without_table_is_storage_error() {
        let engine = SqliteEngine::open_in_memory().unwrap();
        let err = engine.config_value("PasswordTest").unwrap_err();
        assert!(matches!(err, PocketError::Storage(_)));
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let engine = engine_with_schema();
        let first = engine.insert_note(&row("a", "")).unwrap();
        let second = engine.insert_note(&row("b", "")).unwrap();
        assert!(first > 0);
        assert!(second > first);
    }

    #[test]
    fn test_update_keeps_created_at() {
        let engine = engine_with_schema();
        let id = engine.insert_note(&row("a", "")).unwrap();

        let mut changed = row("renamed", "desc");
        changed.id = id;
        changed.created_at = "1999-01-01T00:00:00+00:00".to_string();
        changed.updated_at = "2024-02-02T00:00:00+00:00".to_string();
        engine.update_note(&changed).unwrap();

        let stored = engine.get_note(id).unwrap().unwrap();
        assert_eq!(stored.name, "renamed");
        assert_eq!(stored.created_at, "2024-01-01T00:00:00+00:00");
        assert_eq!(stored.updated_at, "2024-02-02T00:00:00+00:00");
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let engine = engine_with_schema();
        let mut ghost = row("ghost", "");
        ghost.id = 42;
        engine.update_note(&ghost).unwrap();
        assert_eq!(engine.count_notes(&SearchFilter::All).unwrap(), 0);
    }

    #[test]
    fn test_full_text_filter_on_name_and_description() {
        let engine = engine_with_schema();
        engine.insert_note(&row("Groceries", "weekly shopping")).unwrap();
        engine.insert_note(&row("Passwords", "router admin")).unwrap();
        engine.insert_note(&row("Ideas", "grocery app")).unwrap();

        let filter = SearchFilter::parse("groc");
        assert_eq!(engine.count_notes(&filter).unwrap(), 2);

        let rows = engine.select_notes(&filter, 10, 0).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ideas", "Groceries"]);

        let filter = SearchFilter::parse("router ADMIN");
        assert_eq!(engine.count_notes(&filter).unwrap(), 1);
        assert_eq!(engine.count_notes(&SearchFilter::Nothing).unwrap(), 0);
    }

    #[test]
    fn test_content_is_not_searchable() {
        let engine = engine_with_schema();
        let mut secret = row("plain", "");
        secret.content = "cafebabe".to_string();
        engine.insert_note(&secret).unwrap();

        assert_eq!(
            engine.count_notes(&SearchFilter::parse("cafebabe")).unwrap(),
            0
        );
    }

    #[test]
    fn test_select_pagination_descending() {
        let engine = engine_with_schema();
        for i in 0..5 {
            engine.insert_note(&row(&format!("n{}", i), "")).unwrap();
        }
        let rows = engine.select_notes(&SearchFilter::All, 2, 2).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["n2", "n1"]);
    }

    #[test]
    fn test_delete_twice() {
        let engine = engine_with_schema();
        let id = engine.insert_note(&row("a", "")).unwrap();
        engine.delete_note(id).unwrap();
        engine.delete_note(id).unwrap();
        assert!(engine.get_note(id).unwrap().is_none());
    }

    #[test]
    fn test_integrity_check_passes_on_fresh_database() {
        let engine = engine_with_schema();
        engine.insert_note(&row("a", "b")).unwrap();
        engine.check_integrity().unwrap();
    }
}
