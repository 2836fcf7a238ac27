//! Application context for the Pocket CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! lazily-loaded config file.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use pocket_core::storage::{NoteStore, SqliteEngine};

use crate::cli::Cli;
use crate::config::{
    default_config_path, default_database_path, read_config, read_config_or_default, PocketConfig,
};
use crate::constants::DEFAULT_PAGE_SIZE;

use super::session::open_store_with_retry;

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<PocketConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the configuration, loading it lazily if needed.
    ///
    /// An explicit `--config` path must exist; the default path is optional.
    pub fn config(&self) -> anyhow::Result<&PocketConfig> {
        self.config.get_or_try_init(|| match self.cli.config.as_ref() {
            Some(path) => read_config(path),
            None => read_config_or_default(&default_config_path()?),
        })
    }

    /// Resolve the database path: `--db`/`POCKET_DB`, then the config
    /// file, then `$HOME/pocket/pocket.db`.
    pub fn database_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = self.cli.db.as_ref() {
            return Ok(path.clone());
        }
        if let Some(path) = self.config()?.database.path.as_ref() {
            return Ok(PathBuf::from(path));
        }
        default_database_path()
    }

    /// Page size from the flag, the config file, or the default.
    pub fn page_size(&self, flag: Option<u32>) -> anyhow::Result<u32> {
        if let Some(size) = flag {
            return Ok(size);
        }
        Ok(self.config()?.ui.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    /// Get the configured editor override, if any.
    pub fn editor(&self) -> anyhow::Result<Option<&str>> {
        Ok(self.config()?.ui.editor.as_deref())
    }

    /// Authenticate and open the note store.
    pub fn open_store(&self) -> anyhow::Result<NoteStore<SqliteEngine>> {
        open_store_with_retry(self)
    }
}
