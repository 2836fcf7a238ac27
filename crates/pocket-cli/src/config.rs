use std::path::{Path, PathBuf};

use pocket_core::crypto::KeyDerivation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PocketConfig {
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub security: SecuritySection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SecuritySection {
    /// Derivation used when a new database is bootstrapped
    #[serde(default)]
    pub key_derivation: KeyDerivation,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UiSection {
    pub page_size: Option<u32>,
    pub editor: Option<String>,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

/// `$HOME/pocket/pocket.db`
pub fn default_database_path() -> anyhow::Result<PathBuf> {
    Ok(home_dir()?.join("pocket").join("pocket.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<PocketConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Read the config file if it exists, defaults otherwise.
pub fn read_config_or_default(path: &Path) -> anyhow::Result<PocketConfig> {
    if path.exists() {
        read_config(path)
    } else {
        Ok(PocketConfig::default())
    }
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("pocket"));
        }
    }
    Ok(home_dir()?.join(".config").join("pocket"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: PocketConfig = toml::from_str("").unwrap();
        assert!(config.database.path.is_none());
        assert_eq!(config.security.key_derivation, KeyDerivation::ZeroPad);
        assert!(config.ui.page_size.is_none());
    }

    #[test]
    fn test_full_config() {
        let config: PocketConfig = toml::from_str(
            r#"
            [database]
            path = "/srv/notes.db"

            [security]
            key_derivation = "argon2id"

            [ui]
            page_size = 25
            editor = "nano"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.path.as_deref(), Some("/srv/notes.db"));
        assert_eq!(config.security.key_derivation, KeyDerivation::Argon2id);
        assert_eq!(config.ui.page_size, Some(25));
        assert_eq!(config.ui.editor.as_deref(), Some("nano"));
    }

    #[test]
    fn test_unknown_derivation_rejected() {
        let result: Result<PocketConfig, _> =
            toml::from_str("[security]\nkey_derivation = \"rot13\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = read_config_or_default(&dir.path().join("absent.toml")).unwrap();
        assert!(config.database.path.is_none());
    }
}
