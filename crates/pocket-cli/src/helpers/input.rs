//! Input handling helpers for passphrases, note content and confirmations.

use std::io::{self, IsTerminal, Read, Write};
use std::process::Command;

use dialoguer::{Confirm, Password};
use pocket_core::crypto::validate_passphrase;
use secrecy::SecretString;
use tempfile::NamedTempFile;

use crate::constants::PASSPHRASE_ENV;

/// Passphrase from `POCKET_PASSPHRASE`, if set and not blank.
pub fn env_passphrase() -> Option<SecretString> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

/// Prompt for the passphrase of an existing database.
pub fn prompt_passphrase() -> anyhow::Result<SecretString> {
    Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Prompt for a new passphrase with confirmation, until one is valid.
pub fn prompt_new_passphrase() -> anyhow::Result<SecretString> {
    eprintln!("No database found, choose a passphrase for the new one.");
    loop {
        let passphrase = Password::new()
            .with_prompt("New passphrase")
            .with_confirmation("Confirm passphrase", "Passphrases do not match")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?;
        if let Err(err) = validate_passphrase(&passphrase) {
            eprintln!("Passphrase does not meet requirements: {}", err);
            continue;
        }
        return Ok(SecretString::from(passphrase));
    }
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}

/// Read note content from the `--content` flag, stdin, or the editor.
pub fn read_note_content(
    content: Option<String>,
    editor_override: Option<&str>,
    initial: Option<&str>,
) -> anyhow::Result<String> {
    if let Some(value) = content {
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = buffer.trim_end().to_string();
        if trimmed.is_empty() {
            return Err(anyhow::anyhow!(
                "No content provided on stdin; use --content"
            ));
        }
        return Ok(trimmed);
    }

    read_content_from_editor(editor_override, initial)
}

/// Open the editor on a temporary file and return what was saved.
///
/// The file is owner-only and removed when this returns.
pub fn read_content_from_editor(
    editor_override: Option<&str>,
    initial: Option<&str>,
) -> anyhow::Result<String> {
    let editor = editor_override
        .map(|value| value.to_string())
        .or_else(|| std::env::var("EDITOR").ok())
        .ok_or_else(|| {
            anyhow::anyhow!("$EDITOR is not set; use --content or pipe content via stdin")
        })?;

    let mut file = note_tempfile()?;
    file.write_all(initial.unwrap_or("").as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| anyhow::anyhow!("Failed to write temp file: {}", e))?;

    let status = Command::new(editor)
        .arg(file.path())
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    if !status.success() {
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }

    let contents = std::fs::read_to_string(file.path())
        .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e))?;
    Ok(contents.trim_end().to_string())
}

fn note_tempfile() -> anyhow::Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix("pocket_note_")
        .suffix(".txt")
        .tempfile()
        .map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_tempfile_is_removed_on_drop() {
        let file = note_tempfile().unwrap();
        let path = file.path().to_path_buf();
        assert!(path.exists());
        drop(file);
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_note_tempfile_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let file = note_tempfile().unwrap();
        let mode = file.as_file().metadata().unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_failure_removes_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let seen = dir.path().join("seen");
        let script = dir.path().join("editor.sh");
        std::fs::write(
            &script,
            format!("#!/bin/sh\necho \"$1\" > {}\nexit 1\n", seen.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = read_content_from_editor(script.to_str(), Some("secret")).unwrap_err();
        assert!(err.to_string().contains("Editor exited with failure"));
        let edited = std::fs::read_to_string(&seen).unwrap();
        assert!(!std::path::Path::new(edited.trim()).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_round_trip() {
        let content = read_content_from_editor(Some("true"), Some("kept as is\n")).unwrap();
        assert_eq!(content, "kept as is");
    }
}
