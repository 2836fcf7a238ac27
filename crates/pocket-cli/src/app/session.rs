//! Passphrase handling and store opening with retry logic.

use std::io::IsTerminal;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use pocket_core::storage::{NoteStore, SqliteEngine, StorageEngine, PROBE_KEY};
use pocket_core::{PasswordGate, PocketError};

use crate::constants::MAX_PASSPHRASE_ATTEMPTS;
use crate::errors::CliError;
use crate::helpers::{env_passphrase, prompt_new_passphrase, prompt_passphrase};

use super::context::AppContext;

/// Authenticate against the configured database and open the note store.
///
/// A new database is bootstrapped right after the first successful
/// authentication.
pub fn open_store_with_retry(ctx: &AppContext) -> anyhow::Result<NoteStore<SqliteEngine>> {
    let path = ctx.database_path()?;
    let engine = Arc::new(SqliteEngine::open(&path)?);
    let derivation = ctx.config()?.security.key_derivation;
    let mut gate = PasswordGate::new(Arc::clone(&engine)).with_key_derivation(derivation);
    let first_run = is_new_database(engine.as_ref())?;
    debug!(path = %path.display(), first_run, "Opening database");

    if let Some(passphrase) = env_passphrase() {
        authenticate_once(&mut gate, &passphrase)?;
    } else if !std::io::stdin().is_terminal() {
        return Err(CliError::invalid_input(
            "No passphrase provided and no TTY available. Set POCKET_PASSPHRASE.",
        )
        .into());
    } else if first_run {
        let passphrase = prompt_new_passphrase()?;
        authenticate_once(&mut gate, &passphrase)?;
    } else {
        authenticate_with_retry(&mut gate)?;
    }

    if gate.needs_bootstrap() {
        gate.init_schema()?;
        if !ctx.quiet() {
            eprintln!("Created new database at {}", path.display());
        }
    }

    Ok(gate.open_store()?)
}

/// A database without a stored probe has never been bootstrapped.
///
/// A missing probe next to an existing note table is reported before any
/// prompt, since no passphrase can open that database.
fn is_new_database(engine: &SqliteEngine) -> anyhow::Result<bool> {
    if !engine.config_table_exists()? {
        return Ok(true);
    }
    if engine.config_value(PROBE_KEY)?.is_some() {
        return Ok(false);
    }
    if engine.note_table_exists()? {
        return Err(PocketError::Storage(
            "Password probe is missing, the database may be corrupted".to_string(),
        )
        .into());
    }
    Ok(true)
}

fn authenticate_once(
    gate: &mut PasswordGate<SqliteEngine>,
    passphrase: &SecretString,
) -> anyhow::Result<()> {
    match gate.authenticate(passphrase.expose_secret()) {
        Ok(_) => Ok(()),
        Err(PocketError::Authentication(_)) => {
            Err(CliError::auth_failed("Incorrect passphrase.").into())
        }
        Err(PocketError::Validation(message)) => Err(CliError::invalid_input(message).into()),
        Err(err) => Err(err.into()),
    }
}

fn authenticate_with_retry(gate: &mut PasswordGate<SqliteEngine>) -> anyhow::Result<()> {
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let passphrase = prompt_passphrase()?;
        let rejection = match gate.authenticate(passphrase.expose_secret()) {
            Ok(_) => return Ok(()),
            Err(PocketError::Authentication(_)) => "Incorrect passphrase.".to_string(),
            Err(PocketError::Validation(message)) => message,
            Err(err) => return Err(err.into()),
        };

        let remaining = MAX_PASSPHRASE_ATTEMPTS.saturating_sub(attempts);
        if remaining == 0 {
            return Err(CliError::auth_failed_with_hint(
                "Too many failed passphrase attempts.",
                "Hint: If you forgot your passphrase, the notes cannot be recovered.",
            )
            .into());
        }
        eprintln!(
            "{} {} attempt{} remaining.",
            rejection,
            remaining,
            if remaining == 1 { "" } else { "s" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_new_database() {
        let engine = Arc::new(SqliteEngine::open_in_memory().unwrap());
        assert!(is_new_database(&engine).unwrap());

        engine.create_config_table().unwrap();
        assert!(is_new_database(&engine).unwrap());

        let mut gate = PasswordGate::new(Arc::clone(&engine));
        gate.authenticate("GoodPass1").unwrap();
        gate.init_schema().unwrap();
        assert!(!is_new_database(&engine).unwrap());
    }

    #[test]
    fn test_missing_probe_with_notes_fails_before_prompt() {
        let engine = SqliteEngine::open_in_memory().unwrap();
        engine.create_config_table().unwrap();
        engine.create_note_table().unwrap();

        let err = is_new_database(&engine).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PocketError>(),
            Some(PocketError::Storage(_))
        ));
        assert!(err.to_string().contains("corrupted"));
    }

    #[test]
    fn test_wrong_passphrase_maps_to_auth_failed() {
        let engine = Arc::new(SqliteEngine::open_in_memory().unwrap());
        let mut gate = PasswordGate::new(Arc::clone(&engine));
        gate.authenticate("GoodPass1").unwrap();
        gate.init_schema().unwrap();

        let mut gate = PasswordGate::new(engine);
        let passphrase = SecretString::from("WrongPass2".to_string());
        let err = authenticate_once(&mut gate, &passphrase).unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(
            cli_err.exit_code(),
            crate::constants::exit_codes::AUTH_FAILED
        );
    }

    #[test]
    fn test_bad_syntax_maps_to_invalid_input() {
        let engine = Arc::new(SqliteEngine::open_in_memory().unwrap());
        let mut gate = PasswordGate::new(engine);
        let passphrase = SecretString::from("short".to_string());
        let err = authenticate_once(&mut gate, &passphrase).unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(
            cli_err.exit_code(),
            crate::constants::exit_codes::INVALID_INPUT
        );
    }
}
