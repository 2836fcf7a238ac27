use pocket_core::storage::{NoteRepository, StorageEngine};

use crate::app::AppContext;
use crate::errors::CliError;

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    if let Err(err) = store.engine().check_integrity() {
        eprintln!("Integrity check: FAILED");
        eprintln!("- database: {}", err);
        return Err(CliError::integrity_failed("Integrity check failed").into());
    }

    let checked = match store.verify() {
        Ok(count) => count,
        Err(err) => {
            eprintln!("Integrity check: FAILED");
            eprintln!("- notes: {}", err);
            return Err(CliError::integrity_failed("Integrity check failed").into());
        }
    };

    if !ctx.quiet() {
        println!("Integrity check: OK");
        println!("- database: OK");
        println!("- notes decrypted: {}", checked);
    }
    Ok(())
}
