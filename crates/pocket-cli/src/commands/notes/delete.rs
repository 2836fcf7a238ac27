use std::io::IsTerminal;

use pocket_core::storage::NoteRepository;

use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::errors::CliError;
use crate::helpers::confirm;
use crate::output::print_success;

use super::require_note;

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let note = require_note(&store, args.id)?;

    if !args.yes {
        if !std::io::stdin().is_terminal() {
            return Err(CliError::invalid_input(
                "Refusing to delete without a terminal; pass --yes",
            )
            .into());
        }
        if !confirm(&format!("Delete note {} \"{}\"?", note.id, note.name))? {
            if !ctx.quiet() {
                println!("Cancelled.");
            }
            return Ok(());
        }
    }

    store.delete(&note)?;
    if !ctx.quiet() {
        print_success(&format!("Deleted note {}", note.id));
    }
    Ok(())
}
