use std::io::IsTerminal;

use chrono::Utc;
use pocket_core::storage::NoteRepository;

use crate::app::AppContext;
use crate::cli::EditArgs;
use crate::errors::CliError;
use crate::helpers::read_content_from_editor;
use crate::output::print_success;

use super::require_note;

pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let mut note = require_note(&store, args.id)?;

    if args.has_field_flags() {
        if let Some(name) = args.name.as_ref() {
            if name.trim().is_empty() {
                return Err(CliError::invalid_input("--name cannot be empty").into());
            }
            note.name = name.clone();
        }
        if let Some(description) = args.description.as_ref() {
            note.description = description.clone();
        }
        if let Some(content) = args.content.as_ref() {
            note.content = content.clone();
        }
    } else {
        if !std::io::stdin().is_terminal() {
            return Err(CliError::invalid_input(
                "Nothing to change; pass --name, --description or --content",
            )
            .into());
        }
        note.content = read_content_from_editor(ctx.editor()?, Some(&note.content))?;
    }

    note.touch(Utc::now());
    store.update(&note)?;

    if !ctx.quiet() {
        print_success(&format!("Updated note {}", note.id));
    }
    Ok(())
}
