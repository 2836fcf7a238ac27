use pocket_core::storage::{NewNote, NoteRepository};

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::errors::CliError;
use crate::helpers::read_note_content;
use crate::output::print_success;

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    if args.name.trim().is_empty() {
        return Err(CliError::invalid_input("--name cannot be empty").into());
    }

    let store = ctx.open_store()?;
    let content = read_note_content(args.content.clone(), ctx.editor()?, None)?;
    let note = store.create(&NewNote::new(
        args.name.clone(),
        args.description.clone(),
        content,
    ))?;

    if !ctx.quiet() {
        print_success(&format!("Added note {}", note.id));
    }
    Ok(())
}
