//! Note commands: add, list, search, show, edit, delete.

mod add;
mod delete;
mod edit;
mod list;
mod show;

pub use add::handle_add;
pub use delete::handle_delete;
pub use edit::handle_edit;
pub use list::{handle_list, handle_search};
pub use show::handle_show;

use pocket_core::storage::{Note, NoteRepository};

use crate::errors::CliError;

/// Fetch a note or fail with a not-found error.
fn require_note(store: &impl NoteRepository, id: i64) -> anyhow::Result<Note> {
    store.get(id)?.ok_or_else(|| {
        CliError::not_found(
            format!("Note {} not found", id),
            "Hint: Run `pocket list` to find note IDs.",
        )
        .into()
    })
}
