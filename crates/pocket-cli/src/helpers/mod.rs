//! Helper functions for the Pocket CLI.

mod input;

pub use input::{
    confirm, env_passphrase, prompt_new_passphrase, prompt_passphrase, read_content_from_editor,
    read_note_content,
};
