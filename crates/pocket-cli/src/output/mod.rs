//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying notes
//! as tables, detail views and JSON, plus colored status lines.

mod json;
mod text;

// Re-export public API
pub use json::{note_json, page_json};
pub use text::{print_error, print_note, print_note_page, print_success};
