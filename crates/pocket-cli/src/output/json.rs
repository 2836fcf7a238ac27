//! JSON output formatting for notes.

use pocket_core::storage::{Note, NotePage};

/// Convert a note to JSON for output.
///
/// Content is only included when `reveal` is set.
pub fn note_json(note: &Note, reveal: bool) -> serde_json::Value {
    let mut value = serde_json::json!({
        "id": note.id,
        "name": note.name,
        "description": note.description,
        "created_at": note.created_at,
        "updated_at": note.updated_at,
    });
    if reveal {
        value["content"] = serde_json::Value::String(note.content.clone());
    }
    value
}

/// Convert a page of notes to JSON, without note content.
pub fn page_json(page: &NotePage, page_number: u32, page_size: u32) -> serde_json::Value {
    serde_json::json!({
        "total": page.total,
        "page": page_number,
        "page_count": page.page_count(page_size),
        "notes": page
            .notes
            .iter()
            .map(|note| note_json(note, false))
            .collect::<Vec<_>>(),
    })
}
