//! Text output formatting for notes.

use std::io::IsTerminal;

use chrono::{DateTime, Local, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use owo_colors::OwoColorize;

use pocket_core::storage::{Note, NotePage};

use crate::constants::CONTENT_MASK;

fn format_time(value: &DateTime<Utc>) -> String {
    value
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Print one page of notes as a table with a page footer.
pub fn print_note_page(page: &NotePage, page_number: u32, page_size: u32, quiet: bool) {
    if page.notes.is_empty() {
        if !quiet {
            if page.total == 0 {
                println!("No notes found.");
            } else {
                println!(
                    "Page {} is empty ({} notes in {} pages).",
                    page_number,
                    page.total,
                    page.page_count(page_size)
                );
            }
        }
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "NAME", "DESCRIPTION", "UPDATED"]);
    for note in &page.notes {
        table.add_row(vec![
            note.id.to_string(),
            note.name.clone(),
            note.description.clone(),
            format_time(&note.updated_at),
        ]);
    }
    println!("{}", table);

    if !quiet {
        println!(
            "Page {} of {} ({} notes)",
            page_number,
            page.page_count(page_size),
            page.total
        );
    }
}

/// Print a single note, masking the content unless `reveal` is set.
pub fn print_note(note: &Note, reveal: bool) {
    println!("ID:          {}", note.id);
    println!("Name:        {}", note.name);
    println!("Description: {}", note.description);
    println!("Created:     {}", format_time(&note.created_at));
    println!("Updated:     {}", format_time(&note.updated_at));
    println!();
    if reveal {
        println!("{}", note.content);
    } else {
        println!("{}", CONTENT_MASK);
    }
}

/// Print an error to stderr, colored when stderr is a terminal.
pub fn print_error(message: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {}", "Error:".red().bold(), message);
    } else {
        eprintln!("Error: {}", message);
    }
}

/// Print a status line to stdout, colored when stdout is a terminal.
pub fn print_success(message: &str) {
    if std::io::stdout().is_terminal() {
        println!("{}", message.green());
    } else {
        println!("{}", message);
    }
}
