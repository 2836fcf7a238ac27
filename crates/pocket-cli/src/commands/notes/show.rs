use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::output::{note_json, print_note};

use super::require_note;

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let note = require_note(&store, args.id)?;

    if args.json {
        let output = serde_json::to_string_pretty(&note_json(&note, args.reveal))?;
        println!("{}", output);
    } else {
        print_note(&note, args.reveal);
    }
    Ok(())
}
