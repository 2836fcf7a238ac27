use pocket_core::storage::NoteRepository;

use crate::app::AppContext;
use crate::cli::{ListArgs, PageArgs, SearchArgs};
use crate::output::{page_json, print_note_page};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let term = args.search.as_deref().unwrap_or("");
    show_page(ctx, &args.paging, term)
}

pub fn handle_search(ctx: &AppContext, args: &SearchArgs) -> anyhow::Result<()> {
    show_page(ctx, &args.paging, &args.term)
}

fn show_page(ctx: &AppContext, paging: &PageArgs, term: &str) -> anyhow::Result<()> {
    let page_size = ctx.page_size(paging.limit)?;
    let store = ctx.open_store()?;
    let page = store.fetch_page(paging.page, page_size, term)?;

    if paging.json {
        let output = serde_json::to_string_pretty(&page_json(&page, paging.page, page_size))?;
        println!("{}", output);
    } else {
        print_note_page(&page, paging.page, page_size, ctx.quiet());
    }
    Ok(())
}
