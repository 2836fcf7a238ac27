//! Pocket CLI - A password-protected, encrypted personal note store
//!
//! This is the command-line interface for Pocket. It drives the core's
//! password gate and note store from the terminal.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;

use clap::Parser;
use pocket_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{maintenance, misc, notes};
use crate::errors::exit_code_for;
use crate::output::print_error;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::setup_tracing(cli.debug) {
        eprintln!("Warning: {}", e);
    }
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        print_error(&format!("{}", e));
        std::process::exit(exit_code_for(&e));
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Add(args)) => {
            notes::handle_add(ctx, args)?;
        }
        Some(Commands::List(args)) => {
            notes::handle_list(ctx, args)?;
        }
        Some(Commands::Search(args)) => {
            notes::handle_search(ctx, args)?;
        }
        Some(Commands::Show(args)) => {
            notes::handle_show(ctx, args)?;
        }
        Some(Commands::Edit(args)) => {
            notes::handle_edit(ctx, args)?;
        }
        Some(Commands::Delete(args)) => {
            notes::handle_delete(ctx, args)?;
        }
        Some(Commands::Check) => {
            maintenance::handle_check(ctx)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("Pocket v{}", VERSION);
            println!("\nQuickstart:");
            println!("  pocket add --name \"Groceries\" --content \"milk, eggs\"");
            println!("  pocket list");
            println!("  pocket search groc");
            println!("  pocket show <id> --reveal");
            println!("\nRun `pocket --help` for full usage.");
        }
    }

    Ok(())
}
