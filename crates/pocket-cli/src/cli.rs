use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use pocket_core::VERSION;

/// Pocket - A password-protected, encrypted personal note store
#[derive(Parser)]
#[command(name = "pocket")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the database file
    #[arg(long, global = true, env = "POCKET_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true, env = "POCKET_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write debug logs to debug.log in the working directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new note
    Add(AddArgs),

    /// List notes, newest first
    List(ListArgs),

    /// Search note names and descriptions
    Search(SearchArgs),

    /// Show a single note
    Show(ShowArgs),

    /// Edit a note
    Edit(EditArgs),

    /// Delete a note
    Delete(DeleteArgs),

    /// Check database integrity and decrypt every note
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Note name
    #[arg(long)]
    pub name: String,

    /// Short description (searchable, stored in plain text)
    #[arg(long, default_value = "")]
    pub description: String,

    /// Note content (overrides stdin/editor)
    #[arg(long)]
    pub content: Option<String>,
}

/// Paging flags shared by `list` and `search`
#[derive(Args)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Notes per page (defaults to the config value)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Only list notes matching this term
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    #[command(flatten)]
    pub paging: PageArgs,
}

/// Arguments for the `search` command
#[derive(Args)]
pub struct SearchArgs {
    /// Search term; every word must prefix-match the name or description
    #[arg(value_name = "TERM")]
    pub term: String,

    #[command(flatten)]
    pub paging: PageArgs,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Print the decrypted content instead of a mask
    #[arg(long)]
    pub reveal: bool,

    /// Output as JSON (content included only with --reveal)
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New content
    #[arg(long)]
    pub content: Option<String>,
}

impl EditArgs {
    /// Whether any field flag was given.
    pub fn has_field_flags(&self) -> bool {
        self.name.is_some() || self.description.is_some() || self.content.is_some()
    }
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_paging() {
        let cli = Cli::try_parse_from(["pocket", "list", "--page", "2", "--limit", "5"]).unwrap();
        match cli.command {
            Some(Commands::List(args)) => {
                assert_eq!(args.paging.page, 2);
                assert_eq!(args.paging.limit, Some(5));
                assert!(args.search.is_none());
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_global_db_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["pocket", "check", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }
}
