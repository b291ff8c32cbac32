use bookmark_folders::commands::*;
use bookmark_folders::core::{command_init::CommandOptions, error::Result, print_error};
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bookmark-folders")]
#[command(about = "Organize bookmarks into folders, stored per save or server")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Directory holding config/bookmark-folders (defaults to the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    instance_dir: Option<PathBuf>,

    /// JSON array of ingredient objects used to resolve bookmark keys
    #[arg(long, global = true, value_name = "FILE")]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List folders in the current namespace
    List,
    /// Show the bookmarks of a folder
    Show {
        /// Folder id
        id: String,
    },
    /// Create a folder
    Create {
        /// Folder name
        name: String,
    },
    /// Delete a folder
    Delete {
        /// Folder id
        id: String,
    },
    /// Rename a folder
    Rename {
        /// Folder id
        id: String,
        /// New folder name
        name: String,
    },
    /// Add bookmark keys to a folder
    Add {
        /// Folder id
        id: String,
        /// Bookmark keys (e.g. "ore_iron ore_gold")
        keys: Vec<String>,
    },
    /// Remove bookmark keys from a folder
    Remove {
        /// Folder id
        id: String,
        /// Bookmark keys
        keys: Vec<String>,
    },
    /// Move a bookmark key from one folder to another
    Move {
        /// Source folder id
        from: String,
        /// Target folder id
        to: String,
        /// Bookmark key
        key: String,
    },
    /// Show or change the active folder
    Active {
        /// Folder id to make active
        id: Option<String>,
        /// Clear the active folder
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },
    /// Show the storage namespace and data file in use
    Namespace,
}

fn run(cli: Cli) -> Result<()> {
    let options = CommandOptions {
        instance_dir: cli.instance_dir,
        registry: cli.registry,
    };

    match cli.command {
        Commands::List => execute_list(&options),
        Commands::Show { id } => execute_show(&options, &id),
        Commands::Create { name } => execute_create(&options, &name),
        Commands::Delete { id } => execute_delete(&options, &id),
        Commands::Rename { id, name } => execute_rename(&options, &id, &name),
        Commands::Add { id, keys } => execute_add(&options, &id, &keys),
        Commands::Remove { id, keys } => execute_remove(&options, &id, &keys),
        Commands::Move { from, to, key } => execute_move(&options, &from, &to, &key),
        Commands::Active { id, clear } => execute_active(&options, id.as_deref(), clear),
        Commands::Namespace => execute_namespace(&options),
    }
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
