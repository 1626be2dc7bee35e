mod commands;
mod config;
mod diagnostics;
mod error;
mod grammar;
mod info;
mod notes;
mod outline;
mod registry;
mod render;
mod resolver;
mod store;
mod types;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::notes::{JsonNoteStore, NoteAdapter};
use crate::outline::TreeSitterSource;
use crate::registry::Registry;
use crate::resolver::PrintNavigator;
use crate::store::FavouritesStore;

#[derive(Parser)]
#[command(name = "symfav", about = "Bookmark code symbols and jump back as files drift")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bookmark a symbol in a file, by name or by line number
    Add {
        /// Source file containing the symbol
        file: String,
        /// Symbol name, or a line number to capture whatever is there
        at: String,
    },
    /// Resolve a bookmark and print its current location
    Go {
        /// Bookmarked file
        file: String,
        /// Bookmarked symbol; omit to open the file itself
        symbol: Option<String>,
    },
    /// Print the comprehensive reference document
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show all bookmarks, grouped by file
    List {
        /// One line per file group
        #[arg(long)]
        collapsed: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Attach a note to a bookmarked symbol
    Note {
        /// Bookmarked file
        file: String,
        /// Bookmarked symbol
        symbol: String,
        /// Note text; omit to be prompted
        text: Option<String>,
    },
    /// List every stored note
    Notes,
    /// Remove a bookmark, or a whole file group
    Remove {
        /// Bookmarked file
        file: String,
        /// Bookmarked symbol; omit to remove the whole group
        symbol: Option<String>,
    },
    /// List the addressable symbols in a file
    Symbols {
        /// Source file to outline
        file: String,
    },
    /// Re-render the tree whenever the storage changes
    Watch {
        /// One line per file group
        #[arg(long)]
        collapsed: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    return match run(cli) {
        Err(e) => {
            diagnostics::print_error(&e);
            exit_code_for(&e)
        },
        Ok(()) => ExitCode::SUCCESS,
    };
}

/// Dispatch the parsed command. The registry is opened only for commands
/// that need it, so `info` and `symbols` work even with a corrupt store.
///
/// # Errors
///
/// Returns any error from storage bootstrap or the command itself.
fn run(cli: Cli) -> Result<(), error::Error> {
    let source = TreeSitterSource;

    match cli.command {
        Commands::Add { file, at } => {
            let mut registry = open_registry()?;
            return commands::add(&mut registry, &source, &file, &at);
        },
        Commands::Go { file, symbol } => {
            let registry = open_registry()?;
            let mut navigator = PrintNavigator;
            return commands::go(&registry, &source, &mut navigator, &file, symbol.as_deref());
        },
        Commands::Info { json } => {
            commands::info(json);
            return Ok(());
        },
        Commands::List { collapsed, json } => {
            let registry = open_registry()?;
            commands::list(&registry, collapsed, json);
            return Ok(());
        },
        Commands::Note { file, symbol, text } => {
            let mut registry = open_registry()?;
            return commands::note(&mut registry, &file, &symbol, text.as_deref());
        },
        Commands::Notes => {
            let registry = open_registry()?;
            commands::notes(&registry);
            return Ok(());
        },
        Commands::Remove { file, symbol } => {
            let mut registry = open_registry()?;
            return commands::remove(&mut registry, &file, symbol.as_deref());
        },
        Commands::Symbols { file } => {
            return commands::symbols(&source, &file);
        },
        Commands::Watch { collapsed } => {
            let (mut registry, storage_dir) = open_registry_with_dir()?;
            return watch::run(&mut registry, &storage_dir, collapsed);
        },
    }
}

/// Open the registry from the working directory.
///
/// # Errors
///
/// Returns errors from config loading or store bootstrap.
fn open_registry() -> Result<Registry, error::Error> {
    let (registry, _storage_dir) = open_registry_with_dir()?;
    return Ok(registry);
}

/// Open the registry and also return the storage directory it lives in:
/// load config, create the storage files on first use, read both stores.
///
/// # Errors
///
/// Returns errors from config loading, store creation, or store parsing.
fn open_registry_with_dir() -> Result<(Registry, PathBuf), error::Error> {
    let root = PathBuf::from(".");
    let config = config::Config::load(&root)?;
    let storage_dir = config.storage_dir(&root);

    let favourites = FavouritesStore::new(storage_dir.join("favourites.json"));
    favourites.initialize()?;
    let notes_store = JsonNoteStore::open(storage_dir.join("notes.json"))?;

    let registry = Registry::new(favourites, NoteAdapter::new(Box::new(notes_store)))?;
    return Ok((registry, storage_dir));
}

/// Map an error to the process exit code: not-found conditions are 1,
/// everything else 2.
fn exit_code_for(e: &error::Error) -> ExitCode {
    return match e {
        error::Error::BookmarkNotFound { .. }
        | error::Error::NoSymbolAtLine { .. }
        | error::Error::SymbolNotFound { .. } => ExitCode::from(1),
        _ => ExitCode::from(2),
    };
}
