use std::path::PathBuf;

use serde::Serialize;

use crate::config;
use crate::notes::{JsonNoteStore, NoteStore as _};
use crate::store::FavouritesStore;

/// Output the comprehensive symfav reference document.
pub fn run(json: bool) {
    let root = PathBuf::from(".");
    let state = gather_state(&root);

    if json {
        print_json(&state);
    } else {
        print_markdown(&state);
    }
}

// ── State gathering ───────────────────────────────────────────────────

struct CurrentState {
    bookmark_count: Option<usize>,
    config_found: bool,
    note_count: Option<usize>,
}

fn gather_state(root: &std::path::Path) -> CurrentState {
    let config_found = root.join(".symfav.toml").exists();

    let storage_dir = config::Config::load(root).ok().map(|c| c.storage_dir(root));

    let bookmark_count = storage_dir
        .as_ref()
        .and_then(|dir| FavouritesStore::new(dir.join("favourites.json")).load().ok())
        .map(|map| map.values().map(Vec::len).sum());

    let note_count = storage_dir
        .as_ref()
        .and_then(|dir| JsonNoteStore::open(dir.join("notes.json")).ok())
        .map(|store| store.keys().len());

    CurrentState { bookmark_count, config_found, note_count }
}

// ── Markdown output ───────────────────────────────────────────────────

fn print_markdown(state: &CurrentState) {
    let version = env!("CARGO_PKG_VERSION");
    print_markdown_header(version);
    print_markdown_state(state);
    println!();
    print_markdown_exit_codes();
}

fn print_markdown_header(version: &str) {
    print!(
        "\
# symfav {version}

Bookmark code symbols by name, annotate them, and jump back to them even
after the file has been edited underneath.

## Workflow

    symfav add <file> <symbol|line>   Bookmark a symbol (by name, or whatever is at a line)
    symfav list                       Show all bookmarks, grouped by file
    symfav go <file> [symbol]         Resolve a bookmark and print its current location
    symfav note <file> <symbol>       Attach a note to a bookmark
    symfav remove <file> [symbol]     Remove a bookmark, or a whole file group
    symfav symbols <file>             List the addressable symbols in a file
    symfav notes                      List every stored note
    symfav watch                      Re-render the tree as the storage changes

## Supported Languages

| Extension          | Language                |
|--------------------|-------------------------|
| .rs                | Rust                    |
| .ts .tsx .js .jsx  | TypeScript / JavaScript |
| .py                | Python                  |
| .go                | Go                      |
| .sh .bash          | Shell                   |
| .md                | Markdown                |

## Storage (.symfav/)

    .symfav/favourites.json           file path -> bookmarked symbol names
    .symfav/notes.json                \"path:symbol\" -> note text

    Override the directory in .symfav.toml:

    storage_dir = \".bookmarks\"

## Current State

"
    );
}

fn print_markdown_state(state: &CurrentState) {
    if state.config_found {
        println!("Config:     .symfav.toml (found)");
    } else {
        println!("Config:     .symfav.toml (not found)");
    }

    match state.bookmark_count {
        Some(n) => println!("Favourites: {n} bookmarks"),
        None => println!("Favourites: (store not readable)"),
    }

    match state.note_count {
        Some(n) => println!("Notes:      {n} notes"),
        None => println!("Notes:      (store not readable)"),
    }
}

fn print_markdown_exit_codes() {
    print!(
        "\
## Exit Codes

| Code | Meaning |
|------|---------|
| 0    | Success |
| 1    | Bookmark or symbol not found |
| 2    | Runtime error |
"
    );
}

// ── JSON output ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct InfoJson {
    version: String,
    supported_languages: Vec<LanguageInfo>,
    exit_codes: Vec<ExitCodeInfo>,
    current_state: StateJson,
}

#[derive(Serialize)]
struct LanguageInfo {
    extensions: Vec<String>,
    language: String,
}

#[derive(Serialize)]
struct ExitCodeInfo {
    code: u8,
    meaning: String,
}

#[derive(Serialize)]
struct StateJson {
    bookmark_count: Option<usize>,
    config_found: bool,
    note_count: Option<usize>,
}

fn print_json(state: &CurrentState) {
    let info = InfoJson {
        version: env!("CARGO_PKG_VERSION").to_string(),
        supported_languages: vec![
            LanguageInfo {
                extensions: vec![".rs".to_string()],
                language: "Rust".to_string(),
            },
            LanguageInfo {
                extensions: vec![
                    ".ts".to_string(),
                    ".tsx".to_string(),
                    ".js".to_string(),
                    ".jsx".to_string(),
                ],
                language: "TypeScript / JavaScript".to_string(),
            },
            LanguageInfo {
                extensions: vec![".py".to_string()],
                language: "Python".to_string(),
            },
            LanguageInfo {
                extensions: vec![".go".to_string()],
                language: "Go".to_string(),
            },
            LanguageInfo {
                extensions: vec![".sh".to_string(), ".bash".to_string()],
                language: "Shell".to_string(),
            },
            LanguageInfo {
                extensions: vec![".md".to_string()],
                language: "Markdown".to_string(),
            },
        ],
        exit_codes: vec![
            ExitCodeInfo { code: 0, meaning: "Success".to_string() },
            ExitCodeInfo { code: 1, meaning: "Bookmark or symbol not found".to_string() },
            ExitCodeInfo { code: 2, meaning: "Runtime error".to_string() },
        ],
        current_state: StateJson {
            bookmark_count: state.bookmark_count,
            config_found: state.config_found,
            note_count: state.note_count,
        },
    };

    // serde_json::to_string_pretty won't fail on this structure.
    let json = serde_json::to_string_pretty(&info).unwrap_or_default();
    println!("{json}");
}
