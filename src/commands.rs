//! Core CLI commands for symfav: add, go, list, note, notes, remove, symbols.

use std::path::{Path, PathBuf};

use crate::error;
use crate::outline::SymbolSource;
use crate::registry::{AddOutcome, NoteOutcome, Registry};
use crate::render;
use crate::resolver::{self, Navigator};
use crate::store;
use crate::types::Target;

/// Bookmark a symbol in a file. `at` is either a symbol name, or a line
/// number to bookmark whatever symbol is at that line. Either way the
/// symbol is resolved against the file before it is stored, so bookmarks
/// are born valid.
///
/// # Errors
///
/// Returns `Error::SymbolNotFound` or `Error::NoSymbolAtLine` when `at`
/// does not resolve, or errors from outlining and the store.
pub fn add(
    registry: &mut Registry,
    source: &dyn SymbolSource,
    file: &str,
    at: &str,
) -> Result<(), error::Error> {
    let key = store::key_path(Path::new(file))?;

    let name = match at.parse::<u32>() {
        Ok(line) => resolver::capture_at_line(source, &key, line)?.name,
        Err(_) => resolver::resolve(source, &key, at)?.name,
    };

    match registry.add(&key, &name)? {
        AddOutcome::Added => eprintln!("Bookmarked {file}#{name}"),
        AddOutcome::AlreadyPresent => eprintln!("Already bookmarked: {file}#{name}"),
    }
    return Ok(());
}

/// Resolve a bookmark against the file's current outline and print where
/// it lives now. With no symbol, the whole file group is the target.
///
/// # Errors
///
/// Returns `Error::BookmarkNotFound` when the target was never bookmarked,
/// `Error::SymbolNotFound` when the bookmarked name no longer resolves,
/// or errors from outlining.
pub fn go(
    registry: &Registry,
    source: &dyn SymbolSource,
    navigator: &mut dyn Navigator,
    file: &str,
    symbol: Option<&str>,
) -> Result<(), error::Error> {
    let key = store::key_path(Path::new(file))?;

    let group = registry.tree().find_group(&key).ok_or_else(|| {
        return error::Error::BookmarkNotFound {
            path: key.clone(),
            symbol: symbol.map(str::to_string),
        };
    })?;

    let target = match symbol {
        None => Target::File(key),
        Some(name) => {
            if group.find_bookmark(name).is_none() {
                return Err(error::Error::BookmarkNotFound {
                    path: key,
                    symbol: Some(name.to_string()),
                });
            }
            Target::Symbol { name: name.to_string(), path: key }
        },
    };

    return resolver::navigate(source, navigator, &target);
}

/// Output a comprehensive reference document for symfav.
pub fn info(json: bool) {
    return crate::info::run(json);
}

/// Print the favourites tree: full, collapsed to group lines, or as JSON.
pub fn list(registry: &Registry, collapsed: bool, json: bool) {
    let tree = registry.tree();

    if json {
        println!("{}", render::render_json(tree));
        return;
    }

    let rendered = if collapsed {
        render::render_collapsed(tree)
    } else {
        render::render_tree(tree)
    };
    print!("{rendered}");
    return;
}

/// Attach a note to a bookmarked symbol. Text comes from the argument, or
/// from a stderr prompt when omitted; blank text cancels the edit.
///
/// # Errors
///
/// Returns `Error::BookmarkNotFound` when the bookmark is not stored, or
/// errors from reading the prompt and persisting the note.
pub fn note(
    registry: &mut Registry,
    file: &str,
    symbol: &str,
    text: Option<&str>,
) -> Result<(), error::Error> {
    let key = store::key_path(Path::new(file))?;

    // Fail before prompting when the bookmark is not there.
    let bookmarked = registry
        .tree()
        .find_group(&key)
        .and_then(|group| return group.find_bookmark(symbol))
        .is_some();
    if !bookmarked {
        return Err(error::Error::BookmarkNotFound {
            path: key,
            symbol: Some(symbol.to_string()),
        });
    }

    let text = match text {
        None => prompt_note_text(file, symbol)?,
        Some(t) => t.to_string(),
    };

    match registry.set_note(&key, symbol, &text)? {
        NoteOutcome::Cancelled => eprintln!("Note unchanged."),
        NoteOutcome::Saved => eprintln!("Noted {file}#{symbol}"),
    }
    return Ok(());
}

/// Print every stored note as `key  text`, including notes whose bookmark
/// has since been removed.
pub fn notes(registry: &Registry) {
    let entries = registry.all_notes();
    if entries.is_empty() {
        eprintln!("No notes stored.");
        return;
    }
    for (key, text) in &entries {
        println!("{key}  {text}");
    }
    return;
}

/// Read one line of note text from stdin, prompting on stderr.
///
/// # Errors
///
/// Returns `Error::Io` if stdin cannot be read.
fn prompt_note_text(file: &str, symbol: &str) -> Result<String, error::Error> {
    eprint!("Note for {file}#{symbol}: ");
    let mut text = String::new();
    std::io::stdin().read_line(&mut text)?;
    return Ok(text.trim_end().to_string());
}

/// Remove one bookmark, or a whole file group when no symbol is given.
///
/// # Errors
///
/// Returns `Error::BookmarkNotFound` when the target is not stored, or
/// errors from the store.
pub fn remove(
    registry: &mut Registry,
    file: &str,
    symbol: Option<&str>,
) -> Result<(), error::Error> {
    let key = store::key_path(Path::new(file))?;

    match symbol {
        None => {
            let count = registry
                .tree()
                .find_group(&key)
                .map_or(0, |group| return group.bookmarks.len());
            registry.remove(&Target::File(key))?;
            let noun = if count == 1 { "bookmark" } else { "bookmarks" };
            eprintln!("Removed {file} ({count} {noun})");
        },
        Some(name) => {
            registry.remove(&Target::Symbol { name: name.to_string(), path: key })?;
            eprintln!("Removed {file}#{name}");
        },
    }
    return Ok(());
}

/// List the addressable symbols in a file with their current start lines.
///
/// # Errors
///
/// Returns errors from reading and outlining the file.
pub fn symbols(source: &dyn SymbolSource, file: &str) -> Result<(), error::Error> {
    let path = PathBuf::from(file);
    let outline = source.outline(&path)?;

    for symbol in resolver::flatten(&outline) {
        println!("{:>4}  {}", symbol.span.start_line, symbol.name);
    }
    return Ok(());
}
