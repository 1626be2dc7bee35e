//! Name-based symbol resolution and navigation over the live outline.

use std::path::Path;

use crate::error::Error;
use crate::outline::SymbolSource;
use crate::types::{OutlineNode, ResolvedSymbol, SymbolSpan, Target};

/// Where navigation lands. The production implementation prints locations
/// for the shell to consume; tests record them.
pub trait Navigator {
    /// Open a file with no particular position.
    ///
    /// # Errors
    ///
    /// Returns an error when the destination cannot be opened.
    fn open_file(&mut self, path: &Path) -> Result<(), Error>;

    /// Open a file at a symbol's start position.
    ///
    /// # Errors
    ///
    /// Returns an error when the destination cannot be opened.
    fn open_symbol(&mut self, path: &Path, span: &SymbolSpan) -> Result<(), Error>;
}

/// The production navigator: prints locations to stdout in the
/// conventional `path:line:column` form editors and terminals understand.
#[derive(Default)]
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    /// Print the bare file path.
    fn open_file(&mut self, path: &Path) -> Result<(), Error> {
        println!("{}", path.display());
        return Ok(());
    }

    /// Print `path:line:column` for the symbol's start position.
    fn open_symbol(&mut self, path: &Path, span: &SymbolSpan) -> Result<(), Error> {
        println!("{}:{}:{}", path.display(), span.start_line, span.start_col);
        return Ok(());
    }
}

/// Find the symbol at a one-based line, for bookmarking what is under the
/// cursor. A symbol starting exactly on the line wins; otherwise the
/// narrowest entry whose span contains the line is taken.
///
/// # Errors
///
/// Returns `Error::NoSymbolAtLine` if no outline entry starts on or spans
/// the line, or any error from obtaining the outline.
pub fn capture_at_line(
    source: &dyn SymbolSource,
    path: &Path,
    line: u32,
) -> Result<ResolvedSymbol, Error> {
    let outline = source.outline(path)?;
    let flat = flatten(&outline);

    if let Some(exact) = flat.iter().find(|s| return s.span.start_line == line) {
        return Ok(exact.clone());
    }

    let mut best: Option<&ResolvedSymbol> = None;
    for symbol in &flat {
        if symbol.span.start_line > line || symbol.span.end_line < line {
            continue;
        }
        let width = symbol.span.end_line.saturating_sub(symbol.span.start_line);
        let narrower = match best {
            None => true,
            Some(current) => {
                width < current.span.end_line.saturating_sub(current.span.start_line)
            },
        };
        if narrower {
            best = Some(symbol);
        }
    }

    return best.cloned().ok_or_else(|| {
        return Error::NoSymbolAtLine { file: path.to_path_buf(), line };
    });
}

/// Flatten an outline to the addressable symbols, two levels deep: each
/// entry followed by its children, in document order. Levels past the
/// second are not addressable.
pub fn flatten(outline: &[OutlineNode]) -> Vec<ResolvedSymbol> {
    let mut flat = Vec::new();
    for entry in outline {
        flat.push(ResolvedSymbol { name: entry.name.clone(), span: entry.span });
        for child in &entry.children {
            flat.push(ResolvedSymbol { name: child.name.clone(), span: child.span });
        }
    }
    return flat;
}

/// Navigate to a target. File targets open directly; symbol targets are
/// resolved against the file's current outline first, so navigation lands
/// where the symbol is now, not where it was bookmarked. On resolution
/// failure the navigator is not invoked.
///
/// # Errors
///
/// Returns `Error::SymbolNotFound` if a symbol target no longer resolves,
/// or any error from the outline or the navigator.
pub fn navigate(
    source: &dyn SymbolSource,
    navigator: &mut dyn Navigator,
    target: &Target,
) -> Result<(), Error> {
    match target {
        Target::File(path) => return navigator.open_file(path),
        Target::Symbol { name, path } => {
            let resolved = resolve(source, path, name)?;
            return navigator.open_symbol(path, &resolved.span);
        },
    }
}

/// Resolve a symbol name against the file's current outline. Matching is
/// exact and case-sensitive; when several entries share the name, the
/// first in flattened document order wins.
///
/// # Errors
///
/// Returns `Error::SymbolNotFound`, carrying the names the outline does
/// contain, or any error from obtaining the outline.
pub fn resolve(
    source: &dyn SymbolSource,
    path: &Path,
    symbol: &str,
) -> Result<ResolvedSymbol, Error> {
    let outline = source.outline(path)?;
    let flat = flatten(&outline);

    let Some(found) = flat.iter().find(|s| return s.name == symbol) else {
        return Err(Error::SymbolNotFound {
            available: flat.iter().map(|s| return s.name.clone()).collect(),
            file: path.to_path_buf(),
            symbol: symbol.to_string(),
        });
    };
    return Ok(found.clone());
}
