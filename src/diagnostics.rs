use std::fmt::Write as _;

use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened, why, and how to fix it.
/// Designed to be readable by both humans and LLM agents.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::BookmarkNotFound { path, symbol } => {
            render_bookmark_not_found(&path.display().to_string(), symbol.as_deref())
        },
        Error::CorruptStore { path, reason } => {
            render_corrupt_store(&path.display().to_string(), reason)
        },
        Error::NoSymbolAtLine { file, line } => {
            render_no_symbol_at_line(&file.display().to_string(), *line)
        },
        Error::SymbolNotFound { available, file, symbol } => {
            render_symbol_not_found(&file.display().to_string(), symbol, available)
        },
        Error::UnsupportedLanguage { ext } => render_unsupported_language(ext),
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::FileTooLarge { file, max_bytes, size_bytes } => format!("\
# Error: File Too Large

`{}` is {size_bytes} bytes (max {max_bytes}).
", file.display()),

        Error::ParseFailed { file, reason } => format!("\
# Error: Parse Failed

Could not parse `{}`: {reason}
", file.display()),

        Error::WatchFailed { reason } => format!("\
# Error: Watch Failed

Could not watch the storage directory: {reason}
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Json(e) => format!("\
# Error: Invalid JSON

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_bookmark_not_found(path: &str, symbol: Option<&str>) -> String {
    let target = match symbol {
        None => format!("`{path}` has no bookmarks"),
        Some(name) => format!("`{path}#{name}` is not bookmarked"),
    };

    format!(
        "\
# Error: Not Bookmarked

{target}.

## Fix

See what is bookmarked:

    symfav list
"
    )
}

fn render_corrupt_store(path: &str, reason: &str) -> String {
    format!(
        "\
# Error: Store Corrupt

`{path}` could not be parsed: {reason}

## Fix

The file has been left untouched. Inspect it and repair the JSON by hand:

    cat {path}
"
    )
}

fn render_no_symbol_at_line(file: &str, line: u32) -> String {
    format!(
        "\
# Error: No Symbol At Line

No symbol starts on or spans line {line} of `{file}`.

## Fix

List the lines that do hold symbols:

    symfav symbols {file}
"
    )
}

fn render_symbol_not_found(file: &str, symbol: &str, available: &[String]) -> String {
    let mut out = format!("\
# Error: Symbol Not Found

Symbol `{symbol}` does not exist in `{file}`. It may have been renamed or removed
since it was bookmarked.
");

    let best = find_closest_suggestion(symbol, available);

    if let Some(suggestion) = &best {
        let _ = write!(out, "\n## Did you mean `{suggestion}`?\n\n");
        out.push_str("Re-point the bookmark at the new name:\n\n");
        let _ = writeln!(out, "    symfav remove {file} {symbol}");
        let _ = writeln!(out, "    symfav add {file} {suggestion}");
    } else if available.is_empty() {
        out.push_str("\
\n## Fix

The file currently has no addressable symbols. Check the file:

");
        let _ = writeln!(out, "    symfav symbols {file}");
    } else {
        out.push_str("\n## Available symbols\n\n");
        for name in available {
            let _ = writeln!(out, "- `{name}`");
        }
    }

    out
}

/// Find a near-miss suggestion: an available name equal apart from letter
/// case, or equal after trimming surrounding whitespace.
pub(crate) fn find_closest_suggestion(symbol: &str, available: &[String]) -> Option<String> {
    let normalized = symbol.trim().to_lowercase();
    available
        .iter()
        .find(|name| name.trim().to_lowercase() == normalized)
        .cloned()
}

fn render_unsupported_language(ext: &str) -> String {
    format!(
        "\
# Error: Unsupported Language

No tree-sitter grammar for `.{ext}` files.

## Supported extensions

- `.rs` — Rust
- `.ts`, `.tsx`, `.js`, `.jsx` — TypeScript / JavaScript
- `.py` — Python
- `.go` — Go
- `.sh`, `.bash` — Shell
- `.md` — Markdown
"
    )
}
