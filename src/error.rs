/// Crate-level error types for symfav diagnostics.
use std::path::PathBuf;

/// All errors in symfav carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the file, symbol, or reason for failure.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The addressed bookmark or file group is not in the registry.
    #[error(
        "not bookmarked: {}{}",
        path.display(),
        symbol.as_ref().map(|s| return format!("#{s}")).unwrap_or_default()
    )]
    BookmarkNotFound {
        /// File path the target named.
        path: PathBuf,
        /// Symbol name, absent when the target was a whole file group.
        symbol: Option<String>,
    },

    /// A persisted store file is non-empty but not parseable as its expected shape.
    #[error("store corrupt: {}: {reason}", path.display())]
    CorruptStore {
        /// Path to the unparseable store file.
        path: PathBuf,
        /// Description of what failed to parse.
        reason: String,
    },

    /// A referenced source file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Source file exceeds the configured size limit.
    #[error("file too large ({size_bytes} bytes, max {max_bytes}): {}", file.display())]
    FileTooLarge {
        /// File that exceeded the size limit.
        file: PathBuf,
        /// Maximum allowed file size in bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        size_bytes: u64,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// Capture found no symbol starting on or enclosing the given line.
    #[error("no symbol at line {line} in {}", file.display())]
    NoSymbolAtLine {
        /// File whose outline was searched.
        file: PathBuf,
        /// One-based line the capture targeted.
        line: u32,
    },

    /// Tree-sitter failed to parse a source file.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// The outline was obtained but no entry matches the bookmarked name.
    /// The file may have changed: the symbol may have been renamed or removed.
    #[error("symbol not found: `{symbol}` in {} (may have been renamed or removed)", file.display())]
    SymbolNotFound {
        /// Names the current outline does contain, for diagnostics.
        available: Vec<String>,
        /// File that was searched for the symbol.
        file: PathBuf,
        /// Symbol name that was not found.
        symbol: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// No tree-sitter grammar registered for this file extension.
    #[error("no grammar for extension: .{ext}")]
    UnsupportedLanguage {
        /// File extension without the leading dot.
        ext: String,
    },

    /// The filesystem watcher could not be created or attached.
    #[error("watch failed: {reason}")]
    WatchFailed {
        /// Description of the watcher failure.
        reason: String,
    },
}
