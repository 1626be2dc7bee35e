/// Tree-sitter grammar resolution by file extension.
use std::path::Path;

use tree_sitter::Language;

use crate::error::Error;

/// Map a source file to its tree-sitter language by extension.
///
/// # Errors
///
/// Returns `Error::UnsupportedLanguage` when no grammar is bundled for
/// the file's extension.
pub fn language_for_path(path: &Path) -> Result<Language, Error> {
    let ext = path.extension().and_then(|e| return e.to_str()).unwrap_or("");
    return bundled_language(ext).ok_or_else(|| {
        return Error::UnsupportedLanguage { ext: ext.to_string() };
    });
}

/// The bundled grammar for an extension, if one exists. JavaScript files
/// go through the TypeScript grammar, which parses them fine for
/// outlining purposes.
fn bundled_language(ext: &str) -> Option<Language> {
    let language = match ext {
        "bash" | "sh" => tree_sitter_bash::LANGUAGE,
        "go" => tree_sitter_go::LANGUAGE,
        "js" | "ts" => tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
        "jsx" | "tsx" => tree_sitter_typescript::LANGUAGE_TSX,
        "md" | "markdown" => tree_sitter_md::LANGUAGE,
        "py" => tree_sitter_python::LANGUAGE,
        "rs" => tree_sitter_rust::LANGUAGE,
        _ => return None,
    };
    return Some(language.into());
}
