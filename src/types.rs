/// Core domain types for symfav bookmarks, file groups, and outlines.
use std::path::{Path, PathBuf};

/// A bookmarked symbol inside a specific file. Leaf node of the tree.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Bookmark {
    /// Symbol name exactly as the outline reported it when bookmarked.
    pub name: String,
    /// Free-text note attached to this bookmark, if any.
    pub note: Option<String>,
    /// File the symbol lives in (absolute, normalized).
    pub path: PathBuf,
}

/// The whole in-memory model handed to the renderer: one group per file
/// that has at least one bookmark, in stored order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FavouritesTree {
    /// File groups in the order the store lists them.
    pub groups: Vec<FileGroup>,
}

impl FavouritesTree {
    /// Look up the group for a file path.
    pub fn find_group(&self, path: &Path) -> Option<&FileGroup> {
        return self.groups.iter().find(|g| return g.path == path);
    }

    /// Whether the tree has no groups at all.
    pub fn is_empty(&self) -> bool {
        return self.groups.is_empty();
    }
}

/// All bookmarks belonging to one file, as displayed and persisted together.
/// Never exists with zero bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileGroup {
    /// Bookmarks in stored order.
    pub bookmarks: Vec<Bookmark>,
    /// Display label: the path's final segment.
    pub label: String,
    /// File the group belongs to (absolute, normalized).
    pub path: PathBuf,
}

impl FileGroup {
    /// Look up a bookmark by symbol name.
    pub fn find_bookmark(&self, name: &str) -> Option<&Bookmark> {
        return self.bookmarks.iter().find(|b| return b.name == name);
    }
}

/// One node of a file's current outline, as reported by the symbol source.
/// Children nest arbitrarily deep; the resolver only looks two levels down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    /// Nested symbols declared inside this one.
    pub children: Vec<OutlineNode>,
    /// Plain (unqualified) symbol name.
    pub name: String,
    /// Where the symbol sits in the file right now.
    pub span: SymbolSpan,
}

/// Output of successful symbol resolution: a live entry from the flattened
/// outline that navigation can be driven to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    /// The matched symbol's name.
    pub name: String,
    /// The matched symbol's current location.
    pub span: SymbolSpan,
}

/// Line/column extent of a symbol. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolSpan {
    /// Last line of the symbol's range.
    pub end_line: u32,
    /// Column where the symbol's range starts.
    pub start_col: u32,
    /// Line where the symbol's range starts.
    pub start_line: u32,
}

/// What a delete or navigate operation addresses. The file role and the
/// symbol role are distinct variants, never told apart by a missing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A whole file group.
    File(
        /// The group's file path.
        PathBuf,
    ),
    /// A single bookmark.
    Symbol {
        /// The bookmarked symbol name.
        name: String,
        /// The bookmark's file path.
        path: PathBuf,
    },
}

impl Target {
    /// The file path both variants carry.
    pub fn path(&self) -> &Path {
        return match self {
            Target::File(path) => path,
            Target::Symbol { path, .. } => path,
        };
    }
}
