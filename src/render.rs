//! Terminal rendering of the favourites tree.

use std::fmt::Write as _;

use crate::types::FavouritesTree;

/// Shown when the tree has no groups.
const EMPTY_HINT: &str = "No favourites yet. Add one with `symfav add <file> <symbol>`.\n";

/// Render every group collapsed to a single line with a bookmark count.
pub fn render_collapsed(tree: &FavouritesTree) -> String {
    if tree.is_empty() {
        return EMPTY_HINT.to_string();
    }

    let mut out = String::new();
    for group in &tree.groups {
        let count = group.bookmarks.len();
        let noun = if count == 1 { "bookmark" } else { "bookmarks" };
        let _ = writeln!(out, "{}  {count} {noun}", group.label);
    }
    return out;
}

/// Render the tree as pretty-printed JSON for scripting. An empty tree is
/// still JSON here; the friendly hint is for humans only.
pub fn render_json(tree: &FavouritesTree) -> String {
    // serde_json::to_string_pretty won't fail on this structure.
    return serde_json::to_string_pretty(tree).unwrap_or_default();
}

/// Render the full tree: one line per group with its path, then each
/// bookmark indented with the name column padded so notes line up.
pub fn render_tree(tree: &FavouritesTree) -> String {
    if tree.is_empty() {
        return EMPTY_HINT.to_string();
    }

    let mut out = String::new();
    for group in &tree.groups {
        let _ = writeln!(out, "{}  {}", group.label, group.path.display());
        let width = group
            .bookmarks
            .iter()
            .map(|b| return b.name.chars().count())
            .max()
            .unwrap_or(0);
        for bookmark in &group.bookmarks {
            match &bookmark.note {
                None => {
                    let _ = writeln!(out, "  {}", bookmark.name);
                },
                Some(note) => {
                    let _ = writeln!(out, "  {:width$}  {note}", bookmark.name);
                },
            }
        }
    }
    return out;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use std::path::PathBuf;

    use super::{render_collapsed, render_json, render_tree};
    use crate::types::{Bookmark, FavouritesTree, FileGroup};

    fn sample_tree() -> FavouritesTree {
        FavouritesTree {
            groups: vec![FileGroup {
                bookmarks: vec![
                    Bookmark {
                        name: "parse".to_string(),
                        note: Some("entry point".to_string()),
                        path: PathBuf::from("/repo/src/lib.rs"),
                    },
                    Bookmark {
                        name: "Config".to_string(),
                        note: None,
                        path: PathBuf::from("/repo/src/lib.rs"),
                    },
                ],
                label: "lib.rs".to_string(),
                path: PathBuf::from("/repo/src/lib.rs"),
            }],
        }
    }

    #[test]
    fn empty_tree_renders_the_hint() {
        let tree = FavouritesTree { groups: Vec::new() };
        assert!(render_tree(&tree).contains("No favourites yet"));
        assert!(render_collapsed(&tree).contains("No favourites yet"));
    }

    #[test]
    fn full_rendering_aligns_notes() {
        let out = render_tree(&sample_tree());
        assert_eq!(out, "lib.rs  /repo/src/lib.rs\n  parse   entry point\n  Config\n");
    }

    #[test]
    fn collapsed_rendering_counts_bookmarks() {
        let out = render_collapsed(&sample_tree());
        assert_eq!(out, "lib.rs  2 bookmarks\n");
    }

    #[test]
    fn json_rendering_exposes_the_structure() {
        let out = render_json(&sample_tree());
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let group = parsed.get("groups").unwrap().get(0).unwrap();
        assert_eq!(group.get("label").unwrap(), "lib.rs");
        assert_eq!(
            group.get("bookmarks").unwrap().get(0).unwrap().get("name").unwrap(),
            "parse"
        );
    }
}
