//! The favourites registry: bookmark mutations and the rendered tree.

use std::path::Path;

use crate::error::Error;
use crate::notes::NoteAdapter;
use crate::store::{FavouritesMap, FavouritesStore};
use crate::types::{Bookmark, FavouritesTree, FileGroup, Target};

/// Result of adding a bookmark.
#[derive(Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// The bookmark was not present and has been stored.
    Added,
    /// The bookmark was already stored; nothing was written.
    AlreadyPresent,
}

/// Result of setting a note.
#[derive(Debug, PartialEq, Eq)]
pub enum NoteOutcome {
    /// The note text was blank; nothing was written.
    Cancelled,
    /// The note was stored on the bookmark.
    Saved,
}

/// The in-memory registry over the favourites store and the note adapter.
/// Every mutation goes through a full load, modify, save cycle and then
/// rebuilds the tree, so the tree always reflects what is on disk. When a
/// mutation fails, the last successfully built tree is kept.
pub struct Registry {
    /// Adapter for reading and writing bookmark notes.
    notes: NoteAdapter,
    /// Persistence for the path → symbol-names mapping.
    store: FavouritesStore,
    /// The current display tree, rebuilt after every mutation.
    tree: FavouritesTree,
}

impl Registry {
    /// Bookmark `name` in `path`. Adding an already-present bookmark is a
    /// no-op that does not touch the store file.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be loaded or saved.
    pub fn add(&mut self, path: &Path, name: &str) -> Result<AddOutcome, Error> {
        let mut map = self.store.load()?;
        let names = map.entry(path.to_path_buf()).or_default();
        if names.iter().any(|existing| return existing == name) {
            return Ok(AddOutcome::AlreadyPresent);
        }
        names.push(name.to_string());

        self.store.save(&map)?;
        self.tree = build_tree(&map, &self.notes);
        return Ok(AddOutcome::Added);
    }

    /// Every stored note as (key, text), including notes whose bookmark
    /// has since been removed.
    pub fn all_notes(&self) -> Vec<(String, String)> {
        return self.notes.entries();
    }

    /// Open the registry: load the store and build the initial tree.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be loaded.
    pub fn new(store: FavouritesStore, notes: NoteAdapter) -> Result<Self, Error> {
        let map = store.load()?;
        let tree = build_tree(&map, &notes);
        return Ok(Self { notes, store, tree });
    }

    /// Reload the store from disk and rebuild the tree, picking up writes
    /// made by other processes.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be loaded; the previous tree
    /// is kept in that case.
    pub fn refresh(&mut self) -> Result<&FavouritesTree, Error> {
        let map = self.store.load()?;
        self.tree = build_tree(&map, &self.notes);
        return Ok(&self.tree);
    }

    /// Remove a bookmark, or a whole file group with everything in it.
    /// Removing the last bookmark of a group removes the group. Notes are
    /// left in place so they survive a remove and re-add.
    ///
    /// # Errors
    ///
    /// Returns `Error::BookmarkNotFound` when the target is not stored, or
    /// an error when the store cannot be loaded or saved.
    pub fn remove(&mut self, target: &Target) -> Result<(), Error> {
        let mut map = self.store.load()?;
        match target {
            Target::File(path) => {
                if map.shift_remove(path).is_none() {
                    return Err(Error::BookmarkNotFound { path: path.clone(), symbol: None });
                }
            },
            Target::Symbol { name, path } => {
                remove_symbol_bookmark(&mut map, path, name)?;
            },
        }

        self.store.save(&map)?;
        self.tree = build_tree(&map, &self.notes);
        return Ok(());
    }

    /// Attach a note to a stored bookmark. Blank text means the user
    /// backed out: nothing is written and the outcome says so.
    ///
    /// # Errors
    ///
    /// Returns `Error::BookmarkNotFound` when the bookmark is not stored,
    /// or an error when the note cannot be persisted.
    pub fn set_note(&mut self, path: &Path, name: &str, text: &str) -> Result<NoteOutcome, Error> {
        let bookmark_exists = self
            .tree
            .find_group(path)
            .and_then(|group| return group.find_bookmark(name))
            .is_some();
        if !bookmark_exists {
            return Err(Error::BookmarkNotFound {
                path: path.to_path_buf(),
                symbol: Some(name.to_string()),
            });
        }

        if text.trim().is_empty() {
            return Ok(NoteOutcome::Cancelled);
        }

        self.notes.set_note(path, name, text)?;
        self.refresh()?;
        return Ok(NoteOutcome::Saved);
    }

    /// The current display tree.
    pub fn tree(&self) -> &FavouritesTree {
        return &self.tree;
    }
}

/// Build the display tree from the stored mapping. Entries with no
/// bookmarks are skipped, labels are the file name (full path when the
/// path has none), and notes are looked up per bookmark.
fn build_tree(map: &FavouritesMap, notes: &NoteAdapter) -> FavouritesTree {
    let mut groups = Vec::new();
    for (path, names) in map {
        if names.is_empty() {
            continue;
        }
        let label = path
            .file_name()
            .and_then(|n| return n.to_str())
            .map_or_else(|| return path.display().to_string(), ToString::to_string);
        let bookmarks = names
            .iter()
            .map(|name| {
                return Bookmark {
                    name: name.clone(),
                    note: notes.note_for(path, name),
                    path: path.clone(),
                };
            })
            .collect();
        groups.push(FileGroup { bookmarks, label, path: path.clone() });
    }
    return FavouritesTree { groups };
}

/// Remove one symbol bookmark from the mapping, dropping the whole entry
/// when it was the last one.
///
/// # Errors
///
/// Returns `Error::BookmarkNotFound` when the path or the name is absent.
fn remove_symbol_bookmark(map: &mut FavouritesMap, path: &Path, name: &str) -> Result<(), Error> {
    let Some(names) = map.get_mut(path) else {
        return Err(Error::BookmarkNotFound {
            path: path.to_path_buf(),
            symbol: Some(name.to_string()),
        });
    };
    let Some(index) = names.iter().position(|n| return n == name) else {
        return Err(Error::BookmarkNotFound {
            path: path.to_path_buf(),
            symbol: Some(name.to_string()),
        });
    };
    names.remove(index);
    if names.is_empty() {
        map.shift_remove(path);
    }
    return Ok(());
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{AddOutcome, NoteOutcome, Registry};
    use crate::error::Error;
    use crate::notes::{JsonNoteStore, NoteAdapter};
    use crate::store::FavouritesStore;
    use crate::types::Target;

    fn open_registry(dir: &Path) -> Registry {
        let store = FavouritesStore::new(dir.join("favourites.json"));
        store.initialize().unwrap();
        let notes = JsonNoteStore::open(dir.join("notes.json")).unwrap();
        Registry::new(store, NoteAdapter::new(Box::new(notes))).unwrap()
    }

    #[test]
    fn a_fresh_registry_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = open_registry(dir.path());
        assert!(registry.tree().is_empty());
    }

    #[test]
    fn adding_twice_stores_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let path = PathBuf::from("/src/lib.rs");

        assert_eq!(registry.add(&path, "parse").unwrap(), AddOutcome::Added);
        assert_eq!(registry.add(&path, "parse").unwrap(), AddOutcome::AlreadyPresent);

        let tree = registry.tree();
        assert_eq!(tree.groups.len(), 1);
        let group = tree.groups.first().unwrap();
        assert_eq!(group.bookmarks.len(), 1);
        assert_eq!(group.label, "lib.rs");
    }

    #[test]
    fn removing_a_group_takes_its_bookmarks_with_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let path = PathBuf::from("/src/lib.rs");

        registry.add(&path, "parse").unwrap();
        registry.add(&path, "render").unwrap();
        registry.add(Path::new("/src/main.rs"), "main").unwrap();

        registry.remove(&Target::File(path)).unwrap();

        let tree = registry.tree();
        assert_eq!(tree.groups.len(), 1);
        assert_eq!(tree.groups.first().unwrap().label, "main.rs");
    }

    #[test]
    fn removing_the_last_bookmark_removes_the_group() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let path = PathBuf::from("/src/lib.rs");

        registry.add(&path, "parse").unwrap();
        registry
            .remove(&Target::Symbol { name: "parse".to_string(), path: path.clone() })
            .unwrap();

        assert!(registry.tree().is_empty());
        assert!(registry.tree().find_group(&path).is_none());
    }

    #[test]
    fn removing_an_unknown_bookmark_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        registry.add(Path::new("/src/lib.rs"), "parse").unwrap();

        let err = registry
            .remove(&Target::Symbol {
                name: "absent".to_string(),
                path: PathBuf::from("/src/lib.rs"),
            })
            .unwrap_err();
        assert!(matches!(err, Error::BookmarkNotFound { .. }));

        let err = registry
            .remove(&Target::File(PathBuf::from("/never/seen.rs")))
            .unwrap_err();
        assert!(matches!(err, Error::BookmarkNotFound { .. }));
    }

    #[test]
    fn notes_attach_to_exactly_one_bookmark() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let path = PathBuf::from("/src/lib.rs");

        registry.add(&path, "parse").unwrap();
        registry.add(&path, "render").unwrap();
        registry.set_note(&path, "parse", "entry point").unwrap();

        let tree = registry.tree();
        let group = tree.groups.first().unwrap();
        let parse = group.find_bookmark("parse").unwrap();
        let render = group.find_bookmark("render").unwrap();
        assert_eq!(parse.note.as_deref(), Some("entry point"));
        assert_eq!(render.note, None);
    }

    #[test]
    fn blank_note_text_is_a_cancelled_edit() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let path = PathBuf::from("/src/lib.rs");

        registry.add(&path, "parse").unwrap();
        registry.set_note(&path, "parse", "keep me").unwrap();

        let outcome = registry.set_note(&path, "parse", "   ").unwrap();
        assert_eq!(outcome, NoteOutcome::Cancelled);

        let tree = registry.tree();
        let bookmark = tree.groups.first().unwrap().find_bookmark("parse").unwrap();
        assert_eq!(bookmark.note.as_deref(), Some("keep me"));
    }

    #[test]
    fn noting_an_unknown_bookmark_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());

        let err = registry
            .set_note(Path::new("/src/lib.rs"), "parse", "text")
            .unwrap_err();
        assert!(matches!(err, Error::BookmarkNotFound { .. }));
    }

    #[test]
    fn notes_survive_remove_and_re_add() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let path = PathBuf::from("/src/lib.rs");

        registry.add(&path, "parse").unwrap();
        registry.set_note(&path, "parse", "still here").unwrap();
        registry
            .remove(&Target::Symbol { name: "parse".to_string(), path: path.clone() })
            .unwrap();

        // The note stays in the note store while the bookmark is gone.
        assert_eq!(registry.all_notes().len(), 1);

        registry.add(&path, "parse").unwrap();
        let tree = registry.tree();
        let bookmark = tree.groups.first().unwrap().find_bookmark("parse").unwrap();
        assert_eq!(bookmark.note.as_deref(), Some("still here"));
    }

    #[test]
    fn refresh_picks_up_external_writes() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        assert!(registry.tree().is_empty());

        // Another process rewrites the favourites file.
        std::fs::write(
            dir.path().join("favourites.json"),
            r#"{"/src/lib.rs": ["parse"]}"#,
        )
        .unwrap();

        let tree = registry.refresh().unwrap();
        assert_eq!(tree.groups.len(), 1);
    }

    #[test]
    fn empty_stored_entries_yield_no_groups() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());

        std::fs::write(
            dir.path().join("favourites.json"),
            r#"{"/src/lib.rs": [], "/src/main.rs": ["main"]}"#,
        )
        .unwrap();

        let tree = registry.refresh().unwrap();
        assert_eq!(tree.groups.len(), 1);
        assert_eq!(tree.groups.first().unwrap().label, "main.rs");
    }

    #[test]
    fn full_session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let path = PathBuf::from("/src/app.ts");

        assert!(registry.tree().is_empty());
        registry.add(&path, "activate").unwrap();

        let tree = registry.tree();
        assert_eq!(tree.groups.len(), 1);
        assert_eq!(tree.groups.first().unwrap().bookmarks.len(), 1);

        registry.add(&path, "activate").unwrap();
        assert_eq!(registry.tree().groups.first().unwrap().bookmarks.len(), 1);

        registry
            .remove(&Target::Symbol { name: "activate".to_string(), path })
            .unwrap();
        assert!(registry.tree().is_empty());

        // A reopened registry sees the same empty state.
        let reopened = open_registry(dir.path());
        assert!(reopened.tree().is_empty());
    }
}
