//! Note persistence and the path+symbol keying scheme for annotations.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::Error;

/// Keyed note storage. The registry reads and writes notes through this
/// seam, so annotations can live in any keyed backing store.
pub trait NoteStore {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Every key currently present, in insertion order.
    fn keys(&self) -> Vec<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot persist the change.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;
}

/// Note storage backed by a JSON object file beside the favourites file.
/// Every `set` rewrites the whole file; last writer wins.
#[derive(Debug)]
pub struct JsonNoteStore {
    /// Key → note text, in insertion order.
    entries: IndexMap<String, String>,
    /// The notes file location.
    path: PathBuf,
}

impl JsonNoteStore {
    /// Open the notes file. A missing, empty, or whitespace-only file means
    /// no notes; the file itself is only created on the first write.
    ///
    /// # Errors
    ///
    /// Returns `Error::CorruptStore` if the file has content that is not a
    /// JSON object of strings, or `Error::Io` for read failures.
    pub fn open(path: PathBuf) -> Result<Self, Error> {
        let entries = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IndexMap::new(),
            Err(e) => return Err(Error::Io(e)),
            Ok(content) if content.trim().is_empty() => IndexMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                return Error::CorruptStore {
                    path: path.clone(),
                    reason: e.to_string(),
                };
            })?,
        };
        return Ok(Self { entries, path });
    }
}

impl NoteStore for JsonNoteStore {
    /// Look up a note in the in-memory copy.
    fn get(&self, key: &str) -> Option<String> {
        return self.entries.get(key).cloned();
    }

    /// List keys from the in-memory copy, in insertion order.
    fn keys(&self) -> Vec<String> {
        return self.entries.keys().cloned().collect();
    }

    /// Insert the entry and rewrite the notes file.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.entries.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;
        return Ok(());
    }
}

/// Bridges bookmarks to the note store: owns the composite-key convention
/// so callers only ever speak in (path, symbol) pairs.
pub struct NoteAdapter {
    /// The backing store notes are read from and written to.
    store: Box<dyn NoteStore>,
}

impl NoteAdapter {
    /// Every stored (key, note) pair, including notes whose bookmark has
    /// since been removed.
    pub fn entries(&self) -> Vec<(String, String)> {
        return self
            .store
            .keys()
            .into_iter()
            .filter_map(|key| {
                let value = self.store.get(&key)?;
                return Some((key, value));
            })
            .collect();
    }

    /// Wrap a backing store.
    pub fn new(store: Box<dyn NoteStore>) -> Self {
        return Self { store };
    }

    /// The note attached to `symbol` in `path`, if any.
    pub fn note_for(&self, path: &Path, symbol: &str) -> Option<String> {
        return self.store.get(&compose_note_key(path, symbol));
    }

    /// Attach `text` to `symbol` in `path`, replacing any existing note.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot persist the change.
    pub fn set_note(&mut self, path: &Path, symbol: &str, text: &str) -> Result<(), Error> {
        return self.store.set(&compose_note_key(path, symbol), text);
    }
}

/// Build the storage key for a note on `symbol` in `path`. Both components
/// are escaped before joining, so distinct (path, symbol) pairs can never
/// produce the same key even when either side contains `:`.
pub fn compose_note_key(path: &Path, symbol: &str) -> String {
    return format!(
        "{}:{}",
        escape_component(&path.display().to_string()),
        escape_component(symbol)
    );
}

/// Escape `\` and `:` in a key component so the joining `:` stays
/// unambiguous.
fn escape_component(component: &str) -> String {
    let mut escaped = String::with_capacity(component.len());
    for c in component.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ':' => escaped.push_str("\\:"),
            other => escaped.push(other),
        }
    }
    return escaped;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{JsonNoteStore, NoteAdapter, NoteStore, compose_note_key};

    #[test]
    fn plain_components_join_with_colon() {
        assert_eq!(
            compose_note_key(Path::new("/src/lib.rs"), "parse"),
            "/src/lib.rs:parse"
        );
    }

    #[test]
    fn keys_are_injective_across_colon_placement() {
        let shifted_left = compose_note_key(Path::new("a:b"), "c");
        let shifted_right = compose_note_key(Path::new("a"), "b:c");
        assert_ne!(shifted_left, shifted_right);
    }

    #[test]
    fn backslashes_are_escaped_before_colons() {
        // A literal `\:` in the symbol must not read back as an escaped colon.
        assert_eq!(compose_note_key(Path::new("p"), "a\\:b"), "p:a\\\\\\:b");
    }

    #[test]
    fn missing_and_blank_files_are_empty_stores() {
        let dir = tempfile::tempdir().unwrap();
        let missing = JsonNoteStore::open(dir.path().join("notes.json")).unwrap();
        assert!(missing.keys().is_empty());

        let blank_path = dir.path().join("blank.json");
        std::fs::write(&blank_path, "  \n").unwrap();
        let blank = JsonNoteStore::open(blank_path).unwrap();
        assert!(blank.keys().is_empty());
    }

    #[test]
    fn invalid_content_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = JsonNoteStore::open(path).unwrap_err();
        assert!(matches!(err, crate::error::Error::CorruptStore { .. }));
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let mut store = JsonNoteStore::open(path.clone()).unwrap();
        store.set("/a.rs:main", "entry point").unwrap();

        let reopened = JsonNoteStore::open(path).unwrap();
        assert_eq!(reopened.get("/a.rs:main"), Some("entry point".to_string()));
    }

    #[test]
    fn adapter_round_trips_through_composite_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonNoteStore::open(dir.path().join("notes.json")).unwrap();
        let mut adapter = NoteAdapter::new(Box::new(store));

        let path = PathBuf::from("/src/lib.rs");
        assert_eq!(adapter.note_for(&path, "parse"), None);
        adapter.set_note(&path, "parse", "hot path").unwrap();
        assert_eq!(adapter.note_for(&path, "parse"), Some("hot path".to_string()));
        assert_eq!(adapter.note_for(&path, "other"), None);
    }

    #[test]
    fn entries_include_notes_without_a_bookmark() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonNoteStore::open(dir.path().join("notes.json")).unwrap();
        store.set("/gone.rs:removed", "kept around").unwrap();

        let adapter = NoteAdapter::new(Box::new(store));
        let entries = adapter.entries();
        assert_eq!(
            entries,
            vec![("/gone.rs:removed".to_string(), "kept around".to_string())]
        );
    }
}
