//! Favourites persistence: the on-disk path → symbol-names mapping.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::Error;

/// The persisted shape: file path → ordered symbol names. Insertion order
/// is display order and survives a load/save round trip.
pub type FavouritesMap = IndexMap<PathBuf, Vec<String>>;

/// Content written on first use so the file always parses as an object.
const EMPTY_STORE: &str = "{ }";

/// Reader/writer for the favourites file. Pure persistence: dedup and
/// group-emptiness invariants are the registry's job.
pub struct FavouritesStore {
    /// The favourites file location.
    path: PathBuf,
}

impl FavouritesStore {
    /// First-run bootstrapping: create the storage directory recursively and
    /// the favourites file (as an empty object) if either is absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the directory or file cannot be created.
    pub fn initialize(&self) -> Result<(), Error> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        if !self.path.exists() {
            std::fs::write(&self.path, EMPTY_STORE)?;
        }
        return Ok(());
    }

    /// Read and parse the favourites file. A missing, empty, or
    /// whitespace-only file means no bookmarks.
    ///
    /// # Errors
    ///
    /// Returns `Error::CorruptStore` if the file has content that is not a
    /// JSON object of string arrays, or `Error::Io` for read failures.
    pub fn load(&self) -> Result<FavouritesMap, Error> {
        let content = match std::fs::read_to_string(&self.path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(FavouritesMap::new());
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return parse_favourites(&content, &self.path);
    }

    /// Create a store for the given favourites file path.
    pub fn new(path: PathBuf) -> Self {
        return Self { path };
    }

    /// The favourites file location.
    pub fn path(&self) -> &Path {
        return &self.path;
    }

    /// Serialize the full mapping and overwrite the file. Last writer wins;
    /// there is no merge and no partial write.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if serialization fails,
    /// or `Error::Io` if the file cannot be written.
    pub fn save(&self, map: &FavouritesMap) -> Result<(), Error> {
        let content = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, content)?;
        return Ok(());
    }
}

/// Normalize a user-supplied path to the absolute, lexically collapsed form
/// used as a mapping key. Does not touch the filesystem beyond reading the
/// working directory, so keys stay stable for files that no longer exist.
///
/// # Errors
///
/// Returns `Error::Io` if the path cannot be made absolute (empty path, or
/// no working directory).
pub fn key_path(path: &Path) -> Result<PathBuf, Error> {
    let absolute = std::path::absolute(path)?;
    return Ok(normalize_lexically(&absolute));
}

/// Collapse `.` and `..` components without resolving symlinks.
/// Preserves leading `..` when there is nothing left to pop.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut components: Vec<std::path::Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Parse favourites file content. Empty or whitespace-only content is the
/// empty mapping, so a hand-truncated file is not treated as corrupt.
///
/// # Errors
///
/// Returns `Error::CorruptStore` when non-blank content does not parse.
fn parse_favourites(content: &str, path: &Path) -> Result<FavouritesMap, Error> {
    if content.trim().is_empty() {
        return Ok(FavouritesMap::new());
    }
    return serde_json::from_str(content).map_err(|e| {
        return Error::CorruptStore {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
    });
}

/// Handle a single path component during normalization. Pops the last
/// component for `..` when it is a named one, discards `..` at the root
/// (`/..` is `/`), and preserves leading `..` on relative paths.
fn push_normalized_component<'a>(
    components: &mut Vec<std::path::Component<'a>>,
    component: std::path::Component<'a>,
) {
    match component {
        std::path::Component::CurDir => {},
        std::path::Component::ParentDir => match components.last() {
            Some(std::path::Component::Normal(_)) => {
                components.pop();
            },
            Some(std::path::Component::Prefix(_) | std::path::Component::RootDir) => {},
            _ => components.push(component),
        },
        other => components.push(other),
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{FavouritesMap, FavouritesStore, normalize_lexically, parse_favourites};

    #[test]
    fn blank_content_means_no_bookmarks() {
        let path = Path::new("favourites.json");
        assert!(parse_favourites("", path).unwrap().is_empty());
        assert!(parse_favourites("  \n", path).unwrap().is_empty());
        assert!(parse_favourites("{ }", path).unwrap().is_empty());
    }

    #[test]
    fn non_blank_garbage_is_corrupt_not_empty() {
        let err = parse_favourites("not json", Path::new("favourites.json")).unwrap_err();
        assert!(matches!(err, crate::error::Error::CorruptStore { .. }));
    }

    #[test]
    fn wrong_shape_is_corrupt() {
        let err =
            parse_favourites(r#"{"/x.ts": "fn"}"#, Path::new("favourites.json")).unwrap_err();
        assert!(matches!(err, crate::error::Error::CorruptStore { .. }));
    }

    #[test]
    fn round_trip_preserves_mapping_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavouritesStore::new(dir.path().join("favourites.json"));

        let mut map = FavouritesMap::new();
        map.insert(PathBuf::from("/b.ts"), vec!["beta".to_string(), "alpha".to_string()]);
        map.insert(PathBuf::from("/a.rs"), vec!["gamma".to_string()]);

        store.save(&map).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, map);
        let keys: Vec<&PathBuf> = loaded.keys().collect();
        assert_eq!(keys, vec![&PathBuf::from("/b.ts"), &PathBuf::from("/a.rs")]);
    }

    #[test]
    fn initialize_writes_empty_object_once() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("deep").join("favourites.json");
        let store = FavouritesStore::new(file.clone());

        store.initialize().unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "{ }");
        assert!(store.load().unwrap().is_empty());

        // A second initialize must not clobber existing content.
        let mut map = FavouritesMap::new();
        map.insert(PathBuf::from("/x.ts"), vec!["fn".to_string()]);
        store.save(&map).unwrap();
        store.initialize().unwrap();
        assert_eq!(store.load().unwrap(), map);
    }

    #[test]
    fn normalization_collapses_dot_segments() {
        assert_eq!(
            normalize_lexically(Path::new("/repo/./src/../src/lib.rs")),
            PathBuf::from("/repo/src/lib.rs")
        );
        assert_eq!(
            normalize_lexically(Path::new("/repo/../../x.rs")),
            PathBuf::from("/x.rs")
        );
    }
}
