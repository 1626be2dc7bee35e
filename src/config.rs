use std::path::{Path, PathBuf};

use crate::error::Error;

/// Directory name used when the config does not override it.
const DEFAULT_STORAGE_DIR: &str = ".symfav";

/// Project configuration loaded from `.symfav.toml`.
#[derive(Debug)]
pub struct Config {
    storage_dir: Option<String>,
}

/// Raw TOML structure for `.symfav.toml`.
#[derive(serde::Deserialize)]
struct SymfavTomlConfig {
    #[serde(default)]
    storage_dir: Option<String>,
}

impl Config {
    /// Load config from `.symfav.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed, never a silent fallback to defaults
    /// when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".symfav.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: SymfavTomlConfig = toml::from_str(&content)?;
        return Ok(Self {
            storage_dir: raw.storage_dir,
        });
    }

    /// Default config: storage lives in `.symfav` under the root.
    fn defaults() -> Self {
        return Self { storage_dir: None };
    }

    /// The directory holding the favourites and notes files.
    pub fn storage_dir(&self, root: &Path) -> PathBuf {
        return match &self.storage_dir {
            None => root.join(DEFAULT_STORAGE_DIR),
            Some(dir) => root.join(dir),
        };
    }
}
