//! Storage root module
//!
//! The only persisted state is "a file exists under the root". This module
//! validates the root once at startup and maps route parameters to paths.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Startup failure for the configured storage root
#[derive(Debug)]
pub enum StorageError {
    /// The root could not be inspected (usually it does not exist)
    Inaccessible { path: PathBuf, source: io::Error },
    /// The root exists but is a file or something else
    NotADirectory(PathBuf),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inaccessible { path, source } => {
                write!(f, "storage path '{}': {source}", path.display())
            }
            Self::NotADirectory(path) => {
                write!(f, "storage path '{}' is not a folder", path.display())
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Inaccessible { source, .. } => Some(source),
            Self::NotADirectory(_) => None,
        }
    }
}

/// Validated storage root directory
#[derive(Debug, Clone)]
pub struct StorageRoot {
    root: PathBuf,
}

impl StorageRoot {
    /// Open the root, requiring an existing directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|source| StorageError::Inaccessible {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(StorageError::NotADirectory(path.to_path_buf()));
        }
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    /// Join a route-captured relative name (segments separated by `/`) onto
    /// the root. The router only hands out names without `.`/`..` segments.
    pub fn resolve(&self, name: &str) -> PathBuf {
        name.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}
