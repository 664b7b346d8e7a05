// Application state module
// Immutable state shared by every connection after startup

use super::types::Config;
use crate::routing::RouteTable;
use crate::storage::{StorageError, StorageRoot};

/// Application state
pub struct AppState {
    pub config: Config,
    pub storage: StorageRoot,
    pub routes: RouteTable,
}

impl AppState {
    /// Build the shared state, checking the storage root once.
    ///
    /// Fails when the configured root is missing or not a directory, which
    /// must abort startup before any listener is bound.
    pub fn new(config: Config) -> Result<Self, StorageError> {
        let storage = StorageRoot::open(&config.storage.path)?;
        Ok(Self {
            config,
            storage,
            routes: RouteTable::file_routes(),
        })
    }

    #[inline]
    pub const fn debug_enabled(&self) -> bool {
        self.config.logging.debug
    }

    #[inline]
    pub const fn max_form_size(&self) -> u64 {
        self.config.storage.max_form_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn config_with_path(path: &std::path::Path) -> Config {
        let cli = Cli {
            path: Some(path.to_string_lossy().into_owned()),
            ..Cli::default()
        };
        Config::load(&cli).unwrap()
    }

    #[test]
    fn test_state_over_existing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config_with_path(dir.path())).unwrap();
        assert_eq!(state.max_form_size(), 64 * 1024);
        assert!(!state.debug_enabled());
        assert_eq!(state.routes.routes().len(), 3);
    }

    #[test]
    fn test_state_rejects_bad_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();

        assert!(matches!(
            AppState::new(config_with_path(&dir.path().join("missing"))),
            Err(StorageError::Inaccessible { .. })
        ));
        assert!(matches!(
            AppState::new(config_with_path(&file)),
            Err(StorageError::NotADirectory(_))
        ));
    }
}
