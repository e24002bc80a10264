//! Service container for dependency injection
//!
//! Wires settings, filesystem and the flat store together.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::TreeService;
use crate::config::Settings;
use crate::infrastructure::store::{FlatStore, TomlFileStore};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding the shared dependencies of the tree service.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Flat store the tree is read from and written to
    pub store: Arc<dyn FlatStore>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// `store_override` replaces `settings.store_path` (the `--store` flag).
    pub fn new(settings: Settings, store_override: Option<PathBuf>) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let path = store_override.unwrap_or_else(|| settings.store_path.clone());
        debug!("store path: {}", path.display());
        let store = Arc::new(TomlFileStore::new(path, Arc::clone(&fs)));
        Self::with_deps(settings, fs, store)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn FlatStore>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs, store }
    }

    /// Creates the directory the store lives in.
    pub fn prepare_store_dir(&self) -> InfraResult<()> {
        let location = self.store.location();
        if self.fs.exists(&location) && !self.fs.is_file(&location) {
            return Err(InfraError::StorePath(location));
        }
        self.fs
            .ensure_parent(&location)
            .map_err(|e| InfraError::io(format!("create directory for {}", location.display()), e))
    }

    /// Opens the tree held by the configured store.
    pub fn tree_service(&self) -> InfraResult<TreeService> {
        Ok(TreeService::open(Arc::clone(&self.store))?)
    }
}
