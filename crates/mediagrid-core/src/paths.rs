//! Path provider abstraction.
//!
//! Resolves where the media index, settings and logs live so that the core
//! never hard-codes a platform data directory.

use std::path::PathBuf;
use std::sync::Arc;

/// Trait for providing application data paths.
pub trait PathProvider: Send + Sync {
    /// Get the root application data directory.
    fn app_data_dir(&self) -> PathBuf;

    fn database_dir(&self) -> PathBuf {
        self.app_data_dir().join("Database")
    }

    /// Get the media index database file path.
    fn database_path(&self) -> PathBuf {
        self.database_dir().join("media_index.db")
    }

    fn settings_path(&self) -> PathBuf {
        self.app_data_dir().join("Config").join("settings.json")
    }

    fn logs_dir(&self) -> PathBuf {
        self.app_data_dir().join("Logs")
    }
}

/// Shared reference to a PathProvider implementation.
pub type SharedPathProvider = Arc<dyn PathProvider>;

/// Default provider rooted at `<data dir>/MediaGrid`.
#[derive(Debug, Clone)]
pub struct AppPathProvider {
    app_data_dir: PathBuf,
}

impl AppPathProvider {
    /// Uses the platform data directory, falling back to the working directory.
    pub fn new() -> Self {
        let app_data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("MediaGrid");
        Self { app_data_dir }
    }

    /// Root everything under `base_dir`.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            app_data_dir: base_dir,
        }
    }
}

impl Default for AppPathProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PathProvider for AppPathProvider {
    fn app_data_dir(&self) -> PathBuf {
        self.app_data_dir.clone()
    }
}
