//! Locating and loading configuration from the filesystem.

use crate::config::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Directories the editor reads from, resolved once.
///
/// Only `main` builds this from the system with `dirs`; everything else gets
/// it passed in, so tests can point every path into a temp directory.
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    /// e.g. `~/.config/trust` on Linux
    pub config_dir: PathBuf,

    /// Home directory: default snapshot location and target of `cd`
    pub home_dir: Option<PathBuf>,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories
    pub fn from_system() -> std::io::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join("trust");

        Ok(Self {
            config_dir,
            home_dir: dirs::home_dir(),
        })
    }

    /// Create a DirectoryContext for testing with a temp directory
    pub fn for_testing(temp_dir: &Path) -> Self {
        Self {
            config_dir: temp_dir.join("config"),
            home_dir: Some(temp_dir.join("home")),
        }
    }

    /// `<config_dir>/config.json`
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// Where recovery snapshots go: the configured directory, else home.
    pub fn recovery_dir(&self, config: &Config) -> Option<PathBuf> {
        config
            .recovery
            .directory
            .clone()
            .or_else(|| self.home_dir.clone())
    }
}

impl Config {
    /// Load an explicitly requested config file. Any failure is returned.
    pub fn load_explicit(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the user's config file, falling back to defaults when it is
    /// missing or broken.
    pub fn load_user(dir_context: &DirectoryContext) -> Self {
        let path = dir_context.config_path();
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}
