// src/config/mod.rs
//
// Library configuration, loaded from a TOML file.
//
// Settings the transfer pipeline reads:
// - copy_using_hardlinks: prefer zero-copy hard links for copy flows
// - import_script_path: optional user script consulted before transfers
// - database_path: overrides the default application-data location

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::db::default_database_path;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub copy_using_hardlinks: bool,

    pub import_script_path: Option<PathBuf>,

    pub database_path: Option<PathBuf>,
}

impl LibraryConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// The database location to use: the configured override, or the
    /// platform default.
    pub fn resolved_database_path(&self) -> AppResult<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }
}
