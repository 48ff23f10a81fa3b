use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A catalog entity: one show owning a root directory and the media and
/// companion records found beneath it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Display title
    pub title: String,

    /// Absolute root directory of this series in the library
    pub path: PathBuf,

    /// Creation timestamp in our database
    pub added: DateTime<Utc>,
}

impl Series {
    pub fn new(title: String, path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            path,
            added: Utc::now(),
        }
    }

    /// Express `absolute` relative to this series' root.
    ///
    /// Returns `None` when the path does not live under the root. Stored
    /// record paths are always produced through here so that relocating the
    /// library root never requires record rewrites.
    pub fn relative_path_of(&self, absolute: &Path) -> Option<String> {
        absolute
            .strip_prefix(&self.path)
            .ok()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
    }

    /// Resolve a stored relative path back to an absolute one.
    pub fn absolute_path_of(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }
}
