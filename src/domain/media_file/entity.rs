use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::series::Series;

/// Persisted record binding one physical container file to one or more
/// catalog episodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFileRecord {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Owning series
    pub series_id: Uuid,

    /// Stored path, relative to the series root. `None` only while a
    /// transfer is rebinding the record to a new location.
    pub relative_path: Option<String>,

    /// Absolute location of the file while it is being imported from
    /// outside the library. Transient: never persisted.
    #[serde(skip)]
    pub path: Option<PathBuf>,

    /// File size in bytes
    pub size: u64,

    /// Probed media attributes, refreshed after relocations
    pub media_info: Option<MediaInfo>,

    /// Episodes covered by this container file
    pub episode_ids: Vec<Uuid>,

    /// Creation timestamp in our database
    pub added: DateTime<Utc>,
}

/// Attributes probed from the physical file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    /// SHA256 of the file contents
    pub sha256: String,

    /// Size observed at probe time
    pub size: u64,

    pub refreshed_at: DateTime<Utc>,
}

/// How a file physically reaches its destination.
///
/// The fallback from link to full copy inside `HardLinkOrCopy` is handled
/// by the transfer primitive and is invisible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// Relocate; the source is deleted after transfer
    Move,

    /// Duplicate content; the source is left untouched
    Copy,

    /// Attempt a zero-copy hard link, fall back to a full copy when
    /// linking is not possible (e.g. cross-device)
    HardLinkOrCopy,
}

impl MediaFileRecord {
    pub fn new(series_id: Uuid, path: PathBuf, size: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            series_id,
            relative_path: None,
            path: Some(path),
            size,
            media_info: None,
            episode_ids: Vec::new(),
            added: Utc::now(),
        }
    }

    /// Resolve the file's current absolute location: the transient import
    /// path when set, otherwise the stored path under the series root.
    pub fn current_path(&self, series: &Series) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }
        self.relative_path
            .as_deref()
            .map(|rel| series.absolute_path_of(rel))
    }

    /// Extension of the current location, with a leading dot.
    pub fn extension(&self, series: &Series) -> Option<String> {
        self.current_path(series)
            .as_deref()
            .and_then(|p| p.extension().map(|e| format!(".{}", e.to_string_lossy())))
    }
}

impl std::fmt::Display for TransferMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferMode::Move => write!(f, "move"),
            TransferMode::Copy => write!(f, "copy"),
            TransferMode::HardLinkOrCopy => write!(f, "hardlink_or_copy"),
        }
    }
}
