// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// Events are facts, not commands: they are immutable and carry only the
// data needed to react.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::media_file::MediaFileRecord;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// TRANSFER EVENTS
// ============================================================================

/// Emitted after a media file has been moved into its canonical location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFileMoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub media_file: MediaFileRecord,
}

impl MediaFileMoved {
    pub fn new(media_file: MediaFileRecord) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            media_file,
        }
    }
}

impl DomainEvent for MediaFileMoved {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "MediaFileMoved"
    }
}

/// Emitted after a media file has been copied into its canonical location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFileCopied {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub media_file: MediaFileRecord,
}

impl MediaFileCopied {
    pub fn new(media_file: MediaFileRecord) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            media_file,
        }
    }
}

impl DomainEvent for MediaFileCopied {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "MediaFileCopied"
    }
}

/// Emitted after a media file already inside the library has been renamed
/// to its canonical name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFileRenamed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub media_file: MediaFileRecord,
}

impl MediaFileRenamed {
    pub fn new(media_file: MediaFileRecord) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            media_file,
        }
    }
}

impl DomainEvent for MediaFileRenamed {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "MediaFileRenamed"
    }
}

// ============================================================================
// RECONCILIATION EVENTS
// ============================================================================

/// Emitted when a companion-file reconciliation batch completes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionFilesImported {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub series_id: Uuid,
    /// Newly created records in this batch
    pub imported: usize,
    /// Records kept as-is because their path is still on disk
    pub previously_imported: usize,
}

impl CompanionFilesImported {
    pub fn new(series_id: Uuid, imported: usize, previously_imported: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            series_id,
            imported,
            previously_imported,
        }
    }
}

impl DomainEvent for CompanionFilesImported {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "CompanionFilesImported"
    }
}
