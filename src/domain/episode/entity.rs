use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One catalog episode of a series.
///
/// An episode may exist without a backing media file; `media_file_id` is set
/// once a container file covering this episode has been imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Owning series (immutable, an episode never changes parent)
    pub series_id: Uuid,

    pub season_number: u32,

    pub episode_number: u32,

    /// Backing media file, when one has been imported
    pub media_file_id: Option<Uuid>,

    /// Creation timestamp in our database
    pub added: DateTime<Utc>,
}

impl Episode {
    pub fn new(series_id: Uuid, season_number: u32, episode_number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            series_id,
            season_number,
            episode_number,
            media_file_id: None,
            added: Utc::now(),
        }
    }

    pub fn with_media_file(mut self, media_file_id: Uuid) -> Self {
        self.media_file_id = Some(media_file_id);
        self
    }
}
