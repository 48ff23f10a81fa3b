use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recognized companion-file (subtitle) extensions, with leading dots.
/// Membership here gates which disk files are even considered candidates.
pub const SUBTITLE_EXTENSIONS: &[&str] = &[".srt", ".sub", ".ssa", ".ass", ".vtt", ".idx", ".smi"];

/// Persisted record describing one companion file (subtitle) tied to
/// exactly one media file.
///
/// Upserts are keyed by (series_id, relative_path): re-importing the same
/// path silently replaces the previous record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionFileRecord {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Owning series
    pub series_id: Uuid,

    /// The single media file this companion belongs to
    pub media_file_id: Uuid,

    pub season_number: u32,

    /// Stored path, relative to the series root
    pub relative_path: String,

    /// Primary language, ISO 639-1 code preferred
    pub language: String,

    /// Secondary tags parsed from the filename (forced, sdh, ...)
    pub language_tags: Vec<String>,

    /// Free-text title embedded in the filename, marker already stripped
    pub title: Option<String>,

    /// File extension with leading dot
    pub extension: String,

    /// True when the embedded title requested duplication rather than
    /// overwrite. Semantics are owned by the caller.
    pub copy: bool,

    /// Creation timestamp in our database
    pub added: DateTime<Utc>,
}

impl CompanionFileRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        series_id: Uuid,
        media_file_id: Uuid,
        season_number: u32,
        relative_path: String,
        language: String,
        language_tags: Vec<String>,
        title: Option<String>,
        extension: String,
        copy: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            series_id,
            media_file_id,
            season_number,
            relative_path,
            language,
            language_tags,
            title,
            extension,
            copy,
            added: Utc::now(),
        }
    }

    /// Membership test against the recognized companion extensions.
    pub fn is_recognized_extension(extension: &str) -> bool {
        let lower = extension.to_lowercase();
        SUBTITLE_EXTENSIONS.contains(&lower.as_str())
    }
}
