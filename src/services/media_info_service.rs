// src/services/media_info_service.rs
//
// Refresh a media file record's size and probed attributes from its
// current on-disk location. A missing file is not an error here: records
// may legitimately point at a location mid-transfer.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::media_file::{MediaFileRecord, MediaInfo};
use crate::domain::series::Series;
use crate::error::AppResult;

pub struct MediaInfoService;

impl MediaInfoService {
    pub fn new() -> Self {
        Self
    }

    /// Re-probe size and content hash from the record's current location.
    pub fn refresh(&self, file: &mut MediaFileRecord, series: &Series) -> AppResult<()> {
        let Some(path) = file.current_path(series) else {
            log::debug!("Media file {} has no current location to probe", file.id);
            return Ok(());
        };

        if !path.exists() {
            log::debug!("Media file not found at {}, skipping probe", path.display());
            return Ok(());
        }

        let metadata = std::fs::metadata(&path)?;
        let sha256 = hash_file(&path)?;

        file.size = metadata.len();
        file.media_info = Some(MediaInfo {
            sha256,
            size: metadata.len(),
            refreshed_at: Utc::now(),
        });

        Ok(())
    }
}

impl Default for MediaInfoService {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_file(path: &Path) -> AppResult<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    #[test]
    fn test_refresh_populates_media_info() {
        let dir = tempfile::tempdir().unwrap();
        let series = Series::new("Show".to_string(), dir.path().to_path_buf());
        let path = dir.path().join("ep.mkv");
        std::fs::write(&path, b"twelve bytes").unwrap();

        let mut file = MediaFileRecord::new(series.id, path, 0);
        MediaInfoService::new().refresh(&mut file, &series).unwrap();

        assert_eq!(file.size, 12);
        let info = file.media_info.unwrap();
        assert_eq!(info.size, 12);
        assert_eq!(info.sha256.len(), 64);
    }

    #[test]
    fn test_refresh_same_content_same_hash() {
        let dir = tempfile::tempdir().unwrap();
        let series = Series::new("Show".to_string(), dir.path().to_path_buf());
        let a = dir.path().join("a.mkv");
        let b = dir.path().join("b.mkv");
        std::fs::write(&a, b"same").unwrap();
        std::fs::write(&b, b"same").unwrap();

        let service = MediaInfoService::new();
        let mut file_a = MediaFileRecord::new(series.id, a, 0);
        let mut file_b = MediaFileRecord::new(series.id, b, 0);
        service.refresh(&mut file_a, &series).unwrap();
        service.refresh(&mut file_b, &series).unwrap();

        assert_eq!(
            file_a.media_info.unwrap().sha256,
            file_b.media_info.unwrap().sha256
        );
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let series = Series::new("Show".to_string(), dir.path().to_path_buf());
        let mut file =
            MediaFileRecord::new(series.id, dir.path().join("gone.mkv"), 99);

        MediaInfoService::new().refresh(&mut file, &series).unwrap();

        assert_eq!(file.size, 99);
        assert!(file.media_info.is_none());
    }
}
