// src/services/library_scanner.rs
//
// Candidate discovery: enumerate companion-extension files currently on
// disk under a series root. Feeds the reconciliation filter.

use std::path::PathBuf;

use crate::domain::companion::CompanionFileRecord;
use crate::domain::series::Series;
use crate::error::{AppError, AppResult};

pub struct LibraryScanner;

impl LibraryScanner {
    pub fn new() -> Self {
        Self
    }

    /// All files under the series root whose extension is in the
    /// recognized companion set. Unreadable entries are skipped.
    pub fn scan_companion_files(&self, series: &Series) -> AppResult<Vec<PathBuf>> {
        if !series.path.exists() {
            return Err(AppError::Other(format!(
                "Series root does not exist: {}",
                series.path.display()
            )));
        }
        if !series.path.is_dir() {
            return Err(AppError::Other(format!(
                "Series root is not a directory: {}",
                series.path.display()
            )));
        }

        let mut candidates = Vec::new();

        for entry in walkdir::WalkDir::new(&series.path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let extension = match path.extension().and_then(|e| e.to_str()) {
                Some(ext) => format!(".{}", ext),
                None => continue,
            };
            if CompanionFileRecord::is_recognized_extension(&extension) {
                candidates.push(path.to_path_buf());
            }
        }

        candidates.sort();
        Ok(candidates)
    }
}

impl Default for LibraryScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_finds_only_companion_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let season = dir.path().join("Season 01");
        std::fs::create_dir_all(&season).unwrap();
        std::fs::write(season.join("Show - S01E01.mkv"), b"video").unwrap();
        std::fs::write(season.join("Show - S01E01.en.srt"), b"subs").unwrap();
        std::fs::write(season.join("Show - S01E01.ass"), b"subs").unwrap();
        std::fs::write(season.join("notes.txt"), b"text").unwrap();

        let series = Series::new("Show".to_string(), dir.path().to_path_buf());
        let found = LibraryScanner::new().scan_companion_files(&series).unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| {
            let name = p.file_name().unwrap().to_str().unwrap();
            name.ends_with(".srt") || name.ends_with(".ass")
        }));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let series = Series::new("Show".to_string(), dir.path().join("nope"));
        assert!(LibraryScanner::new().scan_companion_files(&series).is_err());
    }
}
