// src/services/naming_service.rs
//
// Naming rules: compute the canonical destination path for a media file.
// Deterministic given the same inputs; used both for a first move into the
// library and for a later rename.

use std::path::PathBuf;

use crate::domain::episode::Episode;
use crate::domain::media_file::MediaFileRecord;
use crate::domain::series::Series;
use crate::error::{AppError, AppResult};

pub trait NameBuilder: Send + Sync {
    fn build_file_path(
        &self,
        episodes: &[Episode],
        series: &Series,
        file: &MediaFileRecord,
        extension: &str,
    ) -> AppResult<PathBuf>;
}

/// `{series root}/Season NN/{series title} - SxxEyy[-Ezz]{extension}`
pub struct StandardNameBuilder;

impl StandardNameBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StandardNameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NameBuilder for StandardNameBuilder {
    fn build_file_path(
        &self,
        episodes: &[Episode],
        series: &Series,
        _file: &MediaFileRecord,
        extension: &str,
    ) -> AppResult<PathBuf> {
        let mut numbers: Vec<u32> = episodes.iter().map(|e| e.episode_number).collect();
        numbers.sort_unstable();
        numbers.dedup();

        let first = *numbers
            .first()
            .ok_or_else(|| AppError::Other("Cannot build a path without episodes".to_string()))?;
        let season = episodes[0].season_number;

        let mut name = format!("{} - S{:02}E{:02}", sanitize(&series.title), season, first);
        for number in &numbers[1..] {
            name.push_str(&format!("-E{:02}", number));
        }
        name.push_str(extension);

        Ok(series
            .path
            .join(format!("Season {:02}", season))
            .join(name))
    }
}

/// Strip characters that are hostile to at least one supported filesystem.
fn sanitize(title: &str) -> String {
    title
        .chars()
        .filter(|c| !matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect::<String>()
        .trim()
        .to_string()
}
