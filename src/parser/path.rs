// src/parser/path.rs
//
// Filename identity parsing.
//
// Deterministic, ordered patterns: the first layout that matches wins.
// Unrecognized layouts are a Parsing error the caller recovers from.

use regex::Regex;
use std::path::Path;

use crate::domain::MediaItemIdentity;
use crate::error::{AppError, AppResult};

/// Deterministic rules for extracting season/episode identity from a
/// filename. All patterns are explicit and ordered.
pub struct PathIdentityParser {
    /// Layout patterns; capture 1 = leading title text, 2 = season,
    /// 3 = first episode, 4 = trailing extra-episode run (may be empty)
    layout_patterns: Vec<Regex>,

    /// Extracts the numbers of an extra-episode run ("E03E04", "-E04")
    extra_episode_pattern: Regex,
}

impl Default for PathIdentityParser {
    fn default() -> Self {
        Self {
            layout_patterns: vec![
                // Show Title S01E02, S01E02E03, S01E02-E03
                Regex::new(r"(?i)^(.*?)S(\d{1,2})[ ._-]*E(\d{1,4})((?:[ ._-]*E\d{1,4})*)")
                    .unwrap(),
                // Show Title 1x02, 1x02x03
                Regex::new(r"(?i)^(.*?)\b(\d{1,2})x(\d{1,4})((?:x\d{1,4})*)").unwrap(),
            ],
            extra_episode_pattern: Regex::new(r"(\d{1,4})").unwrap(),
        }
    }
}

impl PathIdentityParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse season/episode identity from a path's filename.
    pub fn parse_path(&self, path: &Path) -> AppResult<MediaItemIdentity> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| AppError::Parsing(path.display().to_string()))?;

        for pattern in &self.layout_patterns {
            if let Some(captures) = pattern.captures(stem) {
                let season_number: u32 = captures
                    .get(2)
                    .and_then(|m| m.as_str().parse().ok())
                    .ok_or_else(|| AppError::Parsing(stem.to_string()))?;

                let first: u32 = captures
                    .get(3)
                    .and_then(|m| m.as_str().parse().ok())
                    .ok_or_else(|| AppError::Parsing(stem.to_string()))?;

                let mut episode_numbers = vec![first];
                if let Some(extra) = captures.get(4) {
                    for m in self.extra_episode_pattern.captures_iter(extra.as_str()) {
                        if let Ok(n) = m[1].parse::<u32>() {
                            if !episode_numbers.contains(&n) {
                                episode_numbers.push(n);
                            }
                        }
                    }
                }

                let release_title = clean_title(captures.get(1).map_or("", |m| m.as_str()));

                return Ok(MediaItemIdentity {
                    season_number,
                    episode_numbers,
                    release_title,
                });
            }
        }

        Err(AppError::Parsing(stem.to_string()))
    }
}

/// Collapse separator characters and trim release punctuation.
fn clean_title(raw: &str) -> String {
    raw.replace(['.', '_'], " ")
        .trim()
        .trim_end_matches('-')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(name: &str) -> AppResult<MediaItemIdentity> {
        PathIdentityParser::new().parse_path(&PathBuf::from(name))
    }

    #[test]
    fn test_standard_layout() {
        let identity = parse("Show.S01E02.1080p.mkv").unwrap();
        assert_eq!(identity.season_number, 1);
        assert_eq!(identity.episode_numbers, vec![2]);
        assert_eq!(identity.release_title, "Show");
    }

    #[test]
    fn test_multi_episode_layout() {
        let identity = parse("Show.S02E03E04.mkv").unwrap();
        assert_eq!(identity.season_number, 2);
        assert_eq!(identity.episode_numbers, vec![3, 4]);
    }

    #[test]
    fn test_dashed_multi_episode_layout() {
        let identity = parse("Show - S01E01-E02.mkv").unwrap();
        assert_eq!(identity.episode_numbers, vec![1, 2]);
    }

    #[test]
    fn test_x_layout() {
        let identity = parse("Show 1x02.mkv").unwrap();
        assert_eq!(identity.season_number, 1);
        assert_eq!(identity.episode_numbers, vec![2]);
    }

    #[test]
    fn test_lowercase_layout() {
        let identity = parse("show.s03e09.srt").unwrap();
        assert_eq!(identity.season_number, 3);
        assert_eq!(identity.episode_numbers, vec![9]);
    }

    #[test]
    fn test_unrecognized_layout_fails() {
        assert!(parse("just-a-random-file.srt").is_err());
        assert!(parse("notes.txt").is_err());
    }

    #[test]
    fn test_title_cleaning() {
        let identity = parse("My_Show.Name.S01E01.mkv").unwrap();
        assert_eq!(identity.release_title, "My Show Name");
    }
}
