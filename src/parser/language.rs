// src/parser/language.rs
//
// Companion-file metadata parsing: language codes, secondary tags and the
// optional free-text title embedded between the media file's stem and the
// trailing language tokens.
//
// Title-aware parsing needs the backing media file's stem; when that match
// fails the caller degrades to language-only parsing. Degradation is not an
// error: it always produces a usable (possibly sparse) result.

use std::path::Path;

use crate::error::{AppError, AppResult};

/// Leading character in a parsed title that flags "this is a duplicate to
/// keep, not an overwrite". Stripped before the title is persisted.
pub const COPY_MARKER: char = '!';

/// Primary language used when no code token is present.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// (canonical ISO 639-1 code, accepted filename aliases)
const LANGUAGE_CODES: &[(&str, &[&str])] = &[
    ("en", &["en", "eng", "english"]),
    ("ja", &["ja", "jp", "jpn", "japanese"]),
    ("pt", &["pt", "por", "portuguese", "pt-br", "ptbr"]),
    ("es", &["es", "spa", "spanish"]),
    ("fr", &["fr", "fre", "fra", "french"]),
    ("de", &["de", "ger", "deu", "german"]),
    ("it", &["it", "ita", "italian"]),
    ("ru", &["ru", "rus", "russian"]),
    ("zh", &["zh", "chi", "zho", "chinese"]),
    ("ko", &["ko", "kor", "korean"]),
    ("nl", &["nl", "dut", "nld", "dutch"]),
    ("pl", &["pl", "pol", "polish"]),
    ("sv", &["sv", "swe", "swedish"]),
    ("fi", &["fi", "fin", "finnish"]),
    ("ar", &["ar", "ara", "arabic"]),
    ("tr", &["tr", "tur", "turkish"]),
];

/// Secondary tags recognized in subtitle filenames
const LANGUAGE_TAGS: &[&str] = &["forced", "sdh", "cc", "hi", "default"];

/// Result of companion metadata parsing.
///
/// `degraded` records that the title-aware path failed and only
/// language-level information was recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionMetadata {
    pub language: String,
    pub language_tags: Vec<String>,
    pub title: Option<String>,
    pub degraded: bool,
}

/// Single entry point with graceful degradation.
///
/// Tries the title-aware parse when the backing media file's stem is known,
/// falling back to language-only parsing when it is not or when the stems do
/// not line up. Never fails.
pub fn parse_companion_metadata(path: &Path, media_file_stem: Option<&str>) -> CompanionMetadata {
    if let Some(stem) = media_file_stem {
        match parse_language_tags_and_title(path, stem) {
            Ok(metadata) => return metadata,
            Err(err) => {
                log::debug!(
                    "Failed parsing language tags with title from {}: {}",
                    path.display(),
                    err
                );
            }
        }
    }

    CompanionMetadata {
        language: parse_subtitle_language(path),
        language_tags: parse_language_tags(path),
        title: None,
        degraded: true,
    }
}

/// Title-aware parse: `<media stem>.<title>.<lang>.<tags><ext>`.
///
/// Fails when the subtitle filename is not anchored on the media file's
/// stem; the caller degrades to language-only parsing.
pub fn parse_language_tags_and_title(
    path: &Path,
    media_file_stem: &str,
) -> AppResult<CompanionMetadata> {
    let stem = file_stem(path)?;

    let remainder = stem
        .strip_prefix(media_file_stem)
        .ok_or_else(|| AppError::Parsing(format!("{} is not anchored on the media stem", stem)))?
        .trim_matches('.');

    let tokens: Vec<&str> = remainder.split('.').filter(|t| !t.is_empty()).collect();

    // Consume the trailing run of language/tag tokens; whatever precedes it
    // is the embedded title.
    let mut language = UNKNOWN_LANGUAGE.to_string();
    let mut tags = Vec::new();
    let mut title_end = tokens.len();

    for (idx, token) in tokens.iter().enumerate().rev() {
        let lowered = token.to_lowercase();
        if let Some(code) = canonical_language(&lowered) {
            language = code.to_string();
            title_end = idx;
        } else if LANGUAGE_TAGS.contains(&lowered.as_str()) {
            tags.insert(0, lowered);
            title_end = idx;
        } else {
            break;
        }
    }

    let title = if title_end == 0 {
        None
    } else {
        Some(tokens[..title_end].join(" "))
    };

    Ok(CompanionMetadata {
        language,
        language_tags: tags,
        title,
        degraded: false,
    })
}

/// Language-only parse: scan every token of the stem for a language code.
pub fn parse_subtitle_language(path: &Path) -> String {
    if let Ok(stem) = file_stem(path) {
        for token in stem.split(['.', '_', '-', ' ']).rev() {
            if let Some(code) = canonical_language(&token.to_lowercase()) {
                return code.to_string();
            }
        }
    }
    UNKNOWN_LANGUAGE.to_string()
}

/// Language-only parse: collect recognized secondary tags from the stem.
pub fn parse_language_tags(path: &Path) -> Vec<String> {
    let mut tags = Vec::new();
    if let Ok(stem) = file_stem(path) {
        for token in stem.split(['.', '_', '-', ' ']) {
            let lowered = token.to_lowercase();
            if LANGUAGE_TAGS.contains(&lowered.as_str()) && !tags.contains(&lowered) {
                tags.push(lowered);
            }
        }
    }
    tags
}

/// Extract the copy flag from a parsed title and strip the marker.
pub fn copy_from_title(title: Option<&str>) -> (bool, Option<String>) {
    match title {
        Some(t) if t.starts_with(COPY_MARKER) => {
            let stripped = t[COPY_MARKER.len_utf8()..].trim_start().to_string();
            let cleaned = if stripped.is_empty() {
                None
            } else {
                Some(stripped)
            };
            (true, cleaned)
        }
        Some(t) => (false, Some(t.to_string())),
        None => (false, None),
    }
}

fn canonical_language(token: &str) -> Option<&'static str> {
    LANGUAGE_CODES
        .iter()
        .find(|(_, aliases)| aliases.contains(&token))
        .map(|(code, _)| *code)
}

fn file_stem(path: &Path) -> AppResult<&str> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| AppError::Parsing(path.display().to_string()))
}
