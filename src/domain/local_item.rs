// src/domain/local_item.rs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::episode::Episode;
use crate::domain::series::Series;

/// Identity parsed from a filename: numbering plus whatever release text
/// remained. Immutable once produced by the path parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItemIdentity {
    pub season_number: u32,

    /// One or more episode numbers (multi-episode containers)
    pub episode_numbers: Vec<u32>,

    /// Leading release/series text of the filename, dots collapsed
    pub release_title: String,
}

/// One file being processed right now.
///
/// Created per candidate file, discarded after its single pass through the
/// pipeline. Never persisted.
#[derive(Debug, Clone)]
pub struct LocalMediaItem {
    /// Absolute location of the candidate file
    pub path: PathBuf,

    /// Parsed identity, `None` until parsing succeeds
    pub identity: Option<MediaItemIdentity>,

    /// Owning catalog entity
    pub series: Series,

    /// Catalog episodes resolved by aggregation, empty until it succeeds
    pub episodes: Vec<Episode>,
}

impl LocalMediaItem {
    pub fn new(path: PathBuf, series: Series) -> Self {
        Self {
            path,
            identity: None,
            series,
            episodes: Vec::new(),
        }
    }

    pub fn with_identity(mut self, identity: MediaItemIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Season of the resolved episodes, falling back to the parsed identity.
    pub fn season_number(&self) -> Option<u32> {
        self.episodes
            .first()
            .map(|e| e.season_number)
            .or_else(|| self.identity.as_ref().map(|i| i.season_number))
    }
}
