// src/services/aggregation_service.rs
//
// Metadata aggregation: resolve a partially-populated local item (path +
// parsed identity) to its catalog episodes.
//
// Augmentation fails when there is no confident interpretation of the item
// at all; a confidently-parsed item whose numbering simply has no catalog
// counterpart succeeds with an empty episode list, and the caller decides.

use std::sync::Arc;

use crate::domain::local_item::LocalMediaItem;
use crate::error::{AppError, AppResult};
use crate::repositories::EpisodeRepository;

pub trait AggregationService: Send + Sync {
    fn augment(&self, item: &mut LocalMediaItem) -> AppResult<()>;
}

pub struct CatalogAggregationService {
    episode_repo: Arc<dyn EpisodeRepository>,
}

impl CatalogAggregationService {
    pub fn new(episode_repo: Arc<dyn EpisodeRepository>) -> Self {
        Self { episode_repo }
    }
}

impl AggregationService for CatalogAggregationService {
    fn augment(&self, item: &mut LocalMediaItem) -> AppResult<()> {
        let identity = item.identity.clone().ok_or_else(|| {
            AppError::Augmentation(format!("No parsed identity for {}", item.path.display()))
        })?;

        let mut episodes = Vec::new();
        for number in &identity.episode_numbers {
            if let Some(episode) = self.episode_repo.find_by_number(
                item.series.id,
                identity.season_number,
                *number,
            )? {
                episodes.push(episode);
            }
        }

        item.episodes = episodes;
        Ok(())
    }
}
