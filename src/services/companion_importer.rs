// src/services/companion_importer.rs
//
// Existing companion-file importer: drives the reconciliation filter and
// turns surviving candidate files into persisted companion records.
//
// Individual file failures (parse, aggregation, ambiguity) only suppress
// that file; the batch always completes and always upserts whatever
// succeeded.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::companion::{validate_companion_file, CompanionFileRecord};
use crate::domain::local_item::LocalMediaItem;
use crate::domain::series::Series;
use crate::error::{AppError, AppResult};
use crate::events::{CompanionFilesImported, EventBus};
use crate::parser::language::{copy_from_title, parse_companion_metadata};
use crate::parser::path::PathIdentityParser;
use crate::repositories::{CompanionFileRepository, MediaFileRepository};
use crate::services::aggregation_service::AggregationService;
use crate::services::reconciliation::filter_and_clean;

pub struct ExistingCompanionImporter {
    companion_repo: Arc<dyn CompanionFileRepository>,
    media_file_repo: Arc<dyn MediaFileRepository>,
    aggregation: Arc<dyn AggregationService>,
    path_parser: PathIdentityParser,
    event_bus: Arc<EventBus>,
}

impl ExistingCompanionImporter {
    pub fn new(
        companion_repo: Arc<dyn CompanionFileRepository>,
        media_file_repo: Arc<dyn MediaFileRepository>,
        aggregation: Arc<dyn AggregationService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            companion_repo,
            media_file_repo,
            aggregation,
            path_parser: PathIdentityParser::new(),
            event_bus,
        }
    }

    /// Reconcile the companion files on disk with the persisted records.
    ///
    /// Returns the union of newly created records and the untouched
    /// previously-imported set: the authoritative "current" set the caller
    /// uses to prune its own bookkeeping.
    pub fn process_files(
        &self,
        series: &Series,
        files_on_disk: &[PathBuf],
        already_imported: &[PathBuf],
    ) -> AppResult<Vec<CompanionFileRecord>> {
        log::debug!(
            "Looking for existing companion files in {}",
            series.path.display()
        );

        let outcome =
            filter_and_clean(&*self.companion_repo, series, files_on_disk, already_imported)?;

        let mut new_records = Vec::new();

        for candidate in &outcome.files_on_disk {
            match self.process_candidate(series, candidate) {
                Ok(Some(record)) => new_records.push(record),
                Ok(None) => {}
                Err(err) => return Err(err),
            }
        }

        log::info!("Found {} existing companion files", new_records.len());
        self.companion_repo.upsert_many(&new_records)?;

        self.event_bus.emit(CompanionFilesImported::new(
            series.id,
            new_records.len(),
            outcome.previously_imported.len(),
        ));

        // Return files that were just imported along with files that were
        // previously imported so previously imported files aren't imported
        // twice
        new_records.extend(outcome.previously_imported);
        Ok(new_records)
    }

    /// One candidate through the pipeline. `Ok(None)` means the file was
    /// skipped for a recoverable reason.
    fn process_candidate(
        &self,
        series: &Series,
        candidate: &Path,
    ) -> AppResult<Option<CompanionFileRecord>> {
        let extension = match candidate.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!(".{}", ext.to_lowercase()),
            None => return Ok(None),
        };

        if !CompanionFileRecord::is_recognized_extension(&extension) {
            return Ok(None);
        }

        let identity = match self.path_parser.parse_path(candidate) {
            Ok(identity) => identity,
            Err(AppError::Parsing(_)) => {
                log::debug!("Unable to parse companion file: {}", candidate.display());
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let mut item =
            LocalMediaItem::new(candidate.to_path_buf(), series.clone()).with_identity(identity);

        match self.aggregation.augment(&mut item) {
            Ok(()) => {}
            Err(AppError::Augmentation(_)) => {
                log::debug!("Unable to augment companion file: {}", candidate.display());
                return Ok(None);
            }
            Err(err) => return Err(err),
        }

        if item.episodes.is_empty() {
            log::debug!(
                "Cannot find related episodes for: {}",
                candidate.display()
            );
            return Ok(None);
        }

        // A companion file belongs to exactly one physical media file.
        let backing_files: HashSet<Option<Uuid>> =
            item.episodes.iter().map(|e| e.media_file_id).collect();

        if backing_files.len() > 1 {
            log::debug!(
                "Companion file {} does not match exactly one media file",
                candidate.display()
            );
            return Ok(None);
        }

        let Some(media_file_id) = backing_files.into_iter().next().flatten() else {
            log::debug!(
                "No media file backs the episodes of: {}",
                candidate.display()
            );
            return Ok(None);
        };

        let Some(relative_path) = series.relative_path_of(candidate) else {
            log::debug!(
                "Companion file {} lives outside the series root",
                candidate.display()
            );
            return Ok(None);
        };

        let media_stem = self
            .media_file_repo
            .get_by_id(media_file_id)?
            .and_then(|f| f.relative_path)
            .and_then(|rel| {
                Path::new(&rel)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
            });

        let metadata = parse_companion_metadata(candidate, media_stem.as_deref());
        let (copy, title) = copy_from_title(metadata.title.as_deref());

        let season_number = item.episodes[0].season_number;

        let record = CompanionFileRecord::new(
            series.id,
            media_file_id,
            season_number,
            relative_path,
            metadata.language,
            metadata.language_tags,
            title,
            extension,
            copy,
        );

        validate_companion_file(&record)?;

        Ok(Some(record))
    }
}
