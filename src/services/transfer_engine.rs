// src/services/transfer_engine.rs
//
// File transfer engine: orchestrates canonical-path computation, directory
// creation, the script decision gate, the transfer primitive, record
// mutation and event emission.
//
// Move, Copy and Rename are one shared orchestration parameterized by a
// small policy value; they diverge only in mode, script-gate usage and the
// emitted event. Ordering per transfer is fixed:
// create-dir → script-decision → filesystem-transfer → record-update → event.
// No retries here: a primitive failure is fatal for this one file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::LibraryConfig;
use crate::domain::episode::Episode;
use crate::domain::local_item::LocalMediaItem;
use crate::domain::media_file::{validate_media_file, MediaFileRecord, TransferMode};
use crate::domain::series::Series;
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, MediaFileCopied, MediaFileMoved, MediaFileRenamed};
use crate::repositories::{EpisodeRepository, MediaFileRepository};
use crate::services::disk_transfer_service::DiskTransferService;
use crate::services::media_info_service::MediaInfoService;
use crate::services::naming_service::NameBuilder;
use crate::services::script_import_service::{
    ImportScriptDecider, ScriptImportContext, ScriptImportDecision,
};

/// Which event a finished transfer emits
#[derive(Debug, Clone, Copy)]
enum TransferOutcome {
    Moved,
    Copied,
    Renamed,
}

/// Per-flow policy: the only points where Move, Copy and Rename diverge
#[derive(Debug, Clone, Copy)]
struct TransferPolicy {
    mode: TransferMode,
    uses_script_gate: bool,
    outcome: TransferOutcome,
}

pub struct FileTransferService {
    media_file_repo: Arc<dyn MediaFileRepository>,
    episode_repo: Arc<dyn EpisodeRepository>,
    naming: Arc<dyn NameBuilder>,
    disk: Arc<dyn DiskTransferService>,
    media_info: MediaInfoService,
    script_decider: Arc<dyn ImportScriptDecider>,
    event_bus: Arc<EventBus>,
    config: LibraryConfig,
}

impl FileTransferService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        media_file_repo: Arc<dyn MediaFileRepository>,
        episode_repo: Arc<dyn EpisodeRepository>,
        naming: Arc<dyn NameBuilder>,
        disk: Arc<dyn DiskTransferService>,
        script_decider: Arc<dyn ImportScriptDecider>,
        event_bus: Arc<EventBus>,
        config: LibraryConfig,
    ) -> Self {
        Self {
            media_file_repo,
            episode_repo,
            naming,
            disk,
            media_info: MediaInfoService::new(),
            script_decider,
            event_bus,
            config,
        }
    }

    /// Move a newly-acquired file into its canonical location.
    pub fn move_media_file(
        &self,
        file: MediaFileRecord,
        item: &LocalMediaItem,
    ) -> AppResult<MediaFileRecord> {
        let extension = extension_of(&item.path)?;
        let destination =
            self.naming
                .build_file_path(&item.episodes, &item.series, &file, &extension)?;

        log::debug!(
            "Moving media file: {} to {}",
            item.path.display(),
            destination.display()
        );

        self.transfer(
            file,
            &item.series,
            &item.episodes,
            destination,
            TransferPolicy {
                mode: TransferMode::Move,
                uses_script_gate: true,
                outcome: TransferOutcome::Moved,
            },
        )
    }

    /// Copy a newly-acquired file into its canonical location, leaving the
    /// source in place. Prefers hard links when configured.
    pub fn copy_media_file(
        &self,
        file: MediaFileRecord,
        item: &LocalMediaItem,
    ) -> AppResult<MediaFileRecord> {
        let extension = extension_of(&item.path)?;
        let destination =
            self.naming
                .build_file_path(&item.episodes, &item.series, &file, &extension)?;

        let mode = if self.config.copy_using_hardlinks {
            log::debug!(
                "Hardlinking media file: {} to {}",
                item.path.display(),
                destination.display()
            );
            TransferMode::HardLinkOrCopy
        } else {
            log::debug!(
                "Copying media file: {} to {}",
                item.path.display(),
                destination.display()
            );
            TransferMode::Copy
        };

        self.transfer(
            file,
            &item.series,
            &item.episodes,
            destination,
            TransferPolicy {
                mode,
                uses_script_gate: true,
                outcome: TransferOutcome::Copied,
            },
        )
    }

    /// Rename a file already inside the library to its canonical name,
    /// deriving the episode list from the record.
    pub fn rename_media_file(
        &self,
        file: MediaFileRecord,
        series: &Series,
    ) -> AppResult<MediaFileRecord> {
        let episodes = self.episode_repo.list_by_media_file(file.id)?;
        self.rename_media_file_with_episodes(file, series, &episodes)
    }

    /// Rename with an explicit episode list. Required when the caller
    /// already holds the associations, e.g. right after a script requested
    /// a rename and the record's location was cleared.
    pub fn rename_media_file_with_episodes(
        &self,
        file: MediaFileRecord,
        series: &Series,
        episodes: &[Episode],
    ) -> AppResult<MediaFileRecord> {
        let extension = file
            .extension(series)
            .ok_or_else(|| AppError::Other("Media file has no extension".to_string()))?;
        let destination = self.naming.build_file_path(episodes, series, &file, &extension)?;

        log::debug!("Renaming media file {} to {}", file.id, destination.display());

        self.transfer(
            file,
            series,
            episodes,
            destination,
            TransferPolicy {
                mode: TransferMode::Move,
                uses_script_gate: false,
                outcome: TransferOutcome::Renamed,
            },
        )
    }

    /// Shared five-step orchestration. Terminal on every branch.
    fn transfer(
        &self,
        mut file: MediaFileRecord,
        series: &Series,
        episodes: &[Episode],
        destination: PathBuf,
        policy: TransferPolicy,
    ) -> AppResult<MediaFileRecord> {
        let source = file.current_path(series).ok_or_else(|| {
            AppError::Other(format!("Media file {} has no current location", file.id))
        })?;

        if source == destination {
            return Err(AppError::Other(format!(
                "Source and destination cannot be the same: {}",
                source.display()
            )));
        }

        // 1. Season folder must exist before anything touches the disk
        if let Some(parent) = destination.parent() {
            self.disk.ensure_folder(parent)?;
        }

        // 2 + 3. Decision gate, then the primitive. Rename flows operate on
        // files already inside the library, where scripts are not consulted.
        if policy.uses_script_gate {
            let context = ScriptImportContext {
                series: series.clone(),
                episodes: episodes.to_vec(),
                mode: policy.mode,
            };

            match self
                .script_decider
                .try_import(&source, &destination, &context)?
            {
                ScriptImportDecision::DeferMove => {
                    self.disk.transfer_file(&source, &destination, policy.mode)?;
                }
                ScriptImportDecision::RenameRequested => {
                    // The script placed the file under the library, but not
                    // at the canonical name. Re-probe, drop the import-time
                    // location and let the rename flow re-derive the name.
                    self.media_info.refresh(&mut file, series)?;
                    file.path = None;
                    return self.rename_media_file_with_episodes(file, series, episodes);
                }
                ScriptImportDecision::MoveComplete => {
                    log::debug!(
                        "Import script placed {} itself; updating bookkeeping only",
                        destination.display()
                    );
                }
            }
        } else {
            self.disk.transfer_file(&source, &destination, policy.mode)?;
        }

        // 4. Rebind the record to its new location
        let relative = series.relative_path_of(&destination).ok_or_else(|| {
            AppError::Other(format!(
                "Destination {} is outside the series root {}",
                destination.display(),
                series.path.display()
            ))
        })?;
        file.relative_path = Some(relative);
        file.path = None;
        if let Ok(metadata) = std::fs::metadata(&destination) {
            file.size = metadata.len();
        }

        validate_media_file(&file)?;
        self.media_file_repo.save(&file)?;

        // 5. The one externally observable side effect beyond disk + record
        match policy.outcome {
            TransferOutcome::Moved => self.event_bus.emit(MediaFileMoved::new(file.clone())),
            TransferOutcome::Copied => self.event_bus.emit(MediaFileCopied::new(file.clone())),
            TransferOutcome::Renamed => self.event_bus.emit(MediaFileRenamed::new(file.clone())),
        }

        Ok(file)
    }
}

fn extension_of(path: &Path) -> AppResult<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .ok_or_else(|| AppError::Other(format!("{} has no extension", path.display())))
}
