// src/services/script_import_service.rs
//
// Script-import decision gate: a single decision point, invoked at most
// once per physical transfer, that can pre-empt the normal transfer.
//
// The script is untrusted, user-configured executable logic. A non-zero
// unexpected exit, signal death or spawn failure is fatal for that one
// transfer; it is never coerced into DeferMove.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::episode::Episode;
use crate::domain::media_file::TransferMode;
use crate::domain::series::Series;
use crate::error::{AppError, AppResult};

/// Exit codes the script uses to answer
const EXIT_DEFER_MOVE: i32 = 0;
const EXIT_RENAME_REQUESTED: i32 = 2;
const EXIT_MOVE_COMPLETE: i32 = 3;

/// The three possible answers of the decision gate.
///
/// The engine's branch over this is an exhaustive match; its result fully
/// determines the remainder of the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptImportDecision {
    /// No script configured, or the script declined: proceed with the
    /// normal transfer for the requested mode
    DeferMove,

    /// The script placed the file somewhere under the library but not at
    /// the canonical name: refresh metadata and re-derive the name
    RenameRequested,

    /// The script already placed the file at its destination: touch only
    /// the bookkeeping, never the filesystem
    MoveComplete,
}

/// Transfer context handed to the script
#[derive(Debug, Clone)]
pub struct ScriptImportContext {
    pub series: Series,
    pub episodes: Vec<Episode>,
    pub mode: TransferMode,
}

#[cfg_attr(test, mockall::automock)]
pub trait ImportScriptDecider: Send + Sync {
    fn try_import(
        &self,
        source: &Path,
        destination: &Path,
        context: &ScriptImportContext,
    ) -> AppResult<ScriptImportDecision>;
}

/// Default decider: spawns the configured script and waits for it.
pub struct ProcessImportScriptDecider {
    script_path: Option<PathBuf>,
}

impl ProcessImportScriptDecider {
    pub fn new(script_path: Option<PathBuf>) -> Self {
        Self { script_path }
    }
}

impl ImportScriptDecider for ProcessImportScriptDecider {
    fn try_import(
        &self,
        source: &Path,
        destination: &Path,
        context: &ScriptImportContext,
    ) -> AppResult<ScriptImportDecision> {
        let Some(script) = &self.script_path else {
            return Ok(ScriptImportDecision::DeferMove);
        };

        log::debug!(
            "Running import script {} for {}",
            script.display(),
            source.display()
        );

        let episode_numbers = context
            .episodes
            .iter()
            .map(|e| e.episode_number.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let season_number = context
            .episodes
            .first()
            .map(|e| e.season_number.to_string())
            .unwrap_or_default();

        let output = Command::new(script)
            .arg(source)
            .arg(destination)
            .env("SHOWVAULT_SOURCE_PATH", source)
            .env("SHOWVAULT_DESTINATION_PATH", destination)
            .env("SHOWVAULT_SERIES_TITLE", &context.series.title)
            .env("SHOWVAULT_SERIES_PATH", &context.series.path)
            .env("SHOWVAULT_SEASON_NUMBER", season_number)
            .env("SHOWVAULT_EPISODE_NUMBERS", episode_numbers)
            .env("SHOWVAULT_TRANSFER_MODE", context.mode.to_string())
            .output()
            .map_err(|e| {
                AppError::ScriptHook(format!("Failed to spawn {}: {}", script.display(), e))
            })?;

        match output.status.code() {
            Some(EXIT_DEFER_MOVE) => Ok(ScriptImportDecision::DeferMove),
            Some(EXIT_RENAME_REQUESTED) => Ok(ScriptImportDecision::RenameRequested),
            Some(EXIT_MOVE_COMPLETE) => Ok(ScriptImportDecision::MoveComplete),
            Some(code) => {
                log::warn!(
                    "Import script {} exited with {}: {}",
                    script.display(),
                    code,
                    String::from_utf8_lossy(&output.stderr)
                );
                Err(AppError::ScriptHook(format!(
                    "{} exited with unexpected code {}",
                    script.display(),
                    code
                )))
            }
            None => Err(AppError::ScriptHook(format!(
                "{} was terminated by a signal",
                script.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn context() -> ScriptImportContext {
        let series = Series::new("Show".to_string(), PathBuf::from("/library/Show"));
        let episodes = vec![Episode::new(series.id, 1, 2)];
        ScriptImportContext {
            series,
            episodes,
            mode: TransferMode::Move,
        }
    }

    #[test]
    fn test_no_script_defers() {
        let decider = ProcessImportScriptDecider::new(None);
        let decision = decider
            .try_import(Path::new("/a"), Path::new("/b"), &context())
            .unwrap();
        assert_eq!(decision, ScriptImportDecision::DeferMove);
    }

    #[cfg(unix)]
    fn script_exiting_with(dir: &Path, code: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(format!("hook-{}.sh", code));
        std::fs::write(&path, format!("#!/bin/sh\nexit {}\n", code)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_codes_map_to_decisions() {
        let dir = tempfile::tempdir().unwrap();

        let cases = [
            (0, ScriptImportDecision::DeferMove),
            (2, ScriptImportDecision::RenameRequested),
            (3, ScriptImportDecision::MoveComplete),
        ];

        for (code, expected) in cases {
            let decider =
                ProcessImportScriptDecider::new(Some(script_exiting_with(dir.path(), code)));
            let decision = decider
                .try_import(Path::new("/a"), Path::new("/b"), &context())
                .unwrap();
            assert_eq!(decision, expected);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_unexpected_exit_code_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let decider = ProcessImportScriptDecider::new(Some(script_exiting_with(dir.path(), 1)));

        let result = decider.try_import(Path::new("/a"), Path::new("/b"), &context());
        assert!(matches!(result, Err(AppError::ScriptHook(_))));
    }

    #[test]
    fn test_missing_script_binary_is_fatal() {
        let decider =
            ProcessImportScriptDecider::new(Some(PathBuf::from("/definitely/not/there.sh")));

        let result = decider.try_import(Path::new("/a"), Path::new("/b"), &context());
        assert!(matches!(result, Err(AppError::ScriptHook(_))));
    }
}
