// src/services/disk_transfer_service.rs
//
// Transfer primitive: the literal filesystem move/copy/hardlink, opaque to
// the engine beyond its mode contract. The hardlink-to-copy fallback lives
// here, invisible to callers.

use std::fs;
use std::path::Path;

use crate::domain::media_file::TransferMode;
use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
pub trait DiskTransferService: Send + Sync {
    fn transfer_file(&self, source: &Path, destination: &Path, mode: TransferMode)
        -> AppResult<()>;

    /// Create a directory and any missing parents. Succeeds when the
    /// directory already exists.
    fn ensure_folder(&self, dir: &Path) -> AppResult<()>;
}

pub struct LocalDiskTransferService;

impl LocalDiskTransferService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalDiskTransferService {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskTransferService for LocalDiskTransferService {
    fn transfer_file(
        &self,
        source: &Path,
        destination: &Path,
        mode: TransferMode,
    ) -> AppResult<()> {
        if !source.exists() {
            return Err(AppError::Filesystem {
                path: source.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "source does not exist"),
            });
        }

        match mode {
            TransferMode::Move => {
                // Plain rename first; fall back to copy + delete across
                // filesystem boundaries.
                if fs::rename(source, destination).is_err() {
                    fs::copy(source, destination).map_err(|e| AppError::Filesystem {
                        path: destination.to_path_buf(),
                        source: e,
                    })?;
                    fs::remove_file(source).map_err(|e| AppError::Filesystem {
                        path: source.to_path_buf(),
                        source: e,
                    })?;
                }
            }
            TransferMode::Copy => {
                fs::copy(source, destination).map_err(|e| AppError::Filesystem {
                    path: destination.to_path_buf(),
                    source: e,
                })?;
            }
            TransferMode::HardLinkOrCopy => {
                if let Err(link_err) = fs::hard_link(source, destination) {
                    log::debug!(
                        "Hardlink from {} to {} failed ({}), copying instead",
                        source.display(),
                        destination.display(),
                        link_err
                    );
                    fs::copy(source, destination).map_err(|e| AppError::Filesystem {
                        path: destination.to_path_buf(),
                        source: e,
                    })?;
                }
            }
        }

        Ok(())
    }

    fn ensure_folder(&self, dir: &Path) -> AppResult<()> {
        fs::create_dir_all(dir).map_err(|e| AppError::Filesystem {
            path: dir.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_deletes_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.mkv");
        let destination = dir.path().join("b.mkv");
        std::fs::write(&source, b"payload").unwrap();

        LocalDiskTransferService::new()
            .transfer_file(&source, &destination, TransferMode::Move)
            .unwrap();

        assert!(!source.exists());
        assert_eq!(std::fs::read(&destination).unwrap(), b"payload");
    }

    #[test]
    fn test_copy_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.mkv");
        let destination = dir.path().join("b.mkv");
        std::fs::write(&source, b"payload").unwrap();

        LocalDiskTransferService::new()
            .transfer_file(&source, &destination, TransferMode::Copy)
            .unwrap();

        assert!(source.exists());
        assert_eq!(std::fs::read(&destination).unwrap(), b"payload");
    }

    #[test]
    fn test_hardlink_or_copy_produces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.mkv");
        let destination = dir.path().join("b.mkv");
        std::fs::write(&source, b"payload").unwrap();

        LocalDiskTransferService::new()
            .transfer_file(&source, &destination, TransferMode::HardLinkOrCopy)
            .unwrap();

        assert!(source.exists());
        assert_eq!(std::fs::read(&destination).unwrap(), b"payload");
    }

    #[test]
    fn test_missing_source_is_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = LocalDiskTransferService::new().transfer_file(
            &dir.path().join("missing.mkv"),
            &dir.path().join("b.mkv"),
            TransferMode::Move,
        );
        assert!(matches!(result, Err(AppError::Filesystem { .. })));
    }

    #[test]
    fn test_ensure_folder_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Season 01");
        let service = LocalDiskTransferService::new();

        service.ensure_folder(&nested).unwrap();
        service.ensure_folder(&nested).unwrap();

        assert!(nested.is_dir());
    }
}
