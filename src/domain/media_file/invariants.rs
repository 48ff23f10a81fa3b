use super::entity::MediaFileRecord;
use crate::domain::{DomainError, DomainResult};

/// Validates all MediaFileRecord invariants
pub fn validate_media_file(file: &MediaFileRecord) -> DomainResult<()> {
    validate_stored_path(file)?;
    Ok(())
}

/// Stored paths are always relative to the owning series root.
fn validate_stored_path(file: &MediaFileRecord) -> DomainResult<()> {
    if let Some(rel) = &file.relative_path {
        if rel.is_empty() {
            return Err(DomainError::InvariantViolation(
                "Stored path must not be empty".to_string(),
            ));
        }
        if std::path::Path::new(rel).is_absolute() {
            return Err(DomainError::AbsoluteStoredPath(rel.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    #[test]
    fn test_valid_media_file() {
        let mut file =
            MediaFileRecord::new(Uuid::new_v4(), PathBuf::from("/downloads/ep.mkv"), 1024);
        file.relative_path = Some("Season 01/ep.mkv".to_string());
        assert!(validate_media_file(&file).is_ok());
    }

    #[test]
    fn test_absolute_stored_path_fails() {
        let mut file =
            MediaFileRecord::new(Uuid::new_v4(), PathBuf::from("/downloads/ep.mkv"), 1024);
        file.relative_path = Some("/library/Show/Season 01/ep.mkv".to_string());
        assert!(validate_media_file(&file).is_err());
    }

    #[test]
    fn test_empty_stored_path_fails() {
        let mut file =
            MediaFileRecord::new(Uuid::new_v4(), PathBuf::from("/downloads/ep.mkv"), 1024);
        file.relative_path = Some(String::new());
        assert!(validate_media_file(&file).is_err());
    }
}
