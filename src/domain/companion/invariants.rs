use super::entity::CompanionFileRecord;
use crate::domain::{DomainError, DomainResult};
use crate::parser::language::COPY_MARKER;

/// Validates all CompanionFileRecord invariants
pub fn validate_companion_file(file: &CompanionFileRecord) -> DomainResult<()> {
    if file.relative_path.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Companion file path must not be empty".to_string(),
        ));
    }
    if std::path::Path::new(&file.relative_path).is_absolute() {
        return Err(DomainError::AbsoluteStoredPath(file.relative_path.clone()));
    }
    if !file.extension.starts_with('.') {
        return Err(DomainError::InvariantViolation(format!(
            "Extension must carry a leading dot, got {:?}",
            file.extension
        )));
    }
    // The copy marker is a filename convention, not data: it is stripped
    // before the title is persisted.
    if let Some(title) = &file.title {
        if title.starts_with(COPY_MARKER) {
            return Err(DomainError::InvariantViolation(format!(
                "Stored title must not carry the copy marker, got {:?}",
                title
            )));
        }
    }
    Ok(())
}
