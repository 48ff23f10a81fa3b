// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod companion;
pub mod episode;
pub mod local_item;
pub mod media_file;
pub mod series;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Series Domain
pub use series::{validate_series, Series};

// Episode Domain
pub use episode::Episode;

// Media File Domain
pub use media_file::{validate_media_file, MediaFileRecord, MediaInfo, TransferMode};

// Companion File Domain
pub use companion::{validate_companion_file, CompanionFileRecord, SUBTITLE_EXTENSIONS};

// In-flight import unit
pub use local_item::{LocalMediaItem, MediaItemIdentity};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Stored paths must be relative to the series root, got {0}")]
    AbsoluteStoredPath(String),

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
