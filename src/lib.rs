// src/lib.rs
// ShowVault - Library-first media file organizer
//
// Architecture:
// - Domain-centric: entities and invariants live in `domain`
// - Event-driven: services coordinate through the event bus
// - Explicit: no implicit behavior, no magic
// - Local-first: everything operates on the user's own library

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod parser;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_companion_file,
    validate_media_file,
    validate_series,
    // Companion File
    CompanionFileRecord,
    // Episode
    Episode,
    // In-flight import unit
    LocalMediaItem,
    // Media File
    MediaFileRecord,
    MediaInfo,
    MediaItemIdentity,
    // Series
    Series,
    TransferMode,
    SUBTITLE_EXTENSIONS,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    CompanionFilesImported,
    DomainEvent,
    EventBus,
    MediaFileCopied,
    MediaFileMoved,
    MediaFileRenamed,
};

// ============================================================================
// PUBLIC API - Configuration & Database
// ============================================================================

pub use config::LibraryConfig;

pub use db::{create_connection_pool, default_database_path, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    CompanionFileRepository,
    EpisodeRepository,
    MediaFileRepository,
    SeriesRepository,
    SqliteCompanionFileRepository,
    SqliteEpisodeRepository,
    SqliteMediaFileRepository,
    SqliteSeriesRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AggregationService,
    CatalogAggregationService,
    DiskTransferService,
    ExistingCompanionImporter,
    FileTransferService,
    ImportScriptDecider,
    LibraryScanner,
    LocalDiskTransferService,
    MediaInfoService,
    NameBuilder,
    ProcessImportScriptDecider,
    ScriptImportContext,
    ScriptImportDecision,
    StandardNameBuilder,
};
