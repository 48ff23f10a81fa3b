// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod aggregation_service;
pub mod companion_importer;
pub mod disk_transfer_service;
pub mod library_scanner;
pub mod media_info_service;
pub mod naming_service;
pub mod reconciliation;
pub mod script_import_service;
pub mod transfer_engine;

#[cfg(test)]
mod companion_importer_tests;

// Re-export all services and their types
pub use aggregation_service::{AggregationService, CatalogAggregationService};

pub use companion_importer::ExistingCompanionImporter;

pub use disk_transfer_service::{DiskTransferService, LocalDiskTransferService};

pub use library_scanner::LibraryScanner;

pub use media_info_service::MediaInfoService;

pub use naming_service::{NameBuilder, StandardNameBuilder};

pub use reconciliation::{
    filter_and_clean, ReconcilableRecord, ReconcilableStore, ReconciliationOutcome,
};

pub use script_import_service::{
    ImportScriptDecider, ProcessImportScriptDecider, ScriptImportContext, ScriptImportDecision,
};

pub use transfer_engine::FileTransferService;
