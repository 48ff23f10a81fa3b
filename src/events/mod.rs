// src/events/mod.rs
//
// Internal Event System - Public API
//
// The type-erased EventHandler stays internal to the bus module.

pub mod bus;
pub mod types;

pub use bus::EventBus;
pub use types::DomainEvent;

pub use types::{CompanionFilesImported, MediaFileCopied, MediaFileMoved, MediaFileRenamed};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
