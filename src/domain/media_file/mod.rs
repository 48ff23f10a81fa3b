pub mod entity;
pub mod invariants;

pub use entity::{MediaFileRecord, MediaInfo, TransferMode};
pub use invariants::validate_media_file;
