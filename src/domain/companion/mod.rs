pub mod entity;
pub mod invariants;

pub use entity::{CompanionFileRecord, SUBTITLE_EXTENSIONS};
pub use invariants::validate_companion_file;
