//! Puzzle dictionary loading and structural validation.

mod loader;
mod record;

pub use loader::{load_file, parse_str};
pub use record::{OPTIONAL_FIELDS, PuzzleId, PuzzleMetadata, PuzzleRecord, REQUIRED_FIELDS};
