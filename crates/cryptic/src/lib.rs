//! Cryptic: a model of cryptic crossword puzzles.
//!
//! A puzzle stores its grid twice, once as row strings and once as column
//! strings, alongside clues written in a compact line grammar. Cryptic
//! reconciles both encodings into a single cell matrix, resolves grid labels
//! from the clues, and cross-checks clue entries against grid entries.
//!
//! # Core Principles
//!
//! - **Two tiers of errors**: malformed input aborts with a [`CrypticError`];
//!   inconsistent but usable content is collected in an [`ErrorSink`]
//! - **No silent repair**: conflicting cell values are kept side by side and
//!   reported, never discarded
//! - **Built once**: a [`Puzzle`] is constructed eagerly from its record and
//!   does not share state with other puzzles
//!
//! # Example
//!
//! ```no_run
//! use cryptic::{ErrorCategory, Puzzle};
//!
//! let puzzle = Puzzle::from_path("puzzle.json").unwrap();
//!
//! println!("{}", puzzle);
//! for message in puzzle.errors().get(ErrorCategory::MissingClues) {
//!     println!("{}", message);
//! }
//! ```

pub mod clues;
pub mod error;
pub mod grid;
pub mod input;
pub mod settings;
pub mod validation;

mod puzzle;

pub use crate::puzzle::{Puzzle, PuzzleSummary};
pub use clues::{Clue, ClueContainer, Clues};
pub use error::{CrypticError, Result};
pub use grid::{Cell, Direction, Grid, GridInput, GridStage};
pub use input::{PuzzleMetadata, PuzzleRecord};
pub use settings::{EnumerationMode, SettingValue, Settings};
pub use validation::{ErrorCategory, ErrorSink, ValidationEngine};
