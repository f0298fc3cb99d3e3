//! Categorised soft errors collected while a puzzle is built.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Category of a soft error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Row and column encodings disagree about a cell.
    CellValue,
    /// A cell received two different labels.
    CellLabel,
    /// Style annotation refers to a duplicate or missing cell.
    GridStyle,
    /// A clue is missing one of its fields.
    ClueFormat,
    /// A clue entry does not appear in the grid.
    ExtraClues,
    /// A grid entry has no clue.
    MissingClues,
    /// Anything else.
    Other,
}

impl ErrorCategory {
    /// Get a human-readable label for the category.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::CellValue => "Cell Value Mismatch",
            ErrorCategory::CellLabel => "Cell Label Conflict",
            ErrorCategory::GridStyle => "Grid Style Issue",
            ErrorCategory::ClueFormat => "Clue Format Issue",
            ErrorCategory::ExtraClues => "Extra Clues",
            ErrorCategory::MissingClues => "Missing Clues",
            ErrorCategory::Other => "Other",
        }
    }

    /// The snake_case key used in serialized output.
    pub fn key(&self) -> &'static str {
        match self {
            ErrorCategory::CellValue => "cell_value",
            ErrorCategory::CellLabel => "cell_label",
            ErrorCategory::GridStyle => "grid_style",
            ErrorCategory::ClueFormat => "clue_format",
            ErrorCategory::ExtraClues => "extra_clues",
            ErrorCategory::MissingClues => "missing_clues",
            ErrorCategory::Other => "other",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Ordered mapping from error category to the messages recorded under it.
///
/// Categories keep the order in which they were first recorded, and messages
/// keep the order in which they were added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorSink {
    errors: IndexMap<ErrorCategory, Vec<String>>,
}

impl ErrorSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message under a category. Empty messages are ignored.
    pub fn record(&mut self, category: ErrorCategory, message: impl Into<String>) {
        let message = message.into();
        if message.is_empty() {
            return;
        }
        log::debug!("{}: {}", category, message);
        self.errors.entry(category).or_default().push(message);
    }

    /// Messages recorded under a category.
    pub fn get(&self, category: ErrorCategory) -> &[String] {
        self.errors
            .get(&category)
            .map(|messages| messages.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if at least one message exists under the category.
    pub fn has(&self, category: ErrorCategory) -> bool {
        !self.get(category).is_empty()
    }

    /// Number of messages under a category.
    pub fn count(&self, category: ErrorCategory) -> usize {
        self.get(category).len()
    }

    /// Total number of messages across categories.
    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Categories in first-recorded order.
    pub fn categories(&self) -> impl Iterator<Item = ErrorCategory> + '_ {
        self.errors.keys().copied()
    }

    /// Iterate over `(category, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorCategory, &[String])> {
        self.errors
            .iter()
            .map(|(category, messages)| (*category, messages.as_slice()))
    }
}
