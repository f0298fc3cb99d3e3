//! Top-level puzzle aggregate and public API.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clues::{Clue, Clues};
use crate::error::Result;
use crate::grid::Grid;
use crate::input::{self, PuzzleId, PuzzleMetadata, PuzzleRecord};
use crate::settings::Settings;
use crate::validation::{ErrorSink, ValidationContext, ValidationEngine};

/// Counts describing a built puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleSummary {
    pub width: usize,
    pub height: usize,
    pub containers: usize,
    pub clues: usize,
    pub grid_entries: usize,
    /// Soft error counts keyed by category.
    pub errors_by_category: IndexMap<String, usize>,
    pub is_valid: bool,
}

/// A reconciled and validated cryptic crossword.
#[derive(Debug, Clone)]
pub struct Puzzle {
    metadata: PuzzleMetadata,
    settings: Settings,
    clues: Clues,
    grid: Grid,
    unclued: Vec<String>,
    errors: ErrorSink,
}

impl Puzzle {
    /// Load and build a puzzle from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_value(&input::load_file(path)?)
    }

    /// Build a puzzle from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(&input::parse_str(json)?)
    }

    /// Build a puzzle from a puzzle dictionary.
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_record(PuzzleRecord::from_value(value)?)
    }

    /// Build a puzzle with the standard validators.
    pub fn from_record(record: PuzzleRecord) -> Result<Self> {
        Self::from_record_with(record, &ValidationEngine::default())
    }

    /// Build a puzzle, validating entries with a custom engine.
    ///
    /// Settings are read first because they shape the clue containers. The
    /// clues are built before the grid so the grid can resolve labels from
    /// their entries.
    pub fn from_record_with(record: PuzzleRecord, engine: &ValidationEngine) -> Result<Self> {
        let mut errors = ErrorSink::new();
        let settings = Settings::from_map(&record.settings)?;
        let clues = Clues::from_value(&record.clues, &settings, &mut errors)?;

        let labels = clues.entries();
        let mut grid = Grid::build(
            record.grid,
            &labels,
            settings.show_grid_border(),
            &mut errors,
        )?;

        let context = ValidationContext::new(
            labels.keys().cloned().collect(),
            grid.entries(),
            record.unclued.clone(),
        );
        engine.validate_into(&context, &mut errors);
        grid.mark_validated();

        if !errors.is_empty() {
            log::debug!("puzzle built with {} soft errors", errors.len());
        }

        Ok(Self {
            metadata: record.metadata,
            settings,
            clues,
            grid,
            unclued: record.unclued,
            errors,
        })
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn metadata(&self) -> &PuzzleMetadata {
        &self.metadata
    }

    pub fn id(&self) -> Option<&PuzzleId> {
        self.metadata.id.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.title.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.metadata.author.as_deref()
    }

    pub fn editor(&self) -> Option<&str> {
        self.metadata.editor.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.metadata.date
    }

    pub fn publication(&self) -> Option<&str> {
        self.metadata.publication.as_deref()
    }

    pub fn issue(&self) -> Option<&str> {
        self.metadata.issue.as_deref()
    }

    pub fn number(&self) -> Option<i64> {
        self.metadata.number
    }

    pub fn instructions(&self) -> Option<&str> {
        self.metadata.instructions.as_deref()
    }

    /// Free text describing the solution, not the per-clue explanations.
    pub fn solution(&self) -> Option<&str> {
        self.metadata.solution.as_deref()
    }

    // =========================================================================
    // Content
    // =========================================================================

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clues(&self) -> &Clues {
        &self.clues
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Entries intentionally left without a clue.
    pub fn unclued(&self) -> &[String] {
        &self.unclued
    }

    /// Soft errors recorded while building and validating the puzzle.
    pub fn errors(&self) -> &ErrorSink {
        &self.errors
    }

    /// True when no soft error was recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_starred_clues(&self) -> bool {
        self.clues.has_starred_clues()
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn answers(&self) -> Vec<String> {
        self.clues.answers()
    }

    pub fn solutions(&self) -> Vec<String> {
        self.clues.solutions()
    }

    /// Entry to clue map across every container.
    pub fn entries(&self) -> IndexMap<String, &Clue> {
        self.clues.entries()
    }

    pub fn summary(&self) -> PuzzleSummary {
        PuzzleSummary {
            width: self.width(),
            height: self.height(),
            containers: self.clues.len(),
            clues: self.clues.all().count(),
            grid_entries: self.grid.entries().len(),
            errors_by_category: self
                .errors
                .iter()
                .map(|(category, messages)| (category.key().to_string(), messages.len()))
                .collect(),
            is_valid: self.is_valid(),
        }
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.date().map(|d| d.to_string()).unwrap_or_default();
        write!(
            f,
            "{}: {} by {} ({})",
            date,
            self.title().unwrap_or_default(),
            self.author().unwrap_or_default(),
            self.publication().unwrap_or_default()
        )
    }
}
