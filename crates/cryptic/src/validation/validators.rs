//! Validators comparing clue entries against grid entries.

use std::collections::HashSet;

use super::report::{ErrorCategory, ErrorSink};

/// Entry sets a validator works on.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    /// Entries implied by the clues.
    pub clue_entries: Vec<String>,
    /// Entries read from the grid encodings.
    pub grid_entries: Vec<String>,
    /// Entries declared as intentionally unclued.
    pub unclued: Vec<String>,
}

impl ValidationContext {
    /// Create a context from the three entry lists.
    pub fn new(clue_entries: Vec<String>, grid_entries: Vec<String>, unclued: Vec<String>) -> Self {
        Self {
            clue_entries,
            grid_entries,
            unclued,
        }
    }

    fn is_unclued(&self, entry: &str) -> bool {
        self.unclued.iter().any(|u| u == entry)
    }
}

/// A single validation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub category: ErrorCategory,
    pub entry: String,
    pub message: String,
}

impl Finding {
    fn new(category: ErrorCategory, entry: &str, message: String) -> Self {
        Self {
            category,
            entry: entry.to_string(),
            message,
        }
    }
}

/// Trait for validators.
pub trait Validator {
    /// Run validation and return findings.
    fn validate(&self, context: &ValidationContext) -> Vec<Finding>;
}

/// Reports clue entries that never appear in the grid.
pub struct ExtraCluesValidator;

impl Validator for ExtraCluesValidator {
    fn validate(&self, context: &ValidationContext) -> Vec<Finding> {
        let grid: HashSet<&str> = context.grid_entries.iter().map(String::as_str).collect();
        sorted_unique(&context.clue_entries)
            .into_iter()
            .filter(|entry| !grid.contains(entry) && !context.is_unclued(entry))
            .map(|entry| {
                Finding::new(
                    ErrorCategory::ExtraClues,
                    entry,
                    format!("Extra clue entry: {}", entry),
                )
            })
            .collect()
    }
}

/// Reports grid entries that no clue accounts for.
pub struct MissingCluesValidator;

impl Validator for MissingCluesValidator {
    fn validate(&self, context: &ValidationContext) -> Vec<Finding> {
        let clued: HashSet<&str> = context.clue_entries.iter().map(String::as_str).collect();
        sorted_unique(&context.grid_entries)
            .into_iter()
            .filter(|entry| !clued.contains(entry) && !context.is_unclued(entry))
            .map(|entry| {
                Finding::new(
                    ErrorCategory::MissingClues,
                    entry,
                    format!("Missing clue for entry: {}", entry),
                )
            })
            .collect()
    }
}

fn sorted_unique(entries: &[String]) -> Vec<&str> {
    let mut unique: Vec<&str> = entries.iter().map(String::as_str).collect();
    unique.sort_unstable();
    unique.dedup();
    unique
}

/// Runs a set of validators and records their findings.
pub struct ValidationEngine {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidationEngine {
    /// Create an engine with the standard entry validators.
    pub fn new() -> Self {
        Self {
            validators: vec![Box::new(ExtraCluesValidator), Box::new(MissingCluesValidator)],
        }
    }

    /// Add a custom validator.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Run every validator.
    pub fn validate(&self, context: &ValidationContext) -> Vec<Finding> {
        self.validators
            .iter()
            .flat_map(|v| v.validate(context))
            .collect()
    }

    /// Run every validator and record the findings in a sink.
    pub fn validate_into(&self, context: &ValidationContext, sink: &mut ErrorSink) {
        for finding in self.validate(context) {
            sink.record(finding.category, finding.message);
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}
