//! Error types for the cryptic library.
//!
//! These are the structural errors that abort puzzle construction. Content
//! inconsistencies that still leave a usable puzzle are collected in an
//! [`ErrorSink`](crate::validation::ErrorSink) instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cryptic operations.
#[derive(Debug, Error)]
pub enum CrypticError {
    /// Error reading or accessing a puzzle file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is absent from the puzzle record.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A field holds a value of the wrong shape.
    #[error("Invalid field '{field}': expected {expected}, found {found}")]
    InvalidField {
        field: String,
        expected: String,
        found: String,
    },

    /// A date field could not be parsed.
    #[error("Invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Empty grid, empty clue set or similar.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Lookup or assignment of a setting outside the schema.
    #[error("Undefined setting: {0}")]
    UndefinedSetting(String),

    /// A setting value outside its legal set.
    #[error("Invalid value for setting '{key}': {found} [expected: {expected}]")]
    InvalidSetting {
        key: String,
        expected: String,
        found: String,
    },

    /// Unknown option token in a clue container title.
    #[error("Invalid container option: {0}")]
    InvalidContainerOption(String),

    /// Clue payload that is neither a record nor a text line.
    #[error("Invalid clue: {0}")]
    InvalidClue(String),
}

impl CrypticError {
    /// Build an [`CrypticError::InvalidField`] from a JSON value.
    pub(crate) fn invalid_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: &serde_json::Value,
    ) -> Self {
        CrypticError::InvalidField {
            field: field.into(),
            expected: expected.into(),
            found: json_type_name(found).to_string(),
        }
    }
}

/// Short name of a JSON value's type, used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "object",
    }
}

/// Result type alias for cryptic operations.
pub type Result<T> = std::result::Result<T, CrypticError>;
