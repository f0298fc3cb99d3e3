//! Structural checks on the puzzle dictionary.
//!
//! Everything here is fatal: a record that fails these checks cannot be
//! turned into a puzzle at all.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CrypticError, Result};
use crate::grid::{GridInput, StyleSet};

/// Keys every puzzle record must have.
pub const REQUIRED_FIELDS: &[&str] = &[
    "author",
    "clues",
    "date",
    "grid",
    "instructions",
    "publication",
    "title",
];

/// Keys a puzzle record may have.
pub const OPTIONAL_FIELDS: &[&str] = &[
    "editor", "id", "issue", "number", "settings", "solution", "unclued",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Puzzle identifier, written as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PuzzleId {
    Text(String),
    Number(i64),
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleId::Text(s) => f.write_str(s),
            PuzzleId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Descriptive fields of a puzzle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PuzzleMetadata {
    pub id: Option<PuzzleId>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub editor: Option<String>,
    pub date: Option<NaiveDate>,
    pub publication: Option<String>,
    pub issue: Option<String>,
    pub number: Option<i64>,
    pub instructions: Option<String>,
    pub solution: Option<String>,
}

/// A puzzle dictionary that passed structural checks.
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleRecord {
    pub metadata: PuzzleMetadata,
    pub settings: Map<String, Value>,
    /// Raw clue groups; parsed by [`Clues`](crate::clues::Clues).
    pub clues: Value,
    pub grid: GridInput,
    pub unclued: Vec<String>,
}

impl PuzzleRecord {
    /// Check and split a puzzle dictionary.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) if map.is_empty() => {
                return Err(CrypticError::EmptyData("Puzzle cannot be empty".to_string()));
            }
            Value::Object(map) => map,
            other => return Err(CrypticError::invalid_field("puzzle", "object", other)),
        };

        for field in REQUIRED_FIELDS {
            if !map.contains_key(*field) {
                return Err(CrypticError::MissingField(field.to_string()));
            }
        }
        for key in map.keys() {
            if !REQUIRED_FIELDS.contains(&key.as_str()) && !OPTIONAL_FIELDS.contains(&key.as_str())
            {
                log::warn!("Extra field: {}", key);
            }
        }

        let metadata = PuzzleMetadata {
            id: id_field(map)?,
            title: string_field(map, "title")?,
            author: string_field(map, "author")?,
            editor: string_field(map, "editor")?,
            date: date_field(map)?,
            publication: string_field(map, "publication")?,
            issue: string_field(map, "issue")?,
            number: integer_field(map, "number")?,
            instructions: string_field(map, "instructions")?,
            solution: string_field(map, "solution")?,
        };

        let settings = match map.get("settings") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(settings)) => settings.clone(),
            Some(other) => return Err(CrypticError::invalid_field("settings", "object", other)),
        };

        Ok(Self {
            metadata,
            settings,
            clues: clues_field(map)?,
            grid: grid_field(map)?,
            unclued: match map.get("unclued") {
                None | Some(Value::Null) => Vec::new(),
                Some(value) => string_list(value, "unclued")?,
            },
        })
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(CrypticError::invalid_field(key, "string", other)),
    }
}

fn integer_field(map: &Map<String, Value>, key: &str) -> Result<Option<i64>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| CrypticError::invalid_field(key, "integer", value)),
    }
}

fn id_field(map: &Map<String, Value>) -> Result<Option<PuzzleId>> {
    match map.get("id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(PuzzleId::Text(s.clone()))),
        Some(value) => value
            .as_i64()
            .map(|n| Some(PuzzleId::Number(n)))
            .ok_or_else(|| CrypticError::invalid_field("id", "string or integer", value)),
    }
}

fn date_field(map: &Map<String, Value>) -> Result<Option<NaiveDate>> {
    let Some(text) = string_field(map, "date")? else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map(Some)
        .map_err(|source| CrypticError::InvalidDate {
            value: text.clone(),
            source,
        })
}

fn clues_field(map: &Map<String, Value>) -> Result<Value> {
    let empty = || CrypticError::EmptyData("Clues cannot be empty".to_string());
    match map.get("clues") {
        None | Some(Value::Null) => Err(empty()),
        Some(Value::Object(groups)) if groups.is_empty() => Err(empty()),
        Some(Value::Array(groups)) if groups.is_empty() => Err(empty()),
        Some(clues @ (Value::Object(_) | Value::Array(_))) => Ok(clues.clone()),
        Some(other) => Err(CrypticError::invalid_field("clues", "object or list", other)),
    }
}

fn grid_field(map: &Map<String, Value>) -> Result<GridInput> {
    let grid = match map.get("grid") {
        None | Some(Value::Null) => {
            return Err(CrypticError::EmptyData("Grid cannot be empty".to_string()));
        }
        Some(Value::Object(grid)) if grid.is_empty() => {
            return Err(CrypticError::EmptyData("Grid cannot be empty".to_string()));
        }
        Some(Value::Object(grid)) => grid,
        Some(other) => return Err(CrypticError::invalid_field("grid", "object", other)),
    };

    let required_list = |key: &str| -> Result<Vec<String>> {
        let field = format!("grid.{}", key);
        match grid.get(key) {
            Some(value) => string_list(value, &field),
            None => Err(CrypticError::MissingField(field)),
        }
    };

    let style = match grid.get("style") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => string_list(value, "grid.style")?,
    };
    let styles: IndexMap<String, StyleSet> = match grid.get("styles") {
        None | Some(Value::Null) => IndexMap::new(),
        Some(value) => serde_json::from_value(value.clone()).map_err(|_| {
            CrypticError::invalid_field("grid.styles", "object of style objects", value)
        })?,
    };

    Ok(GridInput {
        rows: required_list("rows")?,
        columns: required_list("columns")?,
        style,
        styles,
    })
}

fn string_list(value: &Value, field: &str) -> Result<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(CrypticError::invalid_field(field, "list", value));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(CrypticError::invalid_field(field, "list of strings", other)),
        })
        .collect()
}
