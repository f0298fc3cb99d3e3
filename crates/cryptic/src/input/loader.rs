//! Loading puzzle dictionaries from JSON.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{CrypticError, Result};

/// Read a JSON puzzle file into a dictionary value.
pub fn load_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| CrypticError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::debug!("loaded {} bytes from {}", contents.len(), path.display());
    parse_str(&contents)
}

/// Parse a JSON document into a dictionary value.
pub fn parse_str(json: &str) -> Result<Value> {
    Ok(serde_json::from_str(json)?)
}
