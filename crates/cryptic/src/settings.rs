//! Puzzle settings with a fixed schema.
//!
//! Every setting has a default and, for most keys, a closed set of legal
//! values. Looking up or assigning an undefined key is an error, and so is
//! assigning a value outside the legal set.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{CrypticError, Result};

/// A single setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl SettingValue {
    /// Return the boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Return the integer payload, if any.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Return the text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Integer(n) => write!(f, "{}", n),
            SettingValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

/// Schema entry for one setting.
#[derive(Debug, Clone)]
struct SettingRule {
    default: SettingValue,
    /// None means any value is accepted.
    legal: Option<Vec<SettingValue>>,
}

impl SettingRule {
    fn new(default: impl Into<SettingValue>, legal: Vec<SettingValue>) -> Self {
        Self {
            default: default.into(),
            legal: Some(legal),
        }
    }

    fn boolean(default: bool) -> Self {
        Self::new(default, vec![true.into(), false.into()])
    }
}

// =============================================================================
// SCHEMA
// =============================================================================

static SCHEMA: Lazy<IndexMap<&'static str, SettingRule>> = Lazy::new(|| {
    let mut schema = IndexMap::new();
    schema.insert(
        "clue_columns",
        SettingRule::new(2i64, (1..=5).map(SettingValue::Integer).collect()),
    );
    schema.insert(
        "show_enumerations",
        SettingRule::new(
            "answers",
            vec!["answers".into(), "entries".into(), true.into(), false.into()],
        ),
    );
    schema.insert(
        "show_grid_bars",
        SettingRule::new(
            "all",
            vec![
                "all".into(),
                "puzzle".into(),
                "solution".into(),
                true.into(),
                false.into(),
            ],
        ),
    );
    schema.insert("show_grid_border", SettingRule::boolean(false));
    schema.insert("show_grid_entries", SettingRule::boolean(true));
    schema.insert("show_grid_labels", SettingRule::boolean(true));
    schema.insert("show_grid_lines", SettingRule::boolean(true));
    schema.insert("show_starred_entries_in_grid", SettingRule::boolean(true));
    schema.insert(
        "status",
        SettingRule::new("draft", vec!["draft".into(), "published".into()]),
    );
    schema
});

/// Which string an enumeration is computed from, if shown at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationMode {
    /// Count letters of the answers.
    Answers,
    /// Count letters of the grid entries.
    Entries,
    /// Do not show enumerations.
    Hidden,
}

impl EnumerationMode {
    /// Interpret a setting value.
    pub fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Bool(true) => Some(EnumerationMode::Answers),
            SettingValue::Bool(false) => Some(EnumerationMode::Hidden),
            SettingValue::Text(s) if s == "answers" => Some(EnumerationMode::Answers),
            SettingValue::Text(s) if s == "entries" => Some(EnumerationMode::Entries),
            _ => None,
        }
    }

    /// Returns true unless enumerations are hidden.
    pub fn is_shown(&self) -> bool {
        !matches!(self, EnumerationMode::Hidden)
    }
}

/// Where grid bars are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarVisibility {
    All,
    Puzzle,
    Solution,
    Hidden,
}

/// Publication status of the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleStatus {
    Draft,
    Published,
}

/// Validated puzzle settings.
///
/// Only explicitly assigned values are stored; everything else falls back
/// to the schema default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Settings {
    overrides: IndexMap<String, SettingValue>,
}

impl Settings {
    /// Create settings with every key at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build settings from a JSON object, validating every entry.
    pub fn from_map(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let mut settings = Self::new();
        for (key, raw) in map {
            let value: SettingValue =
                serde_json::from_value(raw.clone()).map_err(|_| CrypticError::InvalidSetting {
                    key: key.clone(),
                    expected: expected_values(key),
                    found: raw.to_string(),
                })?;
            settings.set(key, value)?;
        }
        Ok(settings)
    }

    /// Look up a setting, falling back to its default.
    pub fn get(&self, key: &str) -> Result<SettingValue> {
        let rule = rule_for(key)?;
        Ok(self
            .overrides
            .get(key)
            .cloned()
            .unwrap_or_else(|| rule.default.clone()))
    }

    /// Assign a setting after validating it against the schema.
    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) -> Result<()> {
        let value = value.into();
        Self::validate(key, &value)?;
        self.overrides.insert(key.to_string(), value);
        Ok(())
    }

    /// Check a key/value pair against the schema without storing it.
    pub fn validate(key: &str, value: &SettingValue) -> Result<()> {
        let rule = rule_for(key)?;
        if let Some(legal) = &rule.legal {
            if !legal.contains(value) {
                return Err(CrypticError::InvalidSetting {
                    key: key.to_string(),
                    expected: expected_values(key),
                    found: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Explicitly assigned values, in assignment order.
    pub fn overrides(&self) -> &IndexMap<String, SettingValue> {
        &self.overrides
    }

    /// All setting keys in schema order.
    pub fn keys() -> impl Iterator<Item = &'static str> {
        SCHEMA.keys().copied()
    }

    // -------------------------------------------------------------------------
    // Typed accessors. The schema guarantees these keys exist and hold legal
    // values, so the fallbacks below are never reached in practice.
    // -------------------------------------------------------------------------

    /// Number of columns used to lay out clues.
    pub fn clue_columns(&self) -> i64 {
        self.get_known("clue_columns").as_integer().unwrap_or(2)
    }

    pub fn show_enumerations(&self) -> EnumerationMode {
        EnumerationMode::from_setting(&self.get_known("show_enumerations"))
            .unwrap_or(EnumerationMode::Answers)
    }

    pub fn show_grid_bars(&self) -> BarVisibility {
        match self.get_known("show_grid_bars") {
            SettingValue::Text(s) if s == "puzzle" => BarVisibility::Puzzle,
            SettingValue::Text(s) if s == "solution" => BarVisibility::Solution,
            SettingValue::Bool(false) => BarVisibility::Hidden,
            _ => BarVisibility::All,
        }
    }

    pub fn show_grid_border(&self) -> bool {
        self.get_bool("show_grid_border", false)
    }

    pub fn show_grid_entries(&self) -> bool {
        self.get_bool("show_grid_entries", true)
    }

    pub fn show_grid_labels(&self) -> bool {
        self.get_bool("show_grid_labels", true)
    }

    pub fn show_grid_lines(&self) -> bool {
        self.get_bool("show_grid_lines", true)
    }

    pub fn show_starred_entries_in_grid(&self) -> bool {
        self.get_bool("show_starred_entries_in_grid", true)
    }

    pub fn status(&self) -> PuzzleStatus {
        match self.get_known("status") {
            SettingValue::Text(s) if s == "published" => PuzzleStatus::Published,
            _ => PuzzleStatus::Draft,
        }
    }

    fn get_known(&self, key: &str) -> SettingValue {
        self.overrides
            .get(key)
            .cloned()
            .or_else(|| SCHEMA.get(key).map(|rule| rule.default.clone()))
            .unwrap_or(SettingValue::Bool(false))
    }

    fn get_bool(&self, key: &str, fallback: bool) -> bool {
        self.get_known(key).as_bool().unwrap_or(fallback)
    }
}

fn rule_for(key: &str) -> Result<&'static SettingRule> {
    SCHEMA
        .get(key)
        .ok_or_else(|| CrypticError::UndefinedSetting(key.to_string()))
}

fn expected_values(key: &str) -> String {
    match SCHEMA.get(key).and_then(|rule| rule.legal.as_ref()) {
        Some(legal) => legal
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        None => "any value".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert_eq!(settings.clue_columns(), 2);
        assert_eq!(settings.show_enumerations(), EnumerationMode::Answers);
        assert_eq!(settings.show_grid_bars(), BarVisibility::All);
        assert!(!settings.show_grid_border());
        assert!(settings.show_grid_labels());
        assert_eq!(settings.status(), PuzzleStatus::Draft);
        assert!(settings.overrides().is_empty());
    }

    #[test]
    fn test_undefined_key_is_error() {
        let settings = Settings::new();
        assert!(matches!(
            settings.get("font_size"),
            Err(CrypticError::UndefinedSetting(_))
        ));

        let mut settings = Settings::new();
        assert!(settings.set("font_size", 12i64).is_err());
    }

    #[test]
    fn test_illegal_value_is_error() {
        let mut settings = Settings::new();
        assert!(matches!(
            settings.set("clue_columns", 6i64),
            Err(CrypticError::InvalidSetting { .. })
        ));
        assert!(settings.set("status", "archived").is_err());
        assert!(settings.set("show_grid_border", "yes").is_err());
    }

    #[test]
    fn test_from_map() {
        let raw = json!({
            "clue_columns": 3,
            "show_enumerations": "entries",
            "show_grid_bars": false,
            "status": "published"
        });
        let settings = Settings::from_map(raw.as_object().unwrap()).unwrap();

        assert_eq!(settings.clue_columns(), 3);
        assert_eq!(settings.show_enumerations(), EnumerationMode::Entries);
        assert_eq!(settings.show_grid_bars(), BarVisibility::Hidden);
        assert_eq!(settings.status(), PuzzleStatus::Published);
        assert_eq!(settings.overrides().len(), 4);
    }

    #[test]
    fn test_from_map_rejects_wrong_type() {
        let raw = json!({ "clue_columns": 2.5 });
        assert!(Settings::from_map(raw.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_enumeration_mode_from_bool() {
        assert_eq!(
            EnumerationMode::from_setting(&SettingValue::Bool(true)),
            Some(EnumerationMode::Answers)
        );
        assert_eq!(
            EnumerationMode::from_setting(&SettingValue::Bool(false)),
            Some(EnumerationMode::Hidden)
        );
        assert!(!EnumerationMode::Hidden.is_shown());
    }
}
