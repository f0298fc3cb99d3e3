//! A single clue: the clue-line grammar, grid entries and enumerations.
//!
//! A clue line has the form
//!
//! ```text
//! *1|a;1a. Clue text (5) ~ ANSWER;OTHER|ENTRY;ENTRY ~ Explanation; more
//! ```
//!
//! where everything after the name is optional. Parsing tries the full
//! production first and falls back to shorter ones.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CrypticError, Result, json_type_name};
use crate::grid::LabelSource;
use crate::settings::EnumerationMode;
use crate::validation::{ErrorCategory, ErrorSink};

const STAR: char = '*';
const SUBHEADING_SEPARATOR: char = '|';
const LABEL_SEPARATOR: char = ';';
const LIST_SEPARATOR: char = ';';
const ENTRY_SEPARATOR: char = '|';

// =============================================================================
// GRAMMAR
// =============================================================================
// Tried in order; the first match wins.

static CLUE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // name. clue ~ answers ~ solution
        Regex::new(
            r"^(?P<name>[^.]+)\.\s*(?P<clue>.*?)\s*~\s*(?P<answer>[^~]*?)\s*~\s*(?P<solution>.*)$",
        )
        .unwrap(),
        // name. clue ~ answers
        Regex::new(r"^(?P<name>[^.]+)\.\s*(?P<clue>.*?)\s*~\s*(?P<answer>[^~]*)$").unwrap(),
        // name. clue
        Regex::new(r"^(?P<name>[^.]+)\.\s*(?P<clue>.+)$").unwrap(),
        // name.
        Regex::new(r"^(?P<name>[^.]+)\.$").unwrap(),
    ]
});

/// Display options a clue inherits from its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueOptions {
    pub show_enumeration: EnumerationMode,
    pub show_grid_entry: bool,
    pub show_grid_label: bool,
    pub reverse_entries: bool,
}

impl Default for ClueOptions {
    fn default() -> Self {
        Self {
            show_enumeration: EnumerationMode::Answers,
            show_grid_entry: true,
            show_grid_label: true,
            reverse_entries: false,
        }
    }
}

/// Clue names may be written as strings or bare numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClueName {
    Text(String),
    Number(i64),
}

impl ClueName {
    fn into_string(self) -> String {
        match self {
            ClueName::Text(s) => s,
            ClueName::Number(n) => n.to_string(),
        }
    }
}

/// Structured form of a clue.
///
/// Singular fields take precedence over their plural forms when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClueRecord {
    pub name: Option<ClueName>,
    pub clue: Option<String>,
    pub answer: Option<String>,
    pub answers: Vec<String>,
    pub entry: Option<String>,
    pub entries: Vec<String>,
    pub solution: Option<String>,
    pub explanation: Option<String>,
    pub solutions: Vec<String>,
    pub explanations: Vec<String>,
    pub unlabeled: Option<Value>,
}

/// A clue payload: either a clue-grammar line or a structured record.
#[derive(Debug, Clone, PartialEq)]
pub enum ClueInput {
    Line(String),
    Record(ClueRecord),
}

impl ClueInput {
    /// Classify a JSON clue payload.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(line) => Ok(ClueInput::Line(line.clone())),
            Value::Object(_) => serde_json::from_value(value.clone())
                .map(ClueInput::Record)
                .map_err(|e| CrypticError::InvalidClue(e.to_string())),
            other => Err(CrypticError::InvalidClue(format!(
                "expected a string or an object, found {}",
                json_type_name(other)
            ))),
        }
    }
}

/// A parsed clue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Clue {
    name: Option<String>,
    starred: bool,
    clue: Option<String>,
    answers: Vec<String>,
    entries: Vec<String>,
    solutions: Vec<String>,
    options: ClueOptions,
    show_enumeration: Option<EnumerationMode>,
    show_grid_entry: Option<bool>,
    show_grid_label: Option<bool>,
}

impl Clue {
    /// Parse a clue-grammar line. Returns `None` if no production matches.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let captures = CLUE_PATTERNS.iter().find_map(|re| re.captures(line))?;

        let mut clue = Self::default();
        clue.set_name(&captures["name"]);
        clue.clue = group(&captures, "clue").map(str::to_string);

        if let Some(answer) = group(&captures, "answer") {
            let (answers, entries) = match answer.split_once(ENTRY_SEPARATOR) {
                Some((answers, entries)) => (answers, entries),
                None => (answer, ""),
            };
            clue.answers = split_list(answers);
            clue.entries = split_list(entries);
        }
        if let Some(solution) = group(&captures, "solution") {
            clue.solutions = split_list(solution)
                .into_iter()
                .map(|s| s.replace("<i>", "\"").replace("</i>", "\""))
                .collect();
        }
        Some(clue)
    }

    /// Build a clue from a structured record.
    pub fn from_record(record: ClueRecord) -> Self {
        let mut clue = Self::default();
        if let Some(name) = record.name {
            clue.set_name(&name.into_string());
        }
        clue.clue = record.clue.filter(|c| !c.is_empty());
        clue.answers = first_non_empty(record.answer, record.answers);
        clue.entries = first_non_empty(record.entry, record.entries);

        clue.solutions = match record.solution.or(record.explanation) {
            Some(solution) if !solution.is_empty() => vec![solution],
            _ if record.solutions.is_empty() => record.explanations,
            _ => record.solutions,
        };
        if record.unlabeled.is_some() {
            clue.disable_grid_label();
        }
        clue
    }

    /// Build a clue from any payload, recording format problems in `sink`.
    pub fn from_input(input: ClueInput, options: ClueOptions, sink: &mut ErrorSink) -> Self {
        let mut clue = match input {
            ClueInput::Line(line) => match Self::parse(&line) {
                Some(clue) => clue,
                None => {
                    sink.record(
                        ErrorCategory::ClueFormat,
                        format!("Clue does not match expected format: {}", line.trim()),
                    );
                    return Self::default().with_options(options);
                }
            },
            ClueInput::Record(record) => Self::from_record(record),
        };
        clue.options = options;
        clue.validate(sink);
        clue
    }

    /// Replace the inherited display options.
    pub fn with_options(mut self, options: ClueOptions) -> Self {
        self.options = options;
        self
    }

    fn set_name(&mut self, name: &str) {
        let name = name.trim();
        let name = match name.strip_prefix(STAR) {
            Some(rest) => {
                self.starred = true;
                rest.trim_start()
            }
            None => name,
        };
        self.name = (!name.is_empty()).then(|| name.to_string());
    }

    // =========================================================================
    // Name
    // =========================================================================

    /// Public name, without subheading or display label.
    pub fn name(&self) -> &str {
        let name = self.name.as_deref().unwrap_or_default();
        let name = name.split(SUBHEADING_SEPARATOR).next().unwrap_or_default();
        name.split(LABEL_SEPARATOR).next().unwrap_or_default()
    }

    /// Name exactly as written, minus the star.
    pub fn raw_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Heading part of a `heading|subheading` name.
    pub fn heading(&self) -> Option<&str> {
        let raw = self.name.as_deref()?;
        raw.contains(SUBHEADING_SEPARATOR).then(|| self.name())
    }

    /// Subheading part of a `heading|subheading` name.
    pub fn subheading(&self) -> Option<&str> {
        let (_, rest) = self.name.as_deref()?.split_once(SUBHEADING_SEPARATOR)?;
        rest.split(LABEL_SEPARATOR).next()
    }

    /// Label shown in the grid: the `;` suffix of the name, or the name.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .and_then(|raw| raw.split_once(LABEL_SEPARATOR))
            .map(|(_, label)| label)
            .unwrap_or_else(|| self.name())
    }

    pub fn is_starred(&self) -> bool {
        self.starred
    }

    pub fn enable_star(&mut self) {
        self.starred = true;
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Clue text, absent for unclued entries.
    pub fn clue(&self) -> Option<&str> {
        self.clue.as_deref()
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Entries given explicitly after `|` in the answer field.
    pub fn explicit_entries(&self) -> &[String] {
        &self.entries
    }

    pub fn solutions(&self) -> &[String] {
        &self.solutions
    }

    /// True if the clue has neither a name nor clue text.
    pub fn is_unclued(&self) -> bool {
        self.name().is_empty() && self.clue.as_deref().is_none_or(str::is_empty)
    }

    /// Grid-facing entries.
    ///
    /// Explicit entries when given, otherwise the answers without spaces or
    /// hyphens; reversed character by character when the container reverses
    /// entries. Empty when grid entries are hidden.
    pub fn entries(&self) -> Vec<String> {
        if !self.show_grid_entry() {
            return Vec::new();
        }
        let base: Vec<String> = if self.entries.is_empty() {
            self.answers
                .iter()
                .map(|a| a.chars().filter(|c| *c != ' ' && *c != '-').collect())
                .collect()
        } else {
            self.entries.clone()
        };
        if self.options.reverse_entries {
            base.into_iter().map(|e| e.chars().rev().collect()).collect()
        } else {
            base
        }
    }

    /// Enumeration such as `3,5` or `4-3`, from the answers or the entries
    /// depending on the enumeration mode.
    pub fn enumeration(&self) -> String {
        let sources = match self.show_enumeration() {
            EnumerationMode::Entries => self.entries(),
            _ => self.answers.clone(),
        };
        sources
            .iter()
            .map(|s| enumerate(s))
            .collect::<Vec<_>>()
            .join(",")
    }

    // =========================================================================
    // Options
    // =========================================================================

    /// Options inherited from the container.
    pub fn options(&self) -> ClueOptions {
        self.options
    }

    pub fn set_options(&mut self, options: ClueOptions) {
        self.options = options;
    }

    pub fn set_reverse_entries(&mut self, reverse: bool) {
        self.options.reverse_entries = reverse;
    }

    pub fn show_enumeration(&self) -> EnumerationMode {
        self.show_enumeration
            .unwrap_or(self.options.show_enumeration)
    }

    pub fn enable_enumeration(&mut self, mode: EnumerationMode) {
        self.show_enumeration = Some(mode);
    }

    pub fn disable_enumeration(&mut self) {
        self.show_enumeration = Some(EnumerationMode::Hidden);
    }

    /// Own setting when one was made, otherwise the container's.
    pub fn show_grid_entry(&self) -> bool {
        self.show_grid_entry.unwrap_or(self.options.show_grid_entry)
    }

    pub fn enable_grid_entry(&mut self) {
        self.show_grid_entry = Some(true);
    }

    pub fn disable_grid_entry(&mut self) {
        self.show_grid_entry = Some(false);
    }

    pub fn show_grid_label(&self) -> bool {
        self.show_grid_label.unwrap_or(self.options.show_grid_label)
    }

    pub fn enable_grid_label(&mut self) {
        self.show_grid_label = Some(true);
    }

    pub fn disable_grid_label(&mut self) {
        self.show_grid_label = Some(false);
    }

    // =========================================================================
    // Serialisation
    // =========================================================================

    /// The clue line as stored, including the star and explicit entries.
    pub fn raw(&self) -> String {
        let star = if self.starred { "*" } else { "" };
        format_line(
            &format!("{}{}", star, self.name.as_deref().unwrap_or_default()),
            self.clue.as_deref().unwrap_or_default(),
            &self.answers,
            &self.entries,
            &self.solutions,
        )
    }

    /// The clue line with the public name and effective entries. Entries
    /// are left out when they are identical to the answers.
    pub fn to_text(&self) -> String {
        let entries = self.entries();
        let entries = if entries == self.answers {
            Vec::new()
        } else {
            entries
        };
        format_line(
            self.name(),
            self.clue.as_deref().unwrap_or_default(),
            &self.answers,
            &entries,
            &self.solutions,
        )
    }

    /// Record `clue_format` errors for missing fields. Unclued clues are
    /// exempt.
    pub fn validate(&self, sink: &mut ErrorSink) {
        if self.is_unclued() {
            return;
        }
        let clue = self.clue.as_deref().unwrap_or_default();
        if self.name().is_empty() {
            sink.record(
                ErrorCategory::ClueFormat,
                format!("Clue does not have a name: {}", clue),
            );
        }
        if clue.is_empty() {
            sink.record(
                ErrorCategory::ClueFormat,
                format!("Clue {} does not have a clue", self.name()),
            );
        }
        if self.answers.is_empty() {
            sink.record(
                ErrorCategory::ClueFormat,
                format!("Clue {} does not have an answer: {}", self.name(), clue),
            );
        }
        if self.solutions.is_empty() {
            sink.record(
                ErrorCategory::ClueFormat,
                format!("Clue {} does not have a solution: {}", self.name(), clue),
            );
        }
    }
}

impl LabelSource for Clue {
    fn label(&self) -> &str {
        Clue::label(self)
    }

    fn show_grid_label(&self) -> bool {
        Clue::show_grid_label(self)
    }

    fn reverse_entries(&self) -> bool {
        self.options.reverse_entries
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unclued() {
            return write!(f, "Unclued: {}", self.answers.join(", "));
        }
        let star = if self.starred { "*" } else { "" };
        write!(f, "{}{}. {}", star, self.name(), self.clue().unwrap_or_default())?;
        if self.show_enumeration().is_shown() {
            write!(f, " ({})", self.enumeration())?;
        }
        Ok(())
    }
}

/// Enumerate one answer: runs of letters become counts, spaces become
/// commas and any other character is kept as written.
pub fn enumerate(answer: &str) -> String {
    let mut output = String::new();
    let mut run = 0;
    for c in answer.chars() {
        if c.is_alphabetic() {
            run += 1;
        } else if c == ' ' {
            output.push_str(&format!("{},", run));
            run = 0;
        } else {
            output.push_str(&format!("{}{}", run, c));
            run = 0;
        }
    }
    output.push_str(&run.to_string());
    output
}

fn group<'h>(captures: &Captures<'h>, name: &str) -> Option<&'h str> {
    captures
        .name(name)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

fn split_list(text: &str) -> Vec<String> {
    text.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn first_non_empty(single: Option<String>, many: Vec<String>) -> Vec<String> {
    match single {
        Some(value) if !value.is_empty() => vec![value],
        _ => many,
    }
}

fn format_line(
    name: &str,
    clue: &str,
    answers: &[String],
    entries: &[String],
    solutions: &[String],
) -> String {
    let mut answer = answers.join(";");
    if !entries.is_empty() {
        answer.push(ENTRY_SEPARATOR);
        answer.push_str(&entries.join(";"));
    }
    format!("{}. {} ~ {} ~ {}", name, clue, answer, solutions.join(";"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Clue {
        Clue::parse(line).unwrap()
    }

    #[test]
    fn test_full_production() {
        let clue = parse("1. Frozen dessert (3,5) ~ ICE CREAM ~ Double definition; <i>chilly</i>");
        assert_eq!(clue.name(), "1");
        assert_eq!(clue.clue(), Some("Frozen dessert (3,5)"));
        assert_eq!(clue.answers(), ["ICE CREAM"]);
        assert_eq!(clue.entries(), vec!["ICECREAM"]);
        assert_eq!(clue.solutions(), ["Double definition", "\"chilly\""]);
        assert_eq!(clue.enumeration(), "3,5");
    }

    #[test]
    fn test_fallback_productions() {
        let clue = parse("2. Some clue ~ ANSWER");
        assert_eq!(clue.answers(), ["ANSWER"]);
        assert!(clue.solutions().is_empty());

        let clue = parse("3. Just the clue");
        assert_eq!(clue.clue(), Some("Just the clue"));
        assert!(clue.answers().is_empty());

        let clue = parse("4.");
        assert_eq!(clue.name(), "4");
        assert_eq!(clue.clue(), None);

        assert!(Clue::parse("no period here").is_none());
    }

    #[test]
    fn test_explicit_entries() {
        let clue = parse("5. Clue ~ WELL-OFF;ALT|WELLOFF;TLA ~ Sol");
        assert_eq!(clue.answers(), ["WELL-OFF", "ALT"]);
        assert_eq!(clue.explicit_entries(), ["WELLOFF", "TLA"]);
        assert_eq!(clue.entries(), vec!["WELLOFF", "TLA"]);
        assert_eq!(clue.enumeration(), "4-3,3");
    }

    #[test]
    fn test_name_grammar() {
        let clue = parse("*1|a;1a. Clue ~ ABC ~ Sol");
        assert!(clue.is_starred());
        assert_eq!(clue.name(), "1");
        assert_eq!(clue.heading(), Some("1"));
        assert_eq!(clue.subheading(), Some("a"));
        assert_eq!(clue.label(), "1a");
        assert_eq!(clue.raw_name(), Some("1|a;1a"));

        let plain = parse("12. Clue ~ ABC ~ Sol");
        assert_eq!(plain.heading(), None);
        assert_eq!(plain.subheading(), None);
        assert_eq!(plain.label(), "12");
    }

    #[test]
    fn test_enumerate() {
        assert_eq!(enumerate("ICE CREAM"), "3,5");
        assert_eq!(enumerate("WELL-OFF"), "4-3");
        assert_eq!(enumerate("ROCK 'N' ROLL"), "4,0'1'0,4");
        assert_eq!(enumerate(""), "0");
    }

    #[test]
    fn test_enumeration_from_entries() {
        let mut clue = parse("1. Clue ~ ICE CREAM|ICECREAM ~ Sol");
        clue.enable_enumeration(EnumerationMode::Entries);
        assert_eq!(clue.enumeration(), "8");
    }

    #[test]
    fn test_reverse_entries() {
        let mut clue = parse("1. Clue ~ ICE CREAM ~ Sol");
        clue.set_reverse_entries(true);
        assert_eq!(clue.entries(), vec!["MAERCECI"]);
        clue.set_reverse_entries(false);
        assert_eq!(clue.entries(), vec!["ICECREAM"]);
    }

    #[test]
    fn test_hidden_grid_entries() {
        let options = ClueOptions {
            show_grid_entry: false,
            ..ClueOptions::default()
        };
        let clue = parse("1. Clue ~ ABC ~ Sol").with_options(options);
        assert!(clue.entries().is_empty());
    }

    #[test]
    fn test_raw_and_text() {
        let line = "*7. Clue text ~ ONE;TWO|ENO;OWT ~ First;Second";
        let clue = parse(line);
        assert_eq!(clue.raw(), line);
        assert_eq!(clue.to_text(), "7. Clue text ~ ONE;TWO|ENO;OWT ~ First;Second");

        let clue = parse("8. Clue ~ NEW YORK ~ Sol");
        assert_eq!(clue.to_text(), "8. Clue ~ NEW YORK|NEWYORK ~ Sol");
    }

    #[test]
    fn test_record() {
        let value = serde_json::json!({
            "name": 9,
            "clue": "A clue",
            "answer": "FOO",
            "answers": ["IGNORED"],
            "explanation": "Because",
            "unlabeled": true,
        });
        let ClueInput::Record(record) = ClueInput::from_value(&value).unwrap() else {
            panic!("expected a record");
        };
        let clue = Clue::from_record(record);
        assert_eq!(clue.name(), "9");
        assert_eq!(clue.answers(), ["FOO"]);
        assert_eq!(clue.solutions(), ["Because"]);
        assert!(!clue.show_grid_label());
    }

    #[test]
    fn test_invalid_payload() {
        assert!(ClueInput::from_value(&serde_json::json!(42)).is_err());
        assert!(ClueInput::from_value(&serde_json::json!({"answers": "notalist"})).is_err());
    }

    #[test]
    fn test_validation() {
        let mut sink = ErrorSink::new();
        Clue::from_input(
            ClueInput::Line("1. Clue".to_string()),
            ClueOptions::default(),
            &mut sink,
        );
        assert_eq!(sink.count(ErrorCategory::ClueFormat), 2);

        let mut sink = ErrorSink::new();
        Clue::from_input(
            ClueInput::Line("garbage".to_string()),
            ClueOptions::default(),
            &mut sink,
        );
        assert_eq!(sink.count(ErrorCategory::ClueFormat), 1);

        let mut sink = ErrorSink::new();
        let unclued = ClueRecord {
            answer: Some("FOO".to_string()),
            ..ClueRecord::default()
        };
        let clue = Clue::from_input(ClueInput::Record(unclued), ClueOptions::default(), &mut sink);
        assert!(clue.is_unclued());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_grid_entry_override() {
        let hidden = ClueOptions {
            show_grid_entry: false,
            ..ClueOptions::default()
        };
        let mut clue = parse("1. Clue ~ ICE CREAM ~ Sol").with_options(hidden);
        assert!(clue.entries().is_empty());

        clue.enable_grid_entry();
        clue.set_options(hidden);
        assert_eq!(clue.entries(), ["ICECREAM"]);

        clue.disable_grid_entry();
        clue.set_options(ClueOptions::default());
        assert!(!clue.show_grid_entry());
        assert!(clue.entries().is_empty());
    }

    #[test]
    fn test_display() {
        let clue = parse("*3. Frozen dessert ~ ICE CREAM ~ Sol");
        assert_eq!(clue.to_string(), "*3. Frozen dessert (3,5)");

        let mut hidden = clue.clone();
        hidden.disable_enumeration();
        assert_eq!(hidden.to_string(), "*3. Frozen dessert");
    }
}
