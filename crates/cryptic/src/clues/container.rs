//! A titled group of clues sharing display options.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::clue::{Clue, ClueInput, ClueOptions};
use crate::error::{CrypticError, Result};
use crate::settings::{EnumerationMode, SettingValue, Settings};
use crate::validation::ErrorSink;

/// Separates a container title from its option list.
const OPTION_SEPARATOR: &str = " ~ ";

/// Option token accepted after a container title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerOption {
    NoEnumerations,
    NoGridEntries,
    NoGridLabels,
}

impl ContainerOption {
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "no-enumerations" => Ok(ContainerOption::NoEnumerations),
            "no-grid-entries" => Ok(ContainerOption::NoGridEntries),
            "no-grid-labels" => Ok(ContainerOption::NoGridLabels),
            other => Err(CrypticError::InvalidContainerOption(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerOption::NoEnumerations => "no-enumerations",
            ContainerOption::NoGridEntries => "no-grid-entries",
            ContainerOption::NoGridLabels => "no-grid-labels",
        }
    }
}

impl fmt::Display for ContainerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a container title into the bare title and its option tokens.
pub fn parse_title(title: &str) -> Result<(String, Vec<ContainerOption>)> {
    let Some((title, options)) = title.split_once(OPTION_SEPARATOR) else {
        return Ok((title.trim().to_string(), Vec::new()));
    };
    let options = options
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ContainerOption::parse)
        .collect::<Result<Vec<_>>>()?;
    Ok((title.trim().to_string(), options))
}

/// Display settings given alongside a group of clues.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    pub show_enumerations: Option<SettingValue>,
    pub show_grid_entries: Option<bool>,
    pub show_grid_labels: Option<bool>,
    pub reverse_grid_entries: Option<bool>,
}

/// Titled, ordered group of clues.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClueContainer {
    title: String,
    clues: Vec<Clue>,
    show_enumerations: Option<EnumerationMode>,
    show_grid_entries: bool,
    show_grid_labels: Option<bool>,
    reverse_entries: bool,
    #[serde(skip)]
    puzzle_enumerations: EnumerationMode,
    #[serde(skip)]
    puzzle_grid_labels: bool,
}

impl ClueContainer {
    /// Create an empty container. Options in the title are applied.
    pub fn new(title: &str, settings: &Settings) -> Result<Self> {
        let mut container = Self::untitled(settings);
        container.set_title(title)?;
        Ok(container)
    }

    fn untitled(settings: &Settings) -> Self {
        Self {
            title: String::new(),
            clues: Vec::new(),
            show_enumerations: None,
            show_grid_entries: true,
            show_grid_labels: None,
            reverse_entries: false,
            puzzle_enumerations: settings.show_enumerations(),
            puzzle_grid_labels: settings.show_grid_labels(),
        }
    }

    /// Build a container from a clue payload: a text block with one clue per
    /// line, or a list of clue lines and records.
    ///
    /// Group settings are applied before title options, so an option in the
    /// title always wins.
    pub fn from_value(
        title: &str,
        payload: &Value,
        group: &GroupSettings,
        settings: &Settings,
        sink: &mut ErrorSink,
    ) -> Result<Self> {
        let mut container = Self::untitled(settings);
        container.apply_group(group)?;
        container.set_title(title)?;

        for input in parse_payload(title, payload)? {
            container.push(input, sink);
        }
        log::debug!(
            "clue container '{}' holds {} clues",
            container.title,
            container.clues.len()
        );
        Ok(container)
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        let (title, options) = parse_title(title)?;
        for option in options {
            match option {
                ContainerOption::NoEnumerations => {
                    self.show_enumerations = Some(EnumerationMode::Hidden)
                }
                ContainerOption::NoGridEntries => self.show_grid_entries = false,
                ContainerOption::NoGridLabels => self.show_grid_labels = Some(false),
            }
        }
        self.title = title;
        self.refresh();
        Ok(())
    }

    fn apply_group(&mut self, group: &GroupSettings) -> Result<()> {
        if let Some(value) = &group.show_enumerations {
            Settings::validate("show_enumerations", value)?;
            self.show_enumerations = EnumerationMode::from_setting(value);
        }
        if let Some(show) = group.show_grid_entries {
            self.show_grid_entries = show;
        }
        if let Some(show) = group.show_grid_labels {
            self.show_grid_labels = Some(show);
        }
        if let Some(reverse) = group.reverse_grid_entries {
            self.reverse_entries = reverse;
        }
        self.refresh();
        Ok(())
    }

    /// Parse and append one clue.
    pub fn push(&mut self, input: ClueInput, sink: &mut ErrorSink) -> &Clue {
        let clue = Clue::from_input(input, self.clue_options(), sink);
        self.clues.push(clue);
        &self.clues[self.clues.len() - 1]
    }

    /// Options every clue in the container inherits.
    pub fn clue_options(&self) -> ClueOptions {
        ClueOptions {
            show_enumeration: self.show_enumerations.unwrap_or(self.puzzle_enumerations),
            show_grid_entry: self.show_grid_entries,
            show_grid_label: self.show_grid_labels.unwrap_or(self.puzzle_grid_labels),
            reverse_entries: self.reverse_entries,
        }
    }

    fn refresh(&mut self) {
        let options = self.clue_options();
        for clue in &mut self.clues {
            clue.set_options(options);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    /// Iterate over the clues in order. Each call starts a fresh pass.
    pub fn iter(&self) -> std::slice::Iter<'_, Clue> {
        self.clues.iter()
    }

    pub fn len(&self) -> usize {
        self.clues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clues.is_empty()
    }

    /// First clue with the given public name.
    pub fn get(&self, name: &str) -> Option<&Clue> {
        self.clues.iter().find(|clue| clue.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Clue> {
        self.clues.iter_mut().find(|clue| clue.name() == name)
    }

    pub fn has_starred_clues(&self) -> bool {
        self.clues.iter().any(Clue::is_starred)
    }

    pub fn show_enumerations(&self) -> EnumerationMode {
        self.clue_options().show_enumeration
    }

    pub fn show_grid_entries(&self) -> bool {
        self.show_grid_entries
    }

    pub fn show_grid_labels(&self) -> bool {
        self.clue_options().show_grid_label
    }

    pub fn reverse_entries(&self) -> bool {
        self.reverse_entries
    }

    pub fn enable_enumeration(&mut self, mode: EnumerationMode) {
        self.show_enumerations = Some(mode);
        self.refresh();
    }

    pub fn disable_enumeration(&mut self) {
        self.show_enumerations = Some(EnumerationMode::Hidden);
        self.refresh();
    }

    pub fn disable_grid_entries(&mut self) {
        self.show_grid_entries = false;
        self.refresh();
    }

    pub fn enable_grid_labels(&mut self) {
        self.show_grid_labels = Some(true);
        self.refresh();
    }

    pub fn disable_grid_labels(&mut self) {
        self.show_grid_labels = Some(false);
        self.refresh();
    }

    pub fn set_reverse_entries(&mut self, reverse: bool) {
        self.reverse_entries = reverse;
        self.refresh();
    }

    /// Map of grid entry to the clue that owns it.
    ///
    /// When two clues claim the same entry the first keeps it and a warning
    /// is logged.
    pub fn entries(&self) -> IndexMap<String, &Clue> {
        let mut entries = IndexMap::new();
        for clue in &self.clues {
            insert_entries(&mut entries, clue);
        }
        entries
    }

    /// Title options currently in effect, sorted.
    pub fn options(&self) -> Vec<ContainerOption> {
        let mut options = Vec::new();
        if self.show_enumerations == Some(EnumerationMode::Hidden) {
            options.push(ContainerOption::NoEnumerations);
        }
        if !self.show_grid_entries {
            options.push(ContainerOption::NoGridEntries);
        }
        if self.show_grid_labels == Some(false) {
            options.push(ContainerOption::NoGridLabels);
        }
        options.sort();
        options
    }

    /// Title followed by its options, as written in a clues mapping.
    pub fn full_title(&self) -> String {
        let options = self.options();
        if options.is_empty() {
            return self.title.clone();
        }
        let tokens: Vec<&str> = options.iter().map(ContainerOption::as_str).collect();
        format!("{}{}{}", self.title, OPTION_SEPARATOR, tokens.join(", "))
    }

    /// One clue line per clued clue.
    pub fn clue_lines(&self) -> Vec<String> {
        self.clues
            .iter()
            .filter(|clue| !clue.is_unclued())
            .map(Clue::to_text)
            .collect()
    }

    /// Title line followed by the indented clue lines.
    pub fn to_text(&self) -> String {
        let mut output = format!("{}:", self.full_title());
        for line in self.clue_lines() {
            output.push_str("\n  ");
            output.push_str(&line);
        }
        output
    }
}

impl<'a> IntoIterator for &'a ClueContainer {
    type Item = &'a Clue;
    type IntoIter = std::slice::Iter<'a, Clue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Add a clue's entries to a map, keeping earlier owners.
pub(crate) fn insert_entries<'a>(entries: &mut IndexMap<String, &'a Clue>, clue: &'a Clue) {
    for entry in clue.entries() {
        match entries.get(&entry) {
            Some(existing) => log::warn!(
                "Duplicate entry {} in clues {} and {}",
                entry,
                existing.name(),
                clue.name()
            ),
            None => {
                entries.insert(entry, clue);
            }
        }
    }
}

fn parse_payload(title: &str, payload: &Value) -> Result<Vec<ClueInput>> {
    match payload {
        Value::Null => Ok(Vec::new()),
        Value::String(text) => Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| ClueInput::Line(line.to_string()))
            .collect()),
        Value::Array(items) => items.iter().map(ClueInput::from_value).collect(),
        other => Err(CrypticError::invalid_field(
            format!("clues.{}", title),
            "string or list",
            other,
        )),
    }
}
