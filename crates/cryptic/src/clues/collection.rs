//! Ordered collection of clue containers keyed by title.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::clue::Clue;
use super::container::{ClueContainer, GroupSettings, insert_entries};
use crate::error::{CrypticError, Result};
use crate::settings::Settings;
use crate::validation::ErrorSink;

/// All clue containers of a puzzle, in input order.
///
/// Titles need not be unique; every container is kept and lookups by title
/// return the first match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Clues {
    containers: Vec<ClueContainer>,
}

/// Iterator over `(title, container)` pairs.
pub type ContainerIter<'a> =
    std::iter::Map<std::slice::Iter<'a, ClueContainer>, fn(&ClueContainer) -> (&str, &ClueContainer)>;

impl Clues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the collection from the `clues` field of a puzzle record.
    ///
    /// Accepts either an object mapping titles to clue payloads or a list of
    /// group objects with `name`, `clues` and optional display settings.
    pub fn from_value(value: &Value, settings: &Settings, sink: &mut ErrorSink) -> Result<Self> {
        let mut clues = Self::new();
        match value {
            Value::Object(map) => {
                for (title, payload) in map {
                    let group = GroupSettings::default();
                    clues.push(ClueContainer::from_value(
                        title, payload, &group, settings, sink,
                    )?);
                }
            }
            Value::Array(groups) => {
                for group in groups {
                    clues.push(container_from_group(group, settings, sink)?);
                }
            }
            other => return Err(CrypticError::invalid_field("clues", "object or list", other)),
        }
        if clues.is_empty() {
            return Err(CrypticError::EmptyData("Puzzle has no clues".to_string()));
        }
        Ok(clues)
    }

    /// Append a container after the existing ones.
    pub fn push(&mut self, container: ClueContainer) {
        if self.get(container.title()).is_some() {
            log::debug!("Repeated clue container title: {}", container.title());
        }
        self.containers.push(container);
    }

    /// First container with the given title.
    pub fn get(&self, title: &str) -> Option<&ClueContainer> {
        self.containers.iter().find(|c| c.title() == title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut ClueContainer> {
        self.containers.iter_mut().find(|c| c.title() == title)
    }

    /// Containers in input order.
    pub fn containers(&self) -> &[ClueContainer] {
        &self.containers
    }

    /// Iterate over `(title, container)` pairs in order.
    pub fn iter(&self) -> ContainerIter<'_> {
        fn pair(container: &ClueContainer) -> (&str, &ClueContainer) {
            (container.title(), container)
        }
        self.containers
            .iter()
            .map(pair as fn(&ClueContainer) -> (&str, &ClueContainer))
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.containers.iter().map(ClueContainer::title)
    }

    /// Every clue across all containers.
    pub fn all(&self) -> impl Iterator<Item = &Clue> {
        self.containers.iter().flat_map(ClueContainer::iter)
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn answers(&self) -> Vec<String> {
        self.all().flat_map(|c| c.answers().iter().cloned()).collect()
    }

    pub fn solutions(&self) -> Vec<String> {
        self.all().flat_map(|c| c.solutions().iter().cloned()).collect()
    }

    /// Combined entry map across containers. The first clue to claim an
    /// entry keeps it; later claims are logged.
    pub fn entries(&self) -> IndexMap<String, &Clue> {
        let mut entries = IndexMap::new();
        for clue in self.all() {
            insert_entries(&mut entries, clue);
        }
        entries
    }

    pub fn has_starred_clues(&self) -> bool {
        self.containers.iter().any(ClueContainer::has_starred_clues)
    }

    /// Titles with their options paired with the clue lines as a text block,
    /// one pair per container.
    pub fn to_text_map(&self) -> Vec<(String, String)> {
        self.containers
            .iter()
            .map(|c| (c.full_title(), c.clue_lines().join("\n")))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Clues {
    type Item = (&'a str, &'a ClueContainer);
    type IntoIter = ContainerIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn container_from_group(
    group: &Value,
    settings: &Settings,
    sink: &mut ErrorSink,
) -> Result<ClueContainer> {
    let Value::Object(map) = group else {
        return Err(CrypticError::invalid_field("clues[]", "object", group));
    };
    let title = match map.get("name") {
        Some(Value::String(name)) => name.as_str(),
        Some(other) => return Err(CrypticError::invalid_field("clues[].name", "string", other)),
        None => return Err(CrypticError::MissingField("clues[].name".to_string())),
    };
    let empty = Value::Null;
    let payload = map.get("clues").unwrap_or(&empty);
    let options: GroupSettings = serde_json::from_value(group.clone())?;
    ClueContainer::from_value(title, payload, &options, settings, sink)
}
