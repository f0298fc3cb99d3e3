//! Extraction of across and down words from grid line encodings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::cell::{BAR, BLOCK, EMPTY, SPACER};

/// Reading direction of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Across,
    Down,
}

/// A word found in one grid line, with inclusive cell coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWord {
    pub text: String,
    pub direction: Direction,
    pub x1: usize,
    pub x2: usize,
    pub y1: usize,
    pub y2: usize,
}

impl GridWord {
    /// `(row, col)` of the first cell.
    pub fn start(&self) -> (usize, usize) {
        (self.y1, self.x1)
    }

    /// `(row, col)` of the last cell.
    pub fn end(&self) -> (usize, usize) {
        (self.y2, self.x2)
    }

    /// Number of cells the word covers.
    pub fn len(&self) -> usize {
        match self.direction {
            Direction::Across => self.x2 - self.x1 + 1,
            Direction::Down => self.y2 - self.y1 + 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// True for characters that end a word.
pub fn is_word_break(c: char) -> bool {
    matches!(c, BAR | BLOCK | EMPTY | SPACER)
}

/// Extract every word of two or more cells from a list of lines.
///
/// Lines are rows for [`Direction::Across`] and columns for
/// [`Direction::Down`]; the line index becomes the fixed coordinate.
pub fn extract_words<S: AsRef<str>>(lines: &[S], direction: Direction) -> Vec<GridWord> {
    lines
        .iter()
        .enumerate()
        .flat_map(|(index, line)| extract_line(line.as_ref(), index, direction))
        .collect()
}

/// Extract the words from a single line.
pub fn extract_line(line: &str, index: usize, direction: Direction) -> Vec<GridWord> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    // bars separate cells but do not occupy one
    let mut cell = 0;

    for c in line.chars() {
        if is_word_break(c) {
            push_word(&mut words, &mut current, start, index, direction);
            if c != BAR {
                cell += 1;
            }
            start = cell;
            continue;
        }
        if current.is_empty() {
            start = cell;
        }
        current.push(c);
        cell += 1;
    }
    push_word(&mut words, &mut current, start, index, direction);
    words
}

fn push_word(
    words: &mut Vec<GridWord>,
    current: &mut String,
    start: usize,
    index: usize,
    direction: Direction,
) {
    let text = std::mem::take(current);
    let len = text.chars().count();
    if len < 2 {
        return;
    }
    let end = start + len - 1;
    let (x1, x2, y1, y2) = match direction {
        Direction::Across => (start, end, index, index),
        Direction::Down => (index, index, start, end),
    };
    words.push(GridWord {
        text,
        direction,
        x1,
        x2,
        y1,
        y2,
    });
}

/// Index words by text. When the same text occurs more than once, the first
/// occurrence keeps its coordinates.
pub fn words_by_text(words: &[GridWord]) -> IndexMap<String, GridWord> {
    let mut map = IndexMap::new();
    for word in words {
        map.entry(word.text.clone()).or_insert_with(|| word.clone());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(words: &[GridWord]) -> Vec<&str> {
        words.iter().map(|w| w.text.as_str()).collect()
    }

    #[test]
    fn test_simple_rows() {
        let rows = ["ABC", "DEF"];
        let words = extract_words(&rows, Direction::Across);
        assert_eq!(texts(&words), vec!["ABC", "DEF"]);
        assert_eq!(words[1].start(), (1, 0));
        assert_eq!(words[1].end(), (1, 2));
    }

    #[test]
    fn test_blocks_and_single_letters() {
        let words = extract_line("A#BCD_E", 0, Direction::Across);
        assert_eq!(texts(&words), vec!["BCD"]);
        assert_eq!((words[0].x1, words[0].x2), (2, 4));
    }

    #[test]
    fn test_bar_splits_without_taking_a_cell() {
        let words = extract_line("AB|CDE", 3, Direction::Down);
        assert_eq!(texts(&words), vec!["AB", "CDE"]);
        assert_eq!(words[1].start(), (2, 3));
        assert_eq!(words[1].end(), (4, 3));
        assert_eq!(words[1].len(), 3);
    }

    #[test]
    fn test_spacer_breaks_words() {
        let words = extract_line("AB.CD", 0, Direction::Across);
        assert_eq!(texts(&words), vec!["AB", "CD"]);
        assert_eq!(words[1].x1, 3);
    }

    #[test]
    fn test_words_by_text_keeps_first() {
        let words = extract_line("AB#AB", 0, Direction::Across);
        assert_eq!(words.len(), 2);
        let map = words_by_text(&words);
        assert_eq!(map.len(), 1);
        assert_eq!(map["AB"].x1, 0);
    }
}
