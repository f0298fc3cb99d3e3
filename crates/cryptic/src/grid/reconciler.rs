//! Builds the cell matrix from the row and column encodings of a grid.
//!
//! The two encodings describe the same grid and each is the transpose of the
//! other. Reconciliation runs as a fixed sequence of stages:
//!
//! 1. **Normalize** both encodings (drop useless bars, pad short lines)
//! 2. **Place cells**, checking every coordinate against both encodings
//! 3. **Resolve labels** from the clue entries found in the grid
//! 4. **Apply styles** from the style matrix and named style table
//!
//! Inconsistencies are recorded in the [`ErrorSink`]; only an empty grid is
//! fatal.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::cell::{BAR, Bars, Cell, EMPTY, StyleSet};
use super::entries::{Direction, GridWord, extract_line, extract_words, words_by_text};
use super::style::{StyleTable, pad_style_rows, parse_style_rows};
use crate::error::{CrypticError, Result};
use crate::validation::{ErrorCategory, ErrorSink};

/// Raw grid description as found in a puzzle record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridInput {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub styles: IndexMap<String, StyleSet>,
}

impl GridInput {
    /// Create an input from row and column encodings without styles.
    pub fn new<S: Into<String>>(
        rows: impl IntoIterator<Item = S>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
            columns: columns.into_iter().map(Into::into).collect(),
            style: Vec::new(),
            styles: IndexMap::new(),
        }
    }

    /// Attach a style matrix.
    pub fn with_style<S: Into<String>>(mut self, style: impl IntoIterator<Item = S>) -> Self {
        self.style = style.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a named style.
    pub fn with_named_style(mut self, token: impl Into<String>, styles: StyleSet) -> Self {
        self.styles.insert(token.into(), styles);
        self
    }
}

/// Where the reconciler has got to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridStage {
    Unparsed,
    Normalized,
    CellsPlaced,
    LabelsResolved,
    StylesApplied,
    Validated,
}

/// What the grid needs to know about the clue behind an entry.
pub trait LabelSource {
    /// Label to show in the entry's leading cell.
    fn label(&self) -> &str;
    /// Whether the label should appear in the grid at all.
    fn show_grid_label(&self) -> bool;
    /// Whether the entry is written backwards, putting the label on its last cell.
    fn reverse_entries(&self) -> bool;
}

/// Bar and border flags for one cell, after inference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEdges {
    pub bars: Bars,
    pub borders: Bars,
}

/// A reconciled crossword grid.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: Vec<String>,
    columns: Vec<String>,
    style: Vec<String>,
    styles: StyleTable,
    cells: Vec<Vec<Cell>>,
    show_border: bool,
    stage: GridStage,
}

impl Grid {
    /// Reconcile a grid from its encodings.
    ///
    /// `labels` maps entry text to the clue that owns it; `show_border` enables
    /// bar and border inference at the edges of valued cells.
    pub fn build<L: LabelSource + ?Sized>(
        input: GridInput,
        labels: &IndexMap<String, &L>,
        show_border: bool,
        sink: &mut ErrorSink,
    ) -> Result<Self> {
        if input.rows.is_empty() {
            return Err(CrypticError::EmptyData("Grid has no rows".to_string()));
        }
        if input.columns.is_empty() {
            return Err(CrypticError::EmptyData("Grid has no columns".to_string()));
        }

        let mut grid = Self {
            rows: input.rows,
            columns: input.columns,
            style: input.style,
            styles: StyleTable::new(input.styles),
            cells: Vec::new(),
            show_border,
            stage: GridStage::Unparsed,
        };

        grid.normalize();
        grid.place_cells(sink);
        grid.resolve_labels(labels, sink);
        grid.apply_styles(sink);
        Ok(grid)
    }

    // =========================================================================
    // Stages
    // =========================================================================

    fn advance(&mut self, stage: GridStage) {
        log::debug!("grid stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    fn normalize(&mut self) {
        let width = self.width();
        let height = self.height();
        self.rows = self
            .rows
            .iter()
            .map(|line| normalize_line(line, width))
            .collect();
        self.columns = self
            .columns
            .iter()
            .map(|line| normalize_line(line, height))
            .collect();
        self.advance(GridStage::Normalized);
    }

    fn place_cells(&mut self, sink: &mut ErrorSink) {
        let width = self.width();
        let height = self.height();
        let mut slots: Vec<Vec<Option<Cell>>> = vec![vec![None; width]; height];

        for direction in [Direction::Across, Direction::Down] {
            let lines = match direction {
                Direction::Across => &self.rows,
                Direction::Down => &self.columns,
            };
            for (b, line) in lines.iter().enumerate() {
                place_line(&mut slots, line, b, direction, sink);
            }
        }

        self.cells = slots
            .into_iter()
            .enumerate()
            .map(|(row, cols)| {
                cols.into_iter()
                    .enumerate()
                    .map(|(col, slot)| slot.unwrap_or_else(|| Cell::new(row, col, EMPTY)))
                    .collect()
            })
            .collect();
        self.advance(GridStage::CellsPlaced);
    }

    fn resolve_labels<L: LabelSource + ?Sized>(
        &mut self,
        labels: &IndexMap<String, &L>,
        sink: &mut ErrorSink,
    ) {
        let words = self.first_words();
        for word in &words {
            let Some(source) = labels.get(&word.text) else {
                continue;
            };
            if !source.show_grid_label() {
                continue;
            }
            let (row, col) = if source.reverse_entries() {
                word.end()
            } else {
                word.start()
            };
            let Some(cell) = self.cell_mut(row, col) else {
                continue;
            };
            let label = source.label();
            match cell.label() {
                None => cell.set_label(label),
                Some(existing) if existing != label => sink.record(
                    ErrorCategory::CellLabel,
                    format!(
                        "Duplicate cell label at ({}, {}): {} != {}",
                        col, row, existing, label
                    ),
                ),
                Some(_) => {}
            }
        }
        self.advance(GridStage::LabelsResolved);
    }

    fn apply_styles(&mut self, sink: &mut ErrorSink) {
        self.style = pad_style_rows(&self.style, self.width(), self.height());
        let tokens = parse_style_rows(&self.style, sink);

        for token in tokens {
            let Some(assignment) = self.styles.resolve(&token.token) else {
                continue;
            };
            let Some(cell) = self.cell_mut(token.y, token.x) else {
                sink.record(
                    ErrorCategory::GridStyle,
                    format!(
                        "Style cell ({}, {}) not found: {}",
                        token.x, token.y, token.token
                    ),
                );
                continue;
            };
            if let Some(default) = assignment.default {
                cell.set_default_value(default);
            }
            if assignment.styles.is_empty() {
                continue;
            }
            let previous = cell.styles().clone();
            if !cell.apply_styles(assignment.styles) {
                log::warn!(
                    "Mismatched styles for {}, {}: {:?} != {:?}",
                    token.x,
                    token.y,
                    cell.styles(),
                    previous
                );
            }
        }
        self.advance(GridStage::StylesApplied);
    }

    pub(crate) fn mark_validated(&mut self) {
        self.advance(GridStage::Validated);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn stage(&self) -> GridStage {
        self.stage
    }

    /// Normalized row encoding.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Normalized column encoding.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Style matrix padded to the grid dimensions.
    pub fn style(&self) -> &[String] {
        &self.style
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Cells row by row.
    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Across words followed by down words, read from the encodings.
    pub fn words(&self) -> Vec<GridWord> {
        let mut words = extract_words(&self.rows, Direction::Across);
        words.extend(extract_words(&self.columns, Direction::Down));
        words
    }

    /// Words of every line with repeats within the same line dropped, so a
    /// word written twice in one line keeps only its first position.
    fn first_words(&self) -> Vec<GridWord> {
        let across = self.rows.iter().enumerate().map(|(i, line)| (i, line, Direction::Across));
        let down = self.columns.iter().enumerate().map(|(i, line)| (i, line, Direction::Down));
        across
            .chain(down)
            .flat_map(|(index, line, direction)| {
                words_by_text(&extract_line(line, index, direction)).into_values()
            })
            .collect()
    }

    /// Entry texts of every word in the grid.
    pub fn entries(&self) -> Vec<String> {
        self.words().into_iter().map(|w| w.text).collect()
    }

    /// Words read back from the reconciled cells rather than the encodings.
    pub fn cell_words(&self, direction: Direction) -> Vec<String> {
        let mut words = Vec::new();
        let (outer, inner) = match direction {
            Direction::Across => (self.height(), self.width()),
            Direction::Down => (self.width(), self.height()),
        };

        for a in 0..outer {
            let mut current = String::new();
            let mut count = 0;
            for b in 0..inner {
                let (row, col) = match direction {
                    Direction::Across => (a, b),
                    Direction::Down => (b, a),
                };
                let cell = &self.cells[row][col];
                let bars = cell.bars();
                let (bar_before, bar_after) = match direction {
                    Direction::Across => (bars.left, bars.right),
                    Direction::Down => (bars.top, bars.bottom),
                };
                if !cell.is_playable() || bar_before {
                    flush_word(&mut words, &mut current, &mut count);
                }
                if !cell.is_playable() {
                    continue;
                }
                current.push_str(cell.value().unwrap_or_default());
                count += 1;
                if bar_after {
                    flush_word(&mut words, &mut current, &mut count);
                }
            }
            flush_word(&mut words, &mut current, &mut count);
        }
        words
    }

    /// Bars and borders of a cell, including inferred ones when the grid
    /// border is enabled.
    pub fn edges(&self, row: usize, col: usize) -> Option<CellEdges> {
        let cell = self.cell(row, col)?;
        let explicit = cell.bars();
        let valued = cell.has_value();
        let solid = valued || cell.is_block();

        let top = row.checked_sub(1).and_then(|r| self.cell(r, col));
        let bottom = self.cell(row + 1, col);
        let left = col.checked_sub(1).and_then(|c| self.cell(row, c));
        let right = self.cell(row, col + 1);

        let differs = |other: Option<&Cell>| other.is_some_and(|o| valued != o.has_value());
        let opens_onto = |other: Option<&Cell>| valued && other.is_some_and(|o| !o.has_value());

        if !self.show_border {
            return Some(CellEdges {
                bars: explicit,
                borders: Bars::default(),
            });
        }

        let bars = Bars {
            top: explicit.top || differs(top),
            bottom: explicit.bottom || opens_onto(bottom),
            left: explicit.left || differs(left),
            right: explicit.right || differs(right),
        };
        let borders = Bars {
            top: (row == 0 && solid) || opens_onto(top),
            bottom: (row + 1 == self.height() && solid) || opens_onto(bottom),
            left: (col == 0 && solid) || opens_onto(left),
            right: (col + 1 == self.width() && solid) || opens_onto(right),
        };
        Some(CellEdges { bars, borders })
    }

    /// The grid as a record: normalized encodings, style matrix and the
    /// puzzle's own named styles.
    pub fn to_record(&self) -> GridInput {
        GridInput {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            style: self.style.clone(),
            styles: self.styles.named().clone(),
        }
    }
}

fn flush_word(words: &mut Vec<String>, current: &mut String, count: &mut usize) {
    if *count >= 2 {
        words.push(std::mem::take(current));
    }
    current.clear();
    *count = 0;
}

/// Trim a line, drop bars at either end or next to an empty cell, and pad it
/// with empty cells to `length` cells.
fn normalize_line(line: &str, length: usize) -> String {
    let chars: Vec<char> = line.trim().chars().collect();
    let last = chars.len().saturating_sub(1);
    let mut normalized = String::with_capacity(chars.len());
    let mut cells = 0;

    for (i, &c) in chars.iter().enumerate() {
        if c == BAR {
            if i == 0 || i == last {
                continue;
            }
            if chars[i - 1] == EMPTY || chars[i + 1] == EMPTY {
                continue;
            }
        } else {
            cells += 1;
        }
        normalized.push(c);
    }
    while cells < length {
        normalized.push(EMPTY);
        cells += 1;
    }
    normalized
}

/// Place (or reconcile) the cells of one encoded line.
fn place_line(
    slots: &mut [Vec<Option<Cell>>],
    line: &str,
    index: usize,
    direction: Direction,
    sink: &mut ErrorSink,
) {
    let height = slots.len();
    let width = slots.first().map_or(0, Vec::len);
    let chars: Vec<char> = line.chars().collect();
    let mut position = 0;

    for (n, &c) in chars.iter().enumerate() {
        if c == BAR {
            continue;
        }
        let (row, col) = match direction {
            Direction::Across => (index, position),
            Direction::Down => (position, index),
        };
        position += 1;

        if row >= height || col >= width {
            sink.record(
                ErrorCategory::CellValue,
                format!(
                    "Cell ({}, {}) is outside the {}x{} grid: {}",
                    col, row, width, height, c
                ),
            );
            continue;
        }

        let slot = &mut slots[row][col];
        let placed = slot.is_some();
        let cell = slot.get_or_insert_with(|| Cell::new(row, col, c));
        if placed {
            let previous = cell.symbol();
            if !cell.reconcile(c) {
                sink.record(
                    ErrorCategory::CellValue,
                    format!(
                        "Cell value mismatch at ({}, {}): {} != {}",
                        col, row, previous, c
                    ),
                );
            }
        }

        let bar_before = n > 0 && chars[n - 1] == BAR;
        let bar_after = chars.get(n + 1) == Some(&BAR);
        match direction {
            Direction::Across => {
                if bar_before {
                    cell.set_left_bar();
                }
                if bar_after {
                    cell.set_right_bar();
                }
            }
            Direction::Down => {
                if bar_before {
                    cell.set_top_bar();
                }
                if bar_after {
                    cell.set_bottom_bar();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestLabel {
        label: &'static str,
        show: bool,
        reverse: bool,
    }

    impl LabelSource for TestLabel {
        fn label(&self) -> &str {
            self.label
        }
        fn show_grid_label(&self) -> bool {
            self.show
        }
        fn reverse_entries(&self) -> bool {
            self.reverse
        }
    }

    fn label(label: &'static str) -> TestLabel {
        TestLabel {
            label,
            show: true,
            reverse: false,
        }
    }

    fn build(input: GridInput, labels: &IndexMap<String, &TestLabel>) -> (Grid, ErrorSink) {
        let mut sink = ErrorSink::new();
        let grid = Grid::build(input, labels, false, &mut sink).unwrap();
        (grid, sink)
    }

    fn no_labels() -> IndexMap<String, &'static TestLabel> {
        IndexMap::new()
    }

    #[test]
    fn test_normalize_line() {
        assert_eq!(normalize_line("|AB|C|", 3), "AB|C");
        assert_eq!(normalize_line("A_|B", 4), "A_B_");
        assert_eq!(normalize_line("  AB  ", 3), "AB_");
        assert_eq!(normalize_line("A|B", 3), "A|B_");
    }

    #[test]
    fn test_consistent_grid() {
        let input = GridInput::new(["ABC", "DEF", "GHI"], ["ADG", "BEH", "CFI"]);
        let (grid, sink) = build(input, &no_labels());

        assert!(sink.is_empty());
        assert_eq!(grid.stage(), GridStage::StylesApplied);
        assert_eq!((grid.width(), grid.height()), (3, 3));
        assert_eq!(grid.cell(1, 2).unwrap().value(), Some("F"));
        assert!(grid.cells().iter().flatten().all(|c| c.is_playable()));
    }

    #[test]
    fn test_mismatch_is_recorded_and_merged() {
        let input = GridInput::new(["AB"], ["A", "C"]);
        let (grid, sink) = build(input, &no_labels());

        assert_eq!(sink.count(ErrorCategory::CellValue), 1);
        assert_eq!(grid.cell(0, 1).unwrap().value(), Some("B C"));
    }

    #[test]
    fn test_short_lines_are_padded() {
        let input = GridInput::new(["AB", "C"], ["AC", "B"]);
        let (grid, sink) = build(input, &no_labels());

        assert!(sink.is_empty());
        assert!(grid.cell(1, 1).unwrap().is_blank());
        assert_eq!(grid.columns()[1], "B_");
    }

    #[test]
    fn test_overlong_line_is_recorded() {
        let input = GridInput::new(["ABC"], ["A", "B"]);
        let (_, sink) = build(input, &no_labels());
        assert!(sink.has(ErrorCategory::CellValue));
    }

    #[test]
    fn test_empty_grid_is_fatal() {
        let mut sink = ErrorSink::new();
        let input = GridInput::new(Vec::<String>::new(), vec!["A".to_string()]);
        assert!(Grid::build(input, &no_labels(), false, &mut sink).is_err());
    }

    #[test]
    fn test_bars_from_both_encodings() {
        // row 0 is split after column 0; column 1 is split after row 0
        let input = GridInput::new(["A|B", "CD"], ["AC", "B|D"]);
        let (grid, sink) = build(input, &no_labels());

        assert!(sink.is_empty());
        assert!(grid.cell(0, 0).unwrap().bars().right);
        assert!(grid.cell(0, 1).unwrap().bars().left);
        assert!(grid.cell(0, 1).unwrap().bars().bottom);
        assert!(grid.cell(1, 1).unwrap().bars().top);
        assert_eq!(grid.cell_words(Direction::Across), vec!["CD"]);
        assert_eq!(grid.cell_words(Direction::Down), vec!["AC"]);
    }

    #[test]
    fn test_labels_assigned_at_start() {
        let one = label("1");
        let two = label("2");
        let mut labels: IndexMap<String, &TestLabel> = IndexMap::new();
        labels.insert("AB".to_string(), &one);
        labels.insert("BD".to_string(), &two);

        let input = GridInput::new(["AB", "#D"], ["A#", "BD"]);
        let (grid, sink) = build(input, &labels);

        assert!(sink.is_empty());
        assert_eq!(grid.cell(0, 0).unwrap().label(), Some("1"));
        assert_eq!(grid.cell(0, 1).unwrap().label(), Some("2"));
    }

    #[test]
    fn test_conflicting_label_keeps_first() {
        let one = label("1");
        let two = label("2");
        let mut labels: IndexMap<String, &TestLabel> = IndexMap::new();
        labels.insert("AB".to_string(), &one);
        labels.insert("AC".to_string(), &two);

        let input = GridInput::new(["AB", "C#"], ["AC", "B#"]);
        let (grid, sink) = build(input, &labels);

        assert_eq!(sink.count(ErrorCategory::CellLabel), 1);
        assert_eq!(grid.cell(0, 0).unwrap().label(), Some("1"));
    }

    #[test]
    fn test_repeated_word_in_line_labels_first_only() {
        let one = label("1");
        let mut labels: IndexMap<String, &TestLabel> = IndexMap::new();
        labels.insert("AB".to_string(), &one);

        let input = GridInput::new(["AB#AB"], ["A", "B", "#", "A", "B"]);
        let (grid, sink) = build(input, &labels);

        assert!(!sink.has(ErrorCategory::CellLabel));
        assert_eq!(grid.cell(0, 0).unwrap().label(), Some("1"));
        assert_eq!(grid.cell(0, 3).unwrap().label(), None);
        assert_eq!(grid.entries(), ["AB", "AB"]);
    }

    #[test]
    fn test_reversed_entry_labels_last_cell() {
        let source = TestLabel {
            label: "5",
            show: true,
            reverse: true,
        };
        let hidden = TestLabel {
            label: "6",
            show: false,
            reverse: false,
        };
        let mut labels: IndexMap<String, &TestLabel> = IndexMap::new();
        labels.insert("ABC".to_string(), &source);
        labels.insert("AD".to_string(), &hidden);

        let input = GridInput::new(["ABC", "D##"], ["AD", "B#", "C#"]);
        let (grid, _) = build(input, &labels);

        assert_eq!(grid.cell(0, 2).unwrap().label(), Some("5"));
        assert_eq!(grid.cell(0, 0).unwrap().label(), None);
    }

    #[test]
    fn test_styles_applied() {
        let mut named = StyleSet::new();
        named.insert("default".to_string(), "?".to_string());
        named.insert("background-color".to_string(), "yellow".to_string());
        let input = GridInput::new(["AB", "CD"], ["AC", "BD"])
            .with_style(["O*", "_[12]"])
            .with_named_style("*", named);
        let (grid, sink) = build(input, &no_labels());

        assert!(sink.is_empty());
        assert_eq!(grid.cell(0, 0).unwrap().styles()["shape"], "circle");
        let starred = grid.cell(0, 1).unwrap();
        assert_eq!(starred.default_value(), Some("?"));
        assert_eq!(starred.shade_square(), Some("yellow"));
        assert!(!starred.styles().contains_key("default"));
        assert_eq!(grid.cell(1, 1).unwrap().default_value(), Some("12"));
        assert_eq!(grid.style().len(), 2);
    }

    #[test]
    fn test_style_outside_grid() {
        let input = GridInput::new(["AB"], ["A", "B"]).with_style(["__O"]);
        let (_, sink) = build(input, &no_labels());
        assert_eq!(sink.count(ErrorCategory::GridStyle), 1);
    }

    #[test]
    fn test_edges_with_border() {
        let input = GridInput::new(["A#", "BC"], ["AB", "#C"]);
        let mut sink = ErrorSink::new();
        let grid = Grid::build(input, &no_labels(), true, &mut sink).unwrap();

        let edges = grid.edges(0, 0).unwrap();
        assert!(edges.borders.top && edges.borders.left);
        assert!(edges.bars.right);
        assert!(edges.borders.right);

        let plain = Grid::build(
            GridInput::new(["A#", "BC"], ["AB", "#C"]),
            &no_labels(),
            false,
            &mut sink,
        )
        .unwrap();
        assert_eq!(plain.edges(0, 0).unwrap(), CellEdges::default());
    }
}
