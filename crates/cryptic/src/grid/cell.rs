//! Grid cell model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Marks a block (unplayable) cell.
pub const BLOCK: char = '#';
/// Marks an empty cell; also pads short lines.
pub const EMPTY: char = '_';
/// Separates two adjacent cells with a bar.
pub const BAR: char = '|';
/// Marks a spacer cell displayed as a single space.
pub const SPACER: char = '.';

/// Style key → style value for one cell.
pub type StyleSet = IndexMap<String, String>;

/// What a cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// A playable square holding a value.
    Letter,
    /// Unplayable square.
    Block,
    /// Nothing at all (padding or an intentionally empty square).
    Blank,
    /// A square displayed as a space.
    Spacer,
}

impl CellKind {
    fn from_symbol(symbol: char) -> Self {
        match symbol {
            BLOCK => CellKind::Block,
            EMPTY => CellKind::Blank,
            SPACER => CellKind::Spacer,
            _ => CellKind::Letter,
        }
    }

    /// Placeholders may be filled in by the orthogonal encoding.
    fn is_placeholder(&self) -> bool {
        matches!(self, CellKind::Blank | CellKind::Spacer)
    }
}

/// Explicit bar flags on the four edges of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bars {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

/// One grid square.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    row: usize,
    col: usize,
    kind: CellKind,
    value: Option<String>,
    bars: Bars,
    label: Option<String>,
    styles: StyleSet,
    default: Option<String>,
}

impl Cell {
    /// Create a cell from a grid-language symbol.
    pub fn new(row: usize, col: usize, symbol: char) -> Self {
        let kind = CellKind::from_symbol(symbol);
        Self {
            row,
            col,
            kind,
            value: value_for(kind, symbol),
            bars: Bars::default(),
            label: None,
            styles: StyleSet::new(),
            default: None,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Displayable value, absent for blank and block cells.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// True if the cell holds any value (spacers count).
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_blank(&self) -> bool {
        self.kind == CellKind::Blank
    }

    pub fn is_block(&self) -> bool {
        self.kind == CellKind::Block
    }

    /// True if the cell can be part of an entry.
    pub fn is_playable(&self) -> bool {
        self.kind == CellKind::Letter
    }

    /// Reconcile a symbol read from the orthogonal encoding.
    ///
    /// Placeholders adopt the new symbol. A conflicting symbol is appended to
    /// the existing value and `false` is returned so the caller can record
    /// the mismatch.
    pub fn reconcile(&mut self, symbol: char) -> bool {
        if self.matches(symbol) {
            return true;
        }
        if self.kind.is_placeholder() {
            self.kind = CellKind::from_symbol(symbol);
            self.value = value_for(self.kind, symbol);
            return true;
        }
        let current = self.symbol();
        self.kind = CellKind::Letter;
        self.value = Some(format!("{} {}", current, symbol));
        false
    }

    fn matches(&self, symbol: char) -> bool {
        match self.kind {
            CellKind::Letter => {
                let mut buf = [0u8; 4];
                let expected: &str = symbol.encode_utf8(&mut buf);
                self.value.as_deref() == Some(expected)
            }
            other => other == CellKind::from_symbol(symbol),
        }
    }

    /// The grid-language form of the cell, as written in an encoding.
    pub fn symbol(&self) -> String {
        match self.kind {
            CellKind::Letter => self.value.clone().unwrap_or_default(),
            CellKind::Block => BLOCK.to_string(),
            CellKind::Blank => EMPTY.to_string(),
            CellKind::Spacer => SPACER.to_string(),
        }
    }

    // -------------------------------------------------------------------------
    // Bars. Once set, a bar is never cleared.
    // -------------------------------------------------------------------------

    pub fn bars(&self) -> Bars {
        self.bars
    }

    pub fn set_top_bar(&mut self) {
        self.bars.top = true;
    }

    pub fn set_bottom_bar(&mut self) {
        self.bars.bottom = true;
    }

    pub fn set_left_bar(&mut self) {
        self.bars.left = true;
    }

    pub fn set_right_bar(&mut self) {
        self.bars.right = true;
    }

    // -------------------------------------------------------------------------
    // Label
    // -------------------------------------------------------------------------

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    // -------------------------------------------------------------------------
    // Style
    // -------------------------------------------------------------------------

    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    /// Character shown in the cell when it has no value of its own.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub(crate) fn set_default_value(&mut self, default: impl Into<String>) {
        self.default = Some(default.into());
    }

    /// Replace the style set. Returns false if a different, non-empty set was
    /// already assigned.
    pub(crate) fn apply_styles(&mut self, styles: StyleSet) -> bool {
        let consistent = self.styles.is_empty() || self.styles == styles;
        self.styles = styles;
        consistent
    }

    /// Fill colour when the cell is shaded with a circle.
    pub fn shade_circle(&self) -> Option<&str> {
        if self.styles.get("shape").map(String::as_str) != Some("circle") {
            return None;
        }
        self.styles.get("fill").map(String::as_str)
    }

    /// Background colour when the cell is shaded as a square.
    pub fn shade_square(&self) -> Option<&str> {
        self.styles.get("background-color").map(String::as_str)
    }
}

fn value_for(kind: CellKind, symbol: char) -> Option<String> {
    match kind {
        CellKind::Letter => Some(symbol.to_string()),
        CellKind::Spacer => Some(" ".to_string()),
        CellKind::Block | CellKind::Blank => None,
    }
}
