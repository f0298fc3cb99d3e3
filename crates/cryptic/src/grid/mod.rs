//! Crossword grid: cells, entries, styles and reconciliation of the row and
//! column encodings.

mod cell;
mod entries;
mod reconciler;
mod style;

pub use cell::{BAR, BLOCK, Bars, Cell, CellKind, EMPTY, SPACER, StyleSet};
pub use entries::{Direction, GridWord, extract_line, extract_words, is_word_break, words_by_text};
pub use reconciler::{CellEdges, Grid, GridInput, GridStage, LabelSource};
pub use style::{
    DEFAULT_KEY, StyleAssignment, StyleTable, StyleToken, pad_style_rows, parse_style_rows,
};
