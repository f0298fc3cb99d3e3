//! Fuzz target for grid reconciliation.
//!
//! Builds a grid from arbitrary row, column and style encodings and checks
//! that reconciliation never panics and always yields a full cell matrix.

#![no_main]

use arbitrary::Arbitrary;
use cryptic::grid::{Direction, Grid, GridInput};
use cryptic::{Clue, ErrorSink};
use indexmap::IndexMap;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Encodings {
    rows: Vec<String>,
    columns: Vec<String>,
    style: Vec<String>,
    show_border: bool,
}

fuzz_target!(|input: Encodings| {
    if input.rows.len() > 32 || input.columns.len() > 32 || input.style.len() > 32 {
        return;
    }
    if input.rows.iter().chain(&input.columns).any(|line| line.len() > 64) {
        return;
    }

    let labels: IndexMap<String, &Clue> = IndexMap::new();
    let mut sink = ErrorSink::new();
    let grid_input = GridInput::new(input.rows, input.columns).with_style(input.style);

    if let Ok(grid) = Grid::build(grid_input, &labels, input.show_border, &mut sink) {
        assert_eq!(grid.cells().len(), grid.height());
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                assert!(grid.edges(row, col).is_some());
            }
        }
        let _ = grid.cell_words(Direction::Across);
        let _ = grid.cell_words(Direction::Down);
        let _ = grid.to_record();
    }
});
