//! Property-based tests for grid reconciliation and the clue grammar.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p cryptic --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p cryptic --test property_tests
//! ```

use indexmap::IndexMap;
use proptest::prelude::*;

use cryptic::clues::{Clue, enumerate};
use cryptic::grid::{Direction, Grid, GridInput, extract_words, parse_style_rows};
use cryptic::{ErrorCategory, ErrorSink};

// =============================================================================
// Test Strategies
// =============================================================================

/// A rectangular grid of letters, blocks, blanks and spacers.
fn grid_matrix() -> impl Strategy<Value = Vec<Vec<char>>> {
    (1usize..7, 1usize..7).prop_flat_map(|(height, width)| {
        prop::collection::vec(
            prop::collection::vec(
                prop_oneof![
                    6 => prop::char::range('A', 'F'),
                    1 => Just('#'),
                    1 => Just('_'),
                    1 => Just('.'),
                ],
                width,
            ),
            height,
        )
    })
}

fn rows_of(matrix: &[Vec<char>]) -> Vec<String> {
    matrix.iter().map(|row| row.iter().collect()).collect()
}

fn columns_of(matrix: &[Vec<char>]) -> Vec<String> {
    let width = matrix.first().map_or(0, Vec::len);
    (0..width)
        .map(|col| matrix.iter().map(|row| row[col]).collect())
        .collect()
}

fn no_labels() -> IndexMap<String, &'static Clue> {
    IndexMap::new()
}

fn texts(lines: &[String], direction: Direction) -> Vec<String> {
    extract_words(lines, direction)
        .into_iter()
        .map(|w| w.text)
        .collect()
}

fn answer() -> impl Strategy<Value = String> {
    "[A-Z]{1,6}( [A-Z]{1,6})?"
}

fn clue_text() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ,']{0,20}[A-Za-z]"
}

fn solution() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,10}[a-z]"
}

// =============================================================================
// Grid Reconciliation
// =============================================================================

proptest! {
    /// Words read back from the cells equal the words in the encodings.
    #[test]
    fn cell_words_match_extractor(matrix in grid_matrix()) {
        let rows = rows_of(&matrix);
        let columns = columns_of(&matrix);
        let mut sink = ErrorSink::new();
        let grid = Grid::build(
            GridInput::new(rows.clone(), columns.clone()),
            &no_labels(),
            false,
            &mut sink,
        )
        .unwrap();

        prop_assert!(sink.is_empty(), "unexpected errors: {:?}", sink);
        prop_assert_eq!(grid.cell_words(Direction::Across), texts(&rows, Direction::Across));
        prop_assert_eq!(grid.cell_words(Direction::Down), texts(&columns, Direction::Down));
    }

    /// Changing one letter in the column encoding is always reported.
    #[test]
    fn disagreement_is_recorded(matrix in grid_matrix(), seed in any::<usize>()) {
        let letters: Vec<(usize, usize)> = matrix
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, c)| c.is_ascii_uppercase())
                    .map(move |(c, _)| (r, c))
            })
            .collect();
        prop_assume!(!letters.is_empty());
        let (row, col) = letters[seed % letters.len()];

        let mut altered = matrix.clone();
        altered[row][col] = 'Z';
        let mut sink = ErrorSink::new();
        let grid = Grid::build(
            GridInput::new(rows_of(&matrix), columns_of(&altered)),
            &no_labels(),
            false,
            &mut sink,
        )
        .unwrap();

        prop_assert!(sink.count(ErrorCategory::CellValue) >= 1);
        let expected = format!("{} Z", matrix[row][col]);
        prop_assert_eq!(grid.cell(row, col).unwrap().value(), Some(expected.as_str()));
    }

    /// Arbitrary encodings never panic and always yield a full matrix.
    #[test]
    fn arbitrary_encodings_build(
        rows in prop::collection::vec("[A-C#_|.]{0,6}", 1..5),
        columns in prop::collection::vec("[A-C#_|.]{0,6}", 1..5),
    ) {
        let mut sink = ErrorSink::new();
        let grid = Grid::build(
            GridInput::new(rows.clone(), columns.clone()),
            &no_labels(),
            true,
            &mut sink,
        )
        .unwrap();

        prop_assert_eq!(grid.height(), rows.len());
        prop_assert_eq!(grid.width(), columns.len());
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                prop_assert!(grid.cell(row, col).is_some());
                prop_assert!(grid.edges(row, col).is_some());
            }
        }
    }

    /// The style parser never panics and reports runs it cannot place.
    #[test]
    fn style_parser_never_panics(rows in prop::collection::vec("[\\[\\]A-C_O#]{0,10}", 0..5)) {
        let mut sink = ErrorSink::new();
        let tokens = parse_style_rows(&rows, &mut sink);
        for token in &tokens {
            prop_assert!(token.y < rows.len());
            prop_assert!(!token.token.is_empty() || token.bracketed);
        }
    }
}

// =============================================================================
// Clue Grammar
// =============================================================================

proptest! {
    /// Full clue lines survive a parse and re-serialise.
    #[test]
    fn clue_raw_round_trip(
        starred in any::<bool>(),
        name in "[1-9][0-9]?",
        text in clue_text(),
        answers in prop::collection::vec(answer(), 1..3),
        entries in prop::collection::vec("[A-Z]{2,8}", 0..3),
        solutions in prop::collection::vec(solution(), 0..3),
    ) {
        let star = if starred { "*" } else { "" };
        let mut answer_field = answers.join(";");
        if !entries.is_empty() {
            answer_field = format!("{}|{}", answer_field, entries.join(";"));
        }
        let line = format!(
            "{}{}. {} ~ {} ~ {}",
            star,
            name,
            text,
            answer_field,
            solutions.join(";")
        );

        let clue = Clue::parse(&line).unwrap();
        prop_assert_eq!(clue.is_starred(), starred);
        prop_assert_eq!(clue.name(), name.as_str());
        prop_assert_eq!(clue.clue(), Some(text.as_str()));
        prop_assert_eq!(clue.answers(), answers.as_slice());
        prop_assert_eq!(clue.explicit_entries(), entries.as_slice());
        prop_assert_eq!(clue.solutions(), solutions.as_slice());
        prop_assert_eq!(clue.raw(), line);
    }

    /// Enumerations count letters per word and are deterministic.
    #[test]
    fn enumeration_counts_words(words in prop::collection::vec("[A-Z]{1,8}", 1..4)) {
        let answer = words.join(" ");
        let expected: Vec<String> = words.iter().map(|w| w.len().to_string()).collect();
        prop_assert_eq!(enumerate(&answer), expected.join(","));
        prop_assert_eq!(enumerate(&answer), enumerate(&answer));
    }

    /// Reversing entries and switching it back restores the entries.
    #[test]
    fn reverse_toggle_restores_entries(answers in prop::collection::vec(answer(), 1..3)) {
        let line = format!("1. Clue ~ {} ~ Sol", answers.join(";"));
        let mut clue = Clue::parse(&line).unwrap();
        let plain = clue.entries();

        clue.set_reverse_entries(true);
        let reversed = clue.entries();
        for (r, p) in reversed.iter().zip(&plain) {
            prop_assert_eq!(r.chars().rev().collect::<String>(), p.clone());
        }

        clue.set_reverse_entries(false);
        prop_assert_eq!(clue.entries(), plain);
    }

    /// Arbitrary text never panics the grammar.
    #[test]
    fn clue_parse_never_panics(line in "\\PC{0,80}") {
        let _ = Clue::parse(&line);
    }
}
