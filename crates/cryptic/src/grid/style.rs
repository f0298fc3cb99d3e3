//! Per-cell style annotations and named style lookup.
//!
//! A style matrix has one line per grid row. Each character names a style
//! for the cell at that position, `_` means no style, and a bracketed run
//! such as `[12]` is a multi-character literal that occupies a single cell.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::cell::{EMPTY, StyleSet};
use crate::validation::{ErrorCategory, ErrorSink};

/// Key in a style set that supplies the cell's default display character.
pub const DEFAULT_KEY: &str = "default";

// =============================================================================
// BUILT-IN STYLES
// =============================================================================
// Never mutated; each grid merges its own named styles over a copy.

static BUILTIN_STYLES: Lazy<IndexMap<String, StyleSet>> = Lazy::new(|| {
    fn set(pairs: &[(&str, &str)]) -> StyleSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    let mut styles = IndexMap::new();
    styles.insert(
        "#".to_string(),
        set(&[("background-color", "lightgrey"), ("shape", "shadesquare")]),
    );
    styles.insert(
        "@".to_string(),
        set(&[
            ("background-color", "lightgrey"),
            ("fill", "lightgrey"),
            ("shape", "circle"),
        ]),
    );
    styles.insert("O".to_string(), set(&[("shape", "circle")]));
    styles.insert("X".to_string(), set(&[("shape", "x")]));
    styles
});

/// Named styles for one grid, layered over the built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    named: IndexMap<String, StyleSet>,
    merged: IndexMap<String, StyleSet>,
}

impl StyleTable {
    /// Build a table from the puzzle's named styles.
    pub fn new(named: IndexMap<String, StyleSet>) -> Self {
        let mut merged = BUILTIN_STYLES.clone();
        for (token, styles) in &named {
            merged.insert(token.clone(), styles.clone());
        }
        Self { named, merged }
    }

    /// Built-in styles available to every grid.
    pub fn builtin() -> &'static IndexMap<String, StyleSet> {
        &BUILTIN_STYLES
    }

    /// Styles defined by the puzzle itself.
    pub fn named(&self) -> &IndexMap<String, StyleSet> {
        &self.named
    }

    /// Look up a token, preferring the puzzle's own definitions.
    pub fn get(&self, token: &str) -> Option<&StyleSet> {
        self.merged.get(token)
    }

    /// Resolve a token into what should be applied to a cell.
    ///
    /// Returns `None` for the blank token.
    pub fn resolve(&self, token: &str) -> Option<StyleAssignment> {
        match self.get(token) {
            Some(styles) => {
                let mut styles = styles.clone();
                let default = styles.shift_remove(DEFAULT_KEY);
                Some(StyleAssignment { default, styles })
            }
            None if is_blank_token(token) => None,
            None => Some(StyleAssignment {
                default: Some(token.to_string()),
                styles: StyleSet::new(),
            }),
        }
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new(IndexMap::new())
    }
}

/// Result of resolving one style token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleAssignment {
    /// Default display character, if the token defines one.
    pub default: Option<String>,
    /// Remaining style keys.
    pub styles: StyleSet,
}

/// A style token positioned on a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleToken {
    pub x: usize,
    pub y: usize,
    pub token: String,
    /// True if the token came from a `[...]` run.
    pub bracketed: bool,
}

fn is_blank_token(token: &str) -> bool {
    token.chars().all(|c| c == EMPTY || c.is_whitespace())
}

/// Pad a style matrix with blanks to `width` × `height`.
pub fn pad_style_rows(rows: &[String], width: usize, height: usize) -> Vec<String> {
    let mut padded: Vec<String> = rows.to_vec();
    while padded.len() < height {
        padded.push(EMPTY.to_string().repeat(width));
    }
    for row in &mut padded {
        let len = row.chars().count();
        if len < width {
            row.extend(std::iter::repeat_n(EMPTY, width - len));
        }
    }
    padded
}

/// Parse a style matrix into positioned tokens.
///
/// Each bracketed run collapses to one cell, so plain characters and runs
/// never share a coordinate. A run opened inside another run or left
/// unterminated is recorded as a `grid_style` error.
pub fn parse_style_rows(rows: &[String], sink: &mut ErrorSink) -> Vec<StyleToken> {
    let mut tokens = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        tokens.extend(parse_style_row(row, y, sink));
    }
    tokens
}

fn parse_style_row(row: &str, y: usize, sink: &mut ErrorSink) -> Vec<StyleToken> {
    let (claimed, collapsed) = claim_bracketed(row, y, sink);

    let mut tokens: Vec<StyleToken> = Vec::new();
    for (x, c) in collapsed.iter().enumerate() {
        if let Some(token) = claimed.get(&x) {
            tokens.push(StyleToken {
                x,
                y,
                token: token.clone(),
                bracketed: true,
            });
            continue;
        }
        if let Some(c) = c {
            let token = c.to_string();
            if !is_blank_token(&token) {
                tokens.push(StyleToken {
                    x,
                    y,
                    token,
                    bracketed: false,
                });
            }
        }
    }
    tokens
}

/// Extract bracketed runs. Returns the claimed cells and the row collapsed to
/// one slot per cell, with `None` where a bracketed run sits.
fn claim_bracketed(
    row: &str,
    y: usize,
    sink: &mut ErrorSink,
) -> (IndexMap<usize, String>, Vec<Option<char>>) {
    let mut claimed: IndexMap<usize, String> = IndexMap::new();
    let mut collapsed: Vec<Option<char>> = Vec::new();
    let mut depth = 0usize;
    let mut text = String::new();

    for c in row.chars() {
        match (c, depth) {
            ('[', 0) => {
                depth = 1;
                text.clear();
            }
            ('[', _) => {
                // a nested run starts on the cell the outer run already holds
                sink.record(
                    ErrorCategory::GridStyle,
                    format!("Duplicate style for cell ({}, {})", collapsed.len(), y),
                );
                depth += 1;
                text.push(c);
            }
            (']', 1) => {
                depth = 0;
                let x = collapsed.len();
                claimed.entry(x).or_insert_with(|| std::mem::take(&mut text));
                collapsed.push(None);
            }
            (']', d) if d > 1 => {
                depth -= 1;
                text.push(c);
            }
            (_, 0) => collapsed.push(Some(c)),
            _ => text.push(c),
        }
    }

    if depth > 0 {
        sink.record(
            ErrorCategory::GridStyle,
            format!(
                "Unterminated style token at cell ({}, {}): [{}",
                collapsed.len(),
                y,
                text
            ),
        );
    }
    (claimed, collapsed)
}
