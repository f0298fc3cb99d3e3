//! Grid reconciliation performance benchmarks.
//!
//! Measures normalization and cell placement for square grids of increasing
//! size, and the full puzzle build including label resolution and validation.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use cryptic::grid::{Direction, Grid, GridInput, extract_words};
use cryptic::{Clue, ErrorSink, Puzzle};
use indexmap::IndexMap;
use serde_json::json;

/// Generate a square grid with blocks on every odd row and column crossing.
fn generate_matrix(size: usize) -> Vec<Vec<char>> {
    (0..size)
        .map(|row| {
            (0..size)
                .map(|col| {
                    if row % 2 == 1 && col % 2 == 1 {
                        '#'
                    } else {
                        (b'A' + ((row * 7 + col * 3) % 26) as u8) as char
                    }
                })
                .collect()
        })
        .collect()
}

fn encodings(matrix: &[Vec<char>]) -> (Vec<String>, Vec<String>) {
    let rows = matrix.iter().map(|row| row.iter().collect()).collect();
    let columns = (0..matrix.len())
        .map(|col| matrix.iter().map(|row| row[col]).collect())
        .collect();
    (rows, columns)
}

/// Clue block for every word, numbered by start cell in reading order.
fn generate_clues(rows: &[String], columns: &[String]) -> (String, String) {
    let across = extract_words(rows, Direction::Across);
    let down = extract_words(columns, Direction::Down);

    let mut starts: Vec<(usize, usize)> = across.iter().chain(&down).map(|w| w.start()).collect();
    starts.sort_unstable();
    starts.dedup();

    let block = |words: &[cryptic::grid::GridWord]| {
        words
            .iter()
            .map(|w| {
                let number = starts.binary_search(&w.start()).unwrap_or_default() + 1;
                format!("{}. Clue for {} ~ {} ~ Explanation", number, w.text, w.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    (block(&across), block(&down))
}

/// Benchmark reconciling both encodings into a cell matrix.
fn bench_grid_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_build");

    for size in [5, 15, 25, 51].iter() {
        let (rows, columns) = encodings(&generate_matrix(*size));
        let labels: IndexMap<String, &Clue> = IndexMap::new();

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("square", size), &(rows, columns), |b, input| {
            b.iter(|| {
                let mut sink = ErrorSink::new();
                let grid = Grid::build(
                    GridInput::new(input.0.clone(), input.1.clone()),
                    &labels,
                    true,
                    &mut sink,
                )
                .unwrap();
                black_box(grid)
            })
        });
    }

    group.finish();
}

/// Benchmark word extraction from line encodings.
fn bench_extract_words(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_words");

    for size in [15, 51, 101].iter() {
        let (rows, _) = encodings(&generate_matrix(*size));

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("rows", size), &rows, |b, rows| {
            b.iter(|| black_box(extract_words(rows, Direction::Across)))
        });
    }

    group.finish();
}

/// Benchmark the whole puzzle pipeline from a JSON value.
fn bench_puzzle_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("puzzle_build");

    for size in [5, 15, 25].iter() {
        let (rows, columns) = encodings(&generate_matrix(*size));
        let (across, down) = generate_clues(&rows, &columns);
        let value = json!({
            "title": "Benchmark",
            "author": "Setter",
            "date": "2024-01-01",
            "publication": "Bench",
            "instructions": null,
            "clues": {"Across": across, "Down": down},
            "grid": {"rows": rows, "columns": columns},
        });

        group.bench_with_input(BenchmarkId::new("square", size), &value, |b, value| {
            b.iter(|| black_box(Puzzle::from_value(value).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_grid_build,
    bench_extract_words,
    bench_puzzle_build
);
criterion_main!(benches);
