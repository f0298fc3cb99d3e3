//! Example: Build a puzzle file and report its consistency.
//!
//! Usage:
//!   cargo run --example check -- <puzzle.json>
//!
//! Set `RUST_LOG=debug` to follow the grid stages.

use std::env;
use std::path::Path;

use cryptic::Puzzle;
use cryptic::grid::Direction;

fn main() -> cryptic::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example check -- <puzzle.json>");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let puzzle = Puzzle::from_path(path)?;

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("{}", puzzle);
    println!("{}", separator);
    println!();

    let summary = puzzle.summary();
    println!("## Grid ({}x{})", summary.width, summary.height);
    println!();
    for row in puzzle.grid().rows() {
        println!("  {}", row);
    }
    println!();
    println!("  across: {}", puzzle.grid().cell_words(Direction::Across).join(" "));
    println!("  down:   {}", puzzle.grid().cell_words(Direction::Down).join(" "));
    println!();

    println!(
        "## Clues ({} containers, {} clues)",
        summary.containers, summary.clues
    );
    println!();
    for (_, container) in puzzle.clues() {
        for line in container.to_text().lines() {
            println!("  {}", line);
        }
        println!();
    }

    if puzzle.is_valid() {
        println!("## No errors");
        return Ok(());
    }

    println!("## Errors ({} total)", puzzle.errors().len());
    println!();
    for (category, messages) in puzzle.errors().iter() {
        println!("  [{}]", category.label());
        for message in messages {
            println!("    {}", message);
        }
    }

    Ok(())
}
