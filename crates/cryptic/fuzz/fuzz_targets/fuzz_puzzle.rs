//! Fuzz target for whole puzzle documents.
//!
//! Any JSON document must either build a puzzle or fail with an error.

#![no_main]

use cryptic::Puzzle;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    if let Ok(json) = std::str::from_utf8(data) {
        if let Ok(puzzle) = Puzzle::from_json_str(json) {
            let _ = puzzle.summary();
            let _ = puzzle.clues().to_text_map();
        }
    }
});
