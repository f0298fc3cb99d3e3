//! Fuzz target for the clue line grammar.
//!
//! This fuzzer tests that clue parsing:
//! 1. Never panics on any input line
//! 2. Produces lines that parse again after serialisation
//! 3. Enumerates any answer without panicking

#![no_main]

use cryptic::clues::{Clue, enumerate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000 {
        return;
    }

    if let Ok(line) = std::str::from_utf8(data) {
        if let Some(clue) = Clue::parse(line) {
            for answer in clue.answers() {
                let _ = enumerate(answer);
            }
            let _ = clue.entries();
            let _ = clue.to_string();
            let _ = Clue::parse(&clue.raw());
        }
    }
});
