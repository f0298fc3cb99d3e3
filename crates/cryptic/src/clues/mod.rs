//! Clue grammar, clue containers and the ordered collection of containers.

mod clue;
mod collection;
mod container;

pub use clue::{Clue, ClueInput, ClueName, ClueOptions, ClueRecord, enumerate};
pub use collection::{Clues, ContainerIter};
pub use container::{ClueContainer, ContainerOption, GroupSettings, parse_title};
