//! Soft-error collection and clue/grid cross validation.

mod report;
mod validators;

pub use report::{ErrorCategory, ErrorSink};
pub use validators::{
    ExtraCluesValidator, Finding, MissingCluesValidator, ValidationContext, ValidationEngine,
    Validator,
};
