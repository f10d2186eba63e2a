//! Guard-condition extraction and deduplication

pub mod extractor;
pub mod precondition;

pub use extractor::{extract, parse_condition_text};
pub use precondition::{Precondition, PreconditionItem, PreconditionSet};
