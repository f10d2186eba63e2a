//! Precondition records and structural deduplication
//!
//! A precondition is the ordered list of branch guards protecting one
//! flagged call, keyed by (attribute, declaring type, declaring class).
//! Equality and hashing are structural over the ordered item list, so two
//! findings with the same guards in the same nesting collapse to one, while
//! differently nested guards stay distinct.

use rustc_hash::FxHashSet;
use serde::Serialize;

/// One guard on the path to a flagged call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PreconditionItem {
    /// Procedure owning the branch
    pub procedure: String,
    /// Source line of the branch
    pub line: u32,
    /// Compared attribute name (e.g. `seconds`)
    pub attribute: String,
    /// Comparison operator (e.g. `>`)
    pub operator: String,
    /// Compared literal or value text (e.g. `30`)
    pub value: String,
    /// Branch outcome taken on the path to the flagged call
    pub branch_taken: bool,
}

/// All guards protecting one flagged call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Precondition {
    /// Primary compared attribute
    pub attribute: String,
    /// Declaring type of the flagged callee
    pub declaring_type: String,
    /// Class containing the flagged call
    pub declaring_class: String,
    /// Guards in path order, outermost first
    pub items: Vec<PreconditionItem>,
}

/// Dedup set over structurally hashed preconditions
///
/// Survives across passes, so re-analysis or analysis across multiple
/// platform snapshots does not duplicate a finding already seen.
#[derive(Debug, Default)]
pub struct PreconditionSet {
    seen: FxHashSet<Precondition>,
}

impl PreconditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when this precondition was not seen before
    pub fn insert(&mut self, precondition: &Precondition) -> bool {
        self.seen.insert(precondition.clone())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
